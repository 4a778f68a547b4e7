//! Per-enemy behavior: formation flight, dive attack, exit.
//!
//! Every formation enemy runs two independent Bernoulli trials per tick, fire
//! first and dive second. Both are always drawn, so a given RNG stream yields
//! the same decisions regardless of what the outcomes were.

use rand::Rng;
use tracing::debug;

use crate::config::{DiveExitPolicy, EnemyAim, GameConfig, ShotSelection};
use crate::entities::{Enemy, EnemyState, ShotKind};
use crate::state::{Arena, GameState};
use crate::vec2::Vec2;

/// Per-tick inputs shared by every enemy.
struct Frame<'a> {
    config: &'a GameConfig,
    arena: Arena,
    time: f32,
    dt: f32,
    difficulty: f32,
    player: Vec2,
}

/// A shot an enemy wants to fire this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotRequest {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Odds for one per-tick trial on the current wave.
pub fn trial_chance(base: f64, difficulty: f32) -> f64 {
    (base * difficulty as f64).clamp(0.0, 1.0)
}

/// Advance every live enemy by one tick.
///
/// Returns true when a formation enemy has reached the floor line.
pub fn update_enemies(state: &mut GameState, rng: &mut impl Rng) -> bool {
    let frame = Frame {
        config: &state.config,
        arena: state.arena,
        time: state.time(),
        dt: state.config.dt(),
        difficulty: state.config.difficulty(state.session.wave()),
        player: state.player.position,
    };

    let mut floor_breached = false;
    for enemy in state.enemies.iter_mut() {
        let request = step_enemy(enemy, &frame, rng);
        if enemy.state == EnemyState::Formation && enemy.position.y >= frame.arena.floor_y(frame.config) {
            floor_breached = true;
        }
        let Some(request) = request else {
            continue;
        };

        let kind = match frame.config.shot_selection {
            ShotSelection::Alternating => {
                let kind = state.next_shot;
                state.next_shot = kind.other();
                kind
            }
            ShotSelection::Uniform => {
                if rng.gen_bool(0.5) {
                    ShotKind::Spark
                } else {
                    ShotKind::Pulse
                }
            }
        };
        let pool = match kind {
            ShotKind::Spark => &mut state.spark_shots,
            ShotKind::Pulse => &mut state.pulse_shots,
        };
        if pool.acquire(request.position, request.velocity).is_none() {
            debug!(?kind, "enemy shot pool saturated, shot dropped");
        }
    }

    state.enemies.retain(|e| e.state != EnemyState::Exited);
    floor_breached
}

fn step_enemy(enemy: &mut Enemy, frame: &Frame<'_>, rng: &mut impl Rng) -> Option<ShotRequest> {
    let config = frame.config;
    match enemy.state {
        EnemyState::Formation => {
            enemy.velocity = Vec2::new(
                config.oscillation_amplitude
                    * (frame.time * config.oscillation_rate + enemy.phase).sin(),
                config.descent_speed * frame.difficulty,
            );

            let fire = rng.gen_bool(trial_chance(config.fire_chance, frame.difficulty));
            let dive = rng.gen_bool(trial_chance(config.dive_chance, frame.difficulty));

            let shot = fire.then(|| {
                let origin = enemy.position + Vec2::new(0.0, config.enemy_shot_offset);
                let speed = config.enemy_shot_speed * frame.difficulty;
                let velocity = match config.enemy_aim {
                    EnemyAim::Player => origin.toward(frame.player, speed),
                    EnemyAim::Down => Vec2::DOWN * speed,
                };
                ShotRequest {
                    position: origin,
                    velocity,
                }
            });

            if dive {
                // Aimed once, at where the player is right now.
                enemy.state = EnemyState::Diving;
                enemy.velocity = enemy
                    .position
                    .toward(frame.player, config.dive_speed * frame.difficulty);
                debug!(id = enemy.id, "enemy dive");
            }

            enemy.position += enemy.velocity * frame.dt;
            shot
        }
        EnemyState::Diving => {
            enemy.position += enemy.velocity * frame.dt;
            if enemy.position.y > frame.arena.exit_y(config) {
                match config.dive_exit {
                    DiveExitPolicy::Destroy => enemy.state = EnemyState::Exited,
                    DiveExitPolicy::Recycle => {
                        enemy.state = EnemyState::Formation;
                        enemy.velocity = Vec2::ZERO;
                        enemy.position = Vec2::new(
                            rng.gen::<f32>() * frame.arena.width.max(0.0),
                            -config.exit_margin,
                        );
                    }
                }
            }
            None
        }
        EnemyState::Exited => None,
    }
}
