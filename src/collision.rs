//! Overlap checks between pooled bodies and their targets, and the side
//! effects of each hit.
//!
//! Pairs are resolved in a fixed order: player shots against enemies, then
//! hazards (enemy shots of both kinds, then enemy bodies) against the player,
//! then items against the player. A shot, item or hazard resolves against at
//! most one target per tick and leaves play as soon as it does.

use rand::Rng;
use tracing::debug;

use crate::deferred::DeferredAction;
use crate::entities::{Despawn, GameEvent, PoolId, ShotKind};
use crate::state::GameState;
use crate::vec2::{Aabb, Vec2};

/// Something that hurts the player on contact.
#[derive(Clone, Copy, Debug)]
struct Hazard {
    bounds: Aabb,
    despawn: Despawn,
}

/// Run the whole collision pass for this tick.
pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    let mut destroyed = vec![false; state.enemies.len()];

    player_shots_vs_enemies(state, &mut destroyed, rng);
    hazards_vs_player(state, &mut destroyed);
    items_vs_player(state);

    let mut index = 0;
    state.enemies.retain(|_| {
        let keep = !destroyed[index];
        index += 1;
        keep
    });
}

/// Take a body out of play according to its despawn tag.
fn despawn(state: &mut GameState, destroyed: &mut [bool], target: Despawn) {
    match target {
        Despawn::Destroyed { enemy } => destroyed[enemy] = true,
        Despawn::Pooled { pool, handle } => state.pool_mut(pool).release(handle),
    }
}

fn enemy_bounds(state: &GameState, index: usize) -> Aabb {
    Aabb::centered(state.enemies[index].position, state.config.enemy_half)
}

fn player_bounds(state: &GameState) -> Aabb {
    Aabb::centered(state.player.position, state.config.player_half)
}

fn player_shots_vs_enemies(state: &mut GameState, destroyed: &mut [bool], rng: &mut impl Rng) {
    let shot_half = state.config.shot_half;
    let shots: Vec<_> = state.player_shots.iter_active().map(|(handle, _)| handle).collect();

    for handle in shots {
        let Some(shot) = state.player_shots.get(handle) else {
            continue;
        };
        let bounds = Aabb::centered(shot.position, shot_half);
        let Some(enemy) = (0..state.enemies.len())
            .find(|&i| !destroyed[i] && enemy_bounds(state, i).overlaps(&bounds))
        else {
            continue;
        };

        despawn(
            state,
            destroyed,
            Despawn::Pooled {
                pool: PoolId::PlayerShots,
                handle,
            },
        );
        despawn(state, destroyed, Despawn::Destroyed { enemy });

        let position = state.enemies[enemy].position;
        let points = state.session.register_kill();
        state.events.push(GameEvent::EnemyKilled {
            position,
            combo: state.session.combo(),
            points,
        });

        if rng.gen_bool(state.config.drop_chance.clamp(0.0, 1.0)) {
            let velocity = Vec2::DOWN * state.config.item_speed;
            if state.items.acquire(position, velocity).is_some() {
                state.events.push(GameEvent::ItemDropped { position });
            } else {
                debug!("item pool saturated, drop skipped");
            }
        }
    }
}

fn hazards_vs_player(state: &mut GameState, destroyed: &mut [bool]) {
    let shot_half = state.config.shot_half;
    let mut hazards = Vec::new();
    for kind in [ShotKind::Spark, ShotKind::Pulse] {
        let pool = PoolId::EnemyShots(kind);
        hazards.extend(state.pool(pool).iter_active().map(|(handle, e)| Hazard {
            bounds: Aabb::centered(e.position, shot_half),
            despawn: Despawn::Pooled { pool, handle },
        }));
    }
    for enemy in 0..state.enemies.len() {
        if !destroyed[enemy] {
            hazards.push(Hazard {
                bounds: enemy_bounds(state, enemy),
                despawn: Despawn::Destroyed { enemy },
            });
        }
    }

    let player = player_bounds(state);
    for hazard in hazards {
        if state.session.health() == 0 {
            break;
        }
        if !hazard.bounds.overlaps(&player) {
            continue;
        }

        despawn(state, destroyed, hazard.despawn);
        let health = state.session.take_damage();
        let flash_until = state.tick + state.config.hit_flash_ticks;
        state.player.hit_flash = true;
        state.player.hit_flash_until = flash_until;
        state
            .session
            .schedule(flash_until, DeferredAction::ClearHitFlash);
        state.events.push(GameEvent::PlayerHit { health });
        debug!(health, "player hit");
    }
}

fn items_vs_player(state: &mut GameState) {
    if state.session.health() == 0 {
        return;
    }
    let player = player_bounds(state);
    let item_half = state.config.item_half;
    let touching: Vec<_> = state
        .items
        .iter_active()
        .filter(|(_, e)| Aabb::centered(e.position, item_half).overlaps(&player))
        .map(|(handle, _)| handle)
        .collect();

    for handle in touching {
        state.items.release(handle);
        let health = state.session.heal();
        state.events.push(GameEvent::ItemCollected { health });
    }
}
