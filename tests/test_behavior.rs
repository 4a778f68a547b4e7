use std::f32::consts::FRAC_PI_2;

use wave_shooter::behavior::update_enemies;
use wave_shooter::compute::tick;
use wave_shooter::config::{DiveExitPolicy, EnemyAim, GameConfig, ShotSelection};
use wave_shooter::entities::{
    Enemy, EnemyState, GameEvent, GameOverCause, GameStatus, ShotKind, TickInput,
};
use wave_shooter::state::GameState;
use wave_shooter::vec2::Vec2;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn quiet_config() -> GameConfig {
    GameConfig {
        fire_chance: 0.0,
        dive_chance: 0.0,
        drop_chance: 0.0,
        ..GameConfig::default()
    }
}

/// 600 × 600 arena, player at (300, 540), floor at 540, dive exit at 640.
fn make_state(config: GameConfig) -> GameState {
    GameState::new(config, 600.0, 600.0)
}

fn enemy_at(x: f32, y: f32) -> Enemy {
    Enemy {
        id: 0,
        position: Vec2::new(x, y),
        velocity: Vec2::ZERO,
        phase: 0.0,
        state: EnemyState::Formation,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[test]
fn formation_oscillates_and_descends() {
    let mut s = make_state(quiet_config());
    let mut e = enemy_at(300.0, 100.0);
    e.phase = FRAC_PI_2; // sin(0 + π/2) = 1
    s.enemies.push(e);

    let breached = update_enemies(&mut s, &mut seeded_rng());

    assert!(!breached);
    let e = &s.enemies[0];
    assert!(approx(e.velocity.x, 120.0));
    assert!(approx(e.velocity.y, 25.0));
    assert!(approx(e.position.x, 302.0));
    assert!(approx(e.position.y, 100.0 + 25.0 / 60.0));
}

#[test]
fn descent_speeds_up_with_wave() {
    let mut s = make_state(quiet_config());
    s.session.wave_started(3, 0);
    s.enemies.push(enemy_at(300.0, 100.0));
    update_enemies(&mut s, &mut seeded_rng());
    // 25 * (1 + 2 * 0.15)
    assert!(approx(s.enemies[0].velocity.y, 32.5));
}

// ── Dive ──────────────────────────────────────────────────────────────────────

#[test]
fn dive_targets_player_position_at_transition_only() {
    let mut s = make_state(GameConfig {
        dive_chance: 1.0,
        ..quiet_config()
    });
    s.enemies.push(enemy_at(300.0, 100.0));

    update_enemies(&mut s, &mut seeded_rng());
    assert_eq!(s.enemies[0].state, EnemyState::Diving);
    let pursuit = s.enemies[0].velocity;
    assert!(approx(pursuit.x, 0.0));
    assert!(approx(pursuit.y, 320.0));

    // The player moves away; the dive does not re-aim.
    s.player.position = Vec2::new(20.0, 540.0);
    update_enemies(&mut s, &mut seeded_rng());
    assert_eq!(s.enemies[0].velocity, pursuit);
}

#[test]
fn dive_exit_destroys_enemy_by_default() {
    let mut s = make_state(quiet_config());
    let mut e = enemy_at(100.0, 639.0);
    e.state = EnemyState::Diving;
    e.velocity = Vec2::new(0.0, 320.0);
    s.enemies.push(e);

    update_enemies(&mut s, &mut seeded_rng());
    assert!(s.enemies.is_empty());
}

#[test]
fn dive_exit_recycle_policy_reenters_from_top() {
    let mut s = make_state(GameConfig {
        dive_exit: DiveExitPolicy::Recycle,
        ..quiet_config()
    });
    let mut e = enemy_at(100.0, 639.0);
    e.state = EnemyState::Diving;
    e.velocity = Vec2::new(0.0, 320.0);
    s.enemies.push(e);

    update_enemies(&mut s, &mut seeded_rng());
    assert_eq!(s.enemies.len(), 1);
    let e = &s.enemies[0];
    assert_eq!(e.state, EnemyState::Formation);
    assert_eq!(e.position.y, -40.0);
    assert!((0.0..=600.0).contains(&e.position.x));
}

// ── Fire ──────────────────────────────────────────────────────────────────────

#[test]
fn alternating_selection_toggles_shot_kind() {
    let mut s = make_state(GameConfig {
        fire_chance: 1.0,
        enemy_aim: EnemyAim::Down,
        ..quiet_config()
    });
    s.enemies.push(enemy_at(100.0, 100.0));
    s.enemies.push(enemy_at(200.0, 100.0));

    update_enemies(&mut s, &mut seeded_rng());

    assert_eq!(s.spark_shots.active_count(), 1);
    assert_eq!(s.pulse_shots.active_count(), 1);
    assert_eq!(s.next_shot, ShotKind::Spark);

    let (_, spark) = s.spark_shots.iter_active().next().unwrap();
    assert_eq!(spark.position, Vec2::new(100.0, 120.0));
    assert_eq!(spark.velocity, Vec2::new(0.0, 320.0));
    let (_, pulse) = s.pulse_shots.iter_active().next().unwrap();
    assert_eq!(pulse.position, Vec2::new(200.0, 120.0));
}

#[test]
fn shots_aim_at_player_by_default() {
    let mut s = make_state(GameConfig {
        fire_chance: 1.0,
        ..quiet_config()
    });
    // Straight above the player: 300 - 0, 540 - 120
    s.enemies.push(enemy_at(300.0, 100.0));
    update_enemies(&mut s, &mut seeded_rng());

    let (_, shot) = s.spark_shots.iter_active().next().unwrap();
    assert!(approx(shot.velocity.x, 0.0));
    assert!(approx(shot.velocity.y, 320.0));

    // Off to the side: the shot heads toward the player, not straight down.
    let mut s = make_state(GameConfig {
        fire_chance: 1.0,
        ..quiet_config()
    });
    s.enemies.push(enemy_at(0.0, 100.0));
    update_enemies(&mut s, &mut seeded_rng());
    let (_, shot) = s.spark_shots.iter_active().next().unwrap();
    assert!(shot.velocity.x > 0.0);
    assert!(approx(shot.velocity.length(), 320.0));
}

#[test]
fn saturated_shot_pools_drop_requests() {
    let mut s = make_state(GameConfig {
        fire_chance: 1.0,
        enemy_shot_capacity: 1,
        ..quiet_config()
    });
    for i in 0..6 {
        s.enemies.push(enemy_at(50.0 + i as f32 * 60.0, 100.0));
    }
    update_enemies(&mut s, &mut seeded_rng());
    assert_eq!(s.spark_shots.active_count(), 1);
    assert_eq!(s.pulse_shots.active_count(), 1);
}

#[test]
fn uniform_selection_is_reproducible_with_seed() {
    let config = GameConfig {
        fire_chance: 1.0,
        shot_selection: ShotSelection::Uniform,
        ..quiet_config()
    };
    let run = || {
        let mut s = make_state(config.clone());
        for i in 0..10 {
            s.enemies.push(enemy_at(30.0 + i as f32 * 60.0, 100.0));
        }
        update_enemies(&mut s, &mut StdRng::seed_from_u64(7));
        (s.spark_shots.active_count(), s.pulse_shots.active_count())
    };
    let first = run();
    assert_eq!(first.0 + first.1, 10);
    assert_eq!(first, run());
}

// ── Floor ─────────────────────────────────────────────────────────────────────

#[test]
fn formation_enemy_at_floor_is_reported() {
    let mut s = make_state(quiet_config());
    s.enemies.push(enemy_at(100.0, 539.9));
    assert!(update_enemies(&mut s, &mut seeded_rng()));
}

#[test]
fn formation_enemy_at_floor_ends_the_session() {
    let mut s = make_state(quiet_config());
    s.enemies.push(enemy_at(100.0, 539.9));

    tick(&mut s, &TickInput::default(), &mut seeded_rng());

    assert_eq!(s.session.status(), GameStatus::GameOver);
    assert!(s.events.contains(&GameEvent::GameOver {
        score: 0,
        cause: GameOverCause::EnemyReachedFloor,
    }));
}

#[test]
fn diving_enemy_below_floor_is_not_game_over() {
    let mut s = make_state(quiet_config());
    let mut e = enemy_at(100.0, 560.0);
    e.state = EnemyState::Diving;
    e.velocity = Vec2::new(0.0, 320.0);
    s.enemies.push(e);

    tick(&mut s, &TickInput::default(), &mut seeded_rng());

    assert_eq!(s.session.status(), GameStatus::Active);
    assert_eq!(s.enemies.len(), 1);
}
