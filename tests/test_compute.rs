use wave_shooter::compute::*;
use wave_shooter::config::GameConfig;
use wave_shooter::entities::*;
use wave_shooter::state::GameState;
use wave_shooter::vec2::Vec2;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_config() -> GameConfig {
    GameConfig {
        fire_chance: 0.0,
        dive_chance: 0.0,
        drop_chance: 0.0,
        ..GameConfig::default()
    }
}

/// Empty 600 × 600 arena, player at (300, 540).
fn make_state() -> GameState {
    GameState::new(quiet_config(), 600.0, 600.0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn fire() -> TickInput {
    TickInput {
        fire_pressed: true,
        ..TickInput::default()
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_places_player_and_first_wave() {
    let s = init_state(GameConfig::default(), 600.0, 600.0, &mut seeded_rng());
    assert_eq!(s.player.position, Vec2::new(300.0, 540.0));
    assert_eq!(s.enemies.len(), 30);
    assert_eq!(s.session.health(), 3);
    assert_eq!(s.session.wave(), 1);
    assert_eq!(s.tick, 0);
    assert_eq!(s.pooled_active(), 0);
    assert_eq!(s.events, vec![GameEvent::WaveSpawned { wave: 1, enemies: 30 }]);
}

// ── move_player ───────────────────────────────────────────────────────────────

#[test]
fn move_player_steps_by_speed() {
    let mut s = make_state();
    move_player(&mut s, Horizontal::Right);
    // 360 units/s at 60 ticks/s
    assert!(approx(s.player.position.x, 306.0));
    assert_eq!(s.player.velocity, Vec2::new(360.0, 0.0));

    move_player(&mut s, Horizontal::None);
    assert!(approx(s.player.position.x, 306.0));
    assert_eq!(s.player.velocity, Vec2::ZERO);
}

#[test]
fn move_player_clamps_to_arena() {
    let mut s = make_state();
    for _ in 0..100 {
        move_player(&mut s, Horizontal::Right);
    }
    assert!(approx(s.player.position.x, 584.0));

    for _ in 0..200 {
        move_player(&mut s, Horizontal::Left);
    }
    assert!(approx(s.player.position.x, 16.0));
    assert_eq!(s.player.position.y, 540.0);
}

#[test]
fn resize_keeps_player_inside() {
    let mut s = make_state();
    s.player.position.x = 500.0;
    s.resize(200.0, 400.0);
    assert!(approx(s.player.position.x, 184.0));
    assert_eq!(s.player.position.y, 340.0);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn player_shoot_spawns_above_player() {
    let mut s = make_state();
    assert!(player_shoot(&mut s));

    let (_, shot) = s.player_shots.iter_active().next().unwrap();
    assert_eq!(shot.position, Vec2::new(300.0, 520.0));
    assert_eq!(shot.velocity, Vec2::new(0.0, -550.0));
    assert_eq!(s.player.fire_cooldown, 15);

    // Still cooling down.
    assert!(!player_shoot(&mut s));
    assert_eq!(s.player_shots.active_count(), 1);
}

#[test]
fn held_fire_respects_cooldown() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..16 {
        tick(&mut s, &fire(), &mut rng);
    }
    assert_eq!(s.player_shots.active_count(), 2);
}

#[test]
fn player_shots_are_capped_by_pool() {
    let mut s = GameState::new(
        GameConfig {
            fire_cooldown_ticks: 0,
            ..quiet_config()
        },
        600.0,
        600.0,
    );
    let mut rng = seeded_rng();
    for _ in 0..20 {
        tick(&mut s, &fire(), &mut rng);
    }
    assert_eq!(s.player_shots.active_count(), 12);
    assert!(!player_shoot(&mut s));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn shots_travel_each_tick() {
    let mut s = make_state();
    player_shoot(&mut s);
    tick(&mut s, &TickInput::default(), &mut seeded_rng());

    let (_, shot) = s.player_shots.iter_active().next().unwrap();
    assert!(approx(shot.position.y, 520.0 - 550.0 / 60.0));
    assert_eq!(s.tick, 1);
}

#[test]
fn shots_leaving_the_arena_are_culled() {
    let mut s = make_state();
    s.player_shots
        .acquire(Vec2::new(300.0, -35.0), Vec2::new(0.0, -550.0))
        .unwrap();
    s.items
        .acquire(Vec2::new(300.0, 639.0), Vec2::new(0.0, 120.0))
        .unwrap();

    tick(&mut s, &TickInput::default(), &mut seeded_rng());

    assert_eq!(s.player_shots.active_count(), 0);
    assert_eq!(s.items.active_count(), 0);
}

#[test]
fn hit_flash_clears_after_its_delay() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at_player = s.player.position;
    s.spark_shots.acquire(at_player, Vec2::ZERO).unwrap();

    tick(&mut s, &TickInput::default(), &mut rng);
    assert!(s.player.hit_flash);
    assert!(s.events.contains(&GameEvent::PlayerHit { health: 2 }));

    for _ in 2..7 {
        tick(&mut s, &TickInput::default(), &mut rng);
        assert!(s.player.hit_flash);
    }
    tick(&mut s, &TickInput::default(), &mut rng);
    assert_eq!(s.tick, 7);
    assert!(!s.player.hit_flash);
}

#[test]
fn second_hit_extends_the_flash() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let at_player = s.player.position;
    s.spark_shots.acquire(at_player, Vec2::ZERO).unwrap();
    tick(&mut s, &TickInput::default(), &mut rng);

    for _ in 2..4 {
        tick(&mut s, &TickInput::default(), &mut rng);
    }
    s.spark_shots.acquire(at_player, Vec2::ZERO).unwrap();
    tick(&mut s, &TickInput::default(), &mut rng);
    assert_eq!(s.tick, 4);
    assert_eq!(s.player.hit_flash_until, 10);

    // The first hit's clear at tick 7 no longer applies.
    for _ in 5..10 {
        tick(&mut s, &TickInput::default(), &mut rng);
        assert!(s.player.hit_flash);
    }
    tick(&mut s, &TickInput::default(), &mut rng);
    assert_eq!(s.tick, 10);
    assert!(!s.player.hit_flash);
}

#[test]
fn events_only_cover_the_latest_tick() {
    let mut s = init_state(quiet_config(), 600.0, 600.0, &mut seeded_rng());
    assert!(!s.events.is_empty());
    tick(&mut s, &TickInput::default(), &mut seeded_rng());
    assert!(s.events.is_empty());
}
