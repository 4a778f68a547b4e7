/// Tick driver.
///
/// Every public function takes the mutable `GameState` (and, where needed, an
/// RNG handle). Side effects are limited to that state and the injected RNG,
/// so a seeded RNG makes a whole session reproducible.

use rand::Rng;
use tracing::info;

use crate::behavior;
use crate::collision;
use crate::config::GameConfig;
use crate::deferred::DeferredAction;
use crate::entities::{GameEvent, Horizontal, ShotKind, TickInput};
use crate::spawn;
use crate::state::GameState;
use crate::vec2::Vec2;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for the given arena and spawn wave 1.
pub fn init_state(config: GameConfig, width: f32, height: f32, rng: &mut impl Rng) -> GameState {
    let mut state = GameState::new(config, width, height);
    spawn::create_wave(&mut state, 1, rng);
    state
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Set the player's horizontal velocity from the intent and move it, keeping
/// the player inside the arena.
pub fn move_player(state: &mut GameState, horizontal: Horizontal) {
    let speed = state.config.player_speed;
    state.player.velocity = match horizontal {
        Horizontal::Left => Vec2::new(-speed, 0.0),
        Horizontal::Right => Vec2::new(speed, 0.0),
        Horizontal::None => Vec2::ZERO,
    };
    let x = state.player.position.x + state.player.velocity.x * state.config.dt();
    state.player.position = Vec2::new(
        state.arena.clamp_player_x(x, state.config.player_half.x),
        state.arena.player_row(&state.config),
    );
}

/// Fire a player shot if the cooldown allows and the pool has room.
/// Returns whether a shot was spawned.
pub fn player_shoot(state: &mut GameState) -> bool {
    if state.player.fire_cooldown > 0 || state.player_shots.is_full() {
        return false;
    }
    let origin = state.player.position - Vec2::new(0.0, state.config.player_shot_offset);
    let velocity = Vec2::new(0.0, -state.config.player_shot_speed);
    state.player_shots.acquire(origin, velocity);
    state.player.fire_cooldown = state.config.fire_cooldown_ticks;
    true
}

// ── Session control ──────────────────────────────────────────────────────────

/// Throw away the whole session and start again from wave 1.
///
/// Counters return to their initial values, every pool is emptied and every
/// pending deferred action is dropped without firing.
pub fn restart(state: &mut GameState, rng: &mut impl Rng) {
    state.session.restart();
    for pool in state.pools_mut() {
        pool.clear();
    }
    state.enemies.clear();
    state.tick = 0;
    state.next_enemy_id = 0;
    state.next_shot = ShotKind::Spark;
    state.player.velocity = Vec2::ZERO;
    state.player.fire_cooldown = 0;
    state.player.hit_flash = false;
    state.player.hit_flash_until = 0;
    state.player.position = Vec2::new(
        state.arena.width / 2.0,
        state.arena.player_row(&state.config),
    );

    info!("session restarted");
    state.events.clear();
    state.events.push(GameEvent::Restarted);
    spawn::create_wave(state, 1, rng);
}

fn apply_deferred(state: &mut GameState, action: DeferredAction, rng: &mut impl Rng) {
    match action {
        DeferredAction::SpawnWave(wave) => {
            spawn::create_wave(state, wave, rng);
        }
        DeferredAction::DismissBanner => state.session.dismiss_banner(),
        // A later hit extends the flash past earlier clears.
        DeferredAction::ClearHitFlash => {
            if state.tick >= state.player.hit_flash_until {
                state.player.hit_flash = false;
            }
        }
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one tick.
///
/// Phase order: player, enemies, projectile and item motion, collisions,
/// culling, due deferred actions, session transitions. Once the session is
/// over nothing moves; a pointer press restarts it.
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) {
    state.events.clear();

    if state.session.is_over() {
        if input.pointer_pressed {
            restart(state, rng);
        }
        return;
    }

    state.tick += 1;
    let dt = state.config.dt();

    // ── 1. Player ────────────────────────────────────────────────────────────
    move_player(state, input.horizontal);
    state.player.fire_cooldown = state.player.fire_cooldown.saturating_sub(1);
    if input.fire_pressed || input.pointer_pressed {
        player_shoot(state);
    }

    // ── 2. Enemies ───────────────────────────────────────────────────────────
    let floor_breached = behavior::update_enemies(state, rng);

    // ── 3. Projectiles & items ───────────────────────────────────────────────
    for pool in state.pools_mut() {
        pool.translate(dt);
    }

    // ── 4. Collisions ────────────────────────────────────────────────────────
    collision::resolve(state, rng);

    // ── 5. Cleanup ───────────────────────────────────────────────────────────
    let bounds = state.arena.cull_bounds(state.config.exit_margin);
    for pool in state.pools_mut() {
        pool.retain_within(&bounds);
    }

    // ── 6. Deferred actions ──────────────────────────────────────────────────
    for action in state.session.drain_due(state.tick) {
        apply_deferred(state, action, rng);
    }

    // ── 7. Session transitions ───────────────────────────────────────────────
    let live = state.enemies.len();
    if let Some(event) =
        state
            .session
            .check_transitions(state.tick, live, floor_breached, &state.config)
    {
        state.events.push(event);
    }
}
