/// All game entity types: pure data, no logic.

use crate::pool::Handle;
use crate::vec2::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Player,
    Enemy,
    PlayerProjectile,
    EnemyProjectile,
    Item,
}

/// The two enemy shot kinds, each backed by its own pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    Spark,
    Pulse,
}

impl ShotKind {
    pub fn other(self) -> Self {
        match self {
            ShotKind::Spark => ShotKind::Pulse,
            ShotKind::Pulse => ShotKind::Spark,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
    None,
}

/// Input sampled once per tick by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickInput {
    pub horizontal: Horizontal,
    /// Edge-triggered: true only on the tick the fire control went down.
    pub fire_pressed: bool,
    /// Edge-triggered pointer press; fires while playing, restarts when over.
    pub pointer_pressed: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            horizontal: Horizontal::None,
            fire_pressed: false,
            pointer_pressed: false,
        }
    }
}

// ── Pooled bodies ─────────────────────────────────────────────────────────────

/// A pooled actor: projectile or item.
///
/// An inactive entity is inert: it never moves, collides or renders, and its
/// position is meaningless until the slot is acquired again.
#[derive(Clone, Debug)]
pub struct Entity {
    pub category: Category,
    pub position: Vec2,
    pub velocity: Vec2,
    pub active: bool,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Ticks left before the next shot is allowed.
    pub fire_cooldown: u32,
    /// Set on damage, cleared by a deferred action.
    pub hit_flash: bool,
    /// Tick at which the latest hit's flash ends.
    pub hit_flash_until: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyState {
    /// Lateral oscillation plus steady descent.
    Formation,
    /// Fixed pursuit vector captured at the moment the dive began.
    Diving,
    /// Left the arena after a dive; removed at the end of the behavior pass.
    Exited,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    /// Unique within a session, for presentation bookkeeping.
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Oscillation phase offset in [0, 2π).
    pub phase: f32,
    pub state: EnemyState,
}

// ── Despawn contract ──────────────────────────────────────────────────────────

/// Identifies one of the fixed-capacity pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolId {
    PlayerShots,
    EnemyShots(ShotKind),
    Items,
}

/// How something that has hit (or been hit) leaves play.
///
/// Enemies are destroyed outright; every pooled body goes back to its pool.
/// Collision handling dispatches on this tag alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Despawn {
    /// Index into the live enemy set.
    Destroyed { enemy: usize },
    Pooled { pool: PoolId, handle: Handle },
}

// ── Session-facing values ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    WaveClearing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverCause {
    OutOfHealth,
    EnemyReachedFloor,
}

/// Banner currently requested from the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    WaveCleared(u32),
    GameOver,
}

/// One-shot notification emitted during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    WaveSpawned { wave: u32, enemies: usize },
    EnemyKilled { position: Vec2, combo: u32, points: u64 },
    ItemDropped { position: Vec2 },
    ItemCollected { health: u32 },
    PlayerHit { health: u32 },
    WaveCleared { wave: u32 },
    GameOver { score: u64, cause: GameOverCause },
    Restarted,
}

/// Read-only view of one live actor for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityView {
    pub category: Category,
    pub position: Vec2,
    /// Enemy shot kind, for projectiles fired by enemies.
    pub shot: Option<ShotKind>,
    /// Player tint after a hit.
    pub flash: bool,
    pub diving: bool,
}
