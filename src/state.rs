//! The single context object owned by the tick driver.
//!
//! Every subsystem receives `&mut GameState` (plus the injected RNG) instead
//! of reaching for shared globals. The presentation layer only ever reads it.

use crate::config::GameConfig;
use crate::entities::{
    Category, Enemy, EnemyState, EntityView, GameEvent, PoolId, Player, ShotKind,
};
use crate::pool::EntityPool;
use crate::session::GameSession;
use crate::vec2::{Aabb, Vec2};

/// Current arena size. Supplied from outside and free to change between
/// ticks, so layout values are derived from it on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Formation enemies at or below this line end the session.
    pub fn floor_y(&self, config: &GameConfig) -> f32 {
        self.height - config.floor_margin
    }

    pub fn player_row(&self, config: &GameConfig) -> f32 {
        self.height - config.player_row_offset
    }

    /// Diving enemies below this line have left the arena.
    pub fn exit_y(&self, config: &GameConfig) -> f32 {
        self.height + config.exit_margin
    }

    /// Pooled bodies outside this box are culled.
    pub fn cull_bounds(&self, margin: f32) -> Aabb {
        Aabb {
            min: Vec2::new(-margin, -margin),
            max: Vec2::new(self.width + margin, self.height + margin),
        }
    }

    /// Clamp a player x so its hitbox stays inside the arena.
    pub fn clamp_player_x(&self, x: f32, half_width: f32) -> f32 {
        if self.width <= half_width * 2.0 {
            self.width / 2.0
        } else {
            x.clamp(half_width, self.width - half_width)
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub arena: Arena,
    pub player: Player,
    /// Live enemy set. Not pooled: wave composition changes every wave.
    pub enemies: Vec<Enemy>,
    pub player_shots: EntityPool,
    pub spark_shots: EntityPool,
    pub pulse_shots: EntityPool,
    pub items: EntityPool,
    pub session: GameSession,
    /// Ticks since the session (re)started.
    pub tick: u64,
    pub next_enemy_id: u32,
    /// Kind the next enemy shot uses under alternating selection.
    pub next_shot: ShotKind,
    /// Events raised during the most recent tick.
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Empty arena with no wave spawned yet.
    pub fn new(config: GameConfig, width: f32, height: f32) -> Self {
        let arena = Arena::new(width, height);
        let player = Player {
            position: Vec2::new(width / 2.0, arena.player_row(&config)),
            velocity: Vec2::ZERO,
            fire_cooldown: 0,
            hit_flash: false,
            hit_flash_until: 0,
        };
        Self {
            player_shots: EntityPool::new(Category::PlayerProjectile, config.player_shot_capacity),
            spark_shots: EntityPool::new(Category::EnemyProjectile, config.enemy_shot_capacity),
            pulse_shots: EntityPool::new(Category::EnemyProjectile, config.enemy_shot_capacity),
            items: EntityPool::new(Category::Item, config.item_capacity),
            session: GameSession::new(&config),
            config,
            arena,
            player,
            enemies: Vec::new(),
            tick: 0,
            next_enemy_id: 0,
            next_shot: ShotKind::Spark,
            events: Vec::new(),
        }
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f32 {
        self.tick as f32 * self.config.dt()
    }

    pub fn pool(&self, id: PoolId) -> &EntityPool {
        match id {
            PoolId::PlayerShots => &self.player_shots,
            PoolId::EnemyShots(ShotKind::Spark) => &self.spark_shots,
            PoolId::EnemyShots(ShotKind::Pulse) => &self.pulse_shots,
            PoolId::Items => &self.items,
        }
    }

    pub fn pool_mut(&mut self, id: PoolId) -> &mut EntityPool {
        match id {
            PoolId::PlayerShots => &mut self.player_shots,
            PoolId::EnemyShots(ShotKind::Spark) => &mut self.spark_shots,
            PoolId::EnemyShots(ShotKind::Pulse) => &mut self.pulse_shots,
            PoolId::Items => &mut self.items,
        }
    }

    pub fn pools_mut(&mut self) -> [&mut EntityPool; 4] {
        [
            &mut self.player_shots,
            &mut self.spark_shots,
            &mut self.pulse_shots,
            &mut self.items,
        ]
    }

    /// Active entities across every pool.
    pub fn pooled_active(&self) -> usize {
        self.player_shots.active_count()
            + self.spark_shots.active_count()
            + self.pulse_shots.active_count()
            + self.items.active_count()
    }

    /// Apply a new arena size. Only the player row follows immediately;
    /// enemies already in play keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Arena::new(width, height);
        self.player.position.y = self.arena.player_row(&self.config);
        self.player.position.x = self
            .arena
            .clamp_player_x(self.player.position.x, self.config.player_half.x);
    }

    /// Everything the presentation layer needs to draw a frame.
    pub fn entities(&self) -> Vec<EntityView> {
        let mut views = Vec::with_capacity(1 + self.enemies.len() + self.pooled_active());
        views.push(EntityView {
            category: Category::Player,
            position: self.player.position,
            shot: None,
            flash: self.player.hit_flash,
            diving: false,
        });
        views.extend(self.enemies.iter().map(|e| EntityView {
            category: Category::Enemy,
            position: e.position,
            shot: None,
            flash: false,
            diving: e.state == EnemyState::Diving,
        }));
        let pools = [
            (&self.player_shots, None),
            (&self.spark_shots, Some(ShotKind::Spark)),
            (&self.pulse_shots, Some(ShotKind::Pulse)),
            (&self.items, None),
        ];
        for (pool, shot) in pools {
            views.extend(pool.iter_active().map(|(_, e)| EntityView {
                category: e.category,
                position: e.position,
                shot,
                flash: false,
                diving: false,
            }));
        }
        views
    }
}
