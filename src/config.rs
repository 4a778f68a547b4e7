//! Tunables for one play session.
//!
//! Every width/height dependent value is derived from the live arena at the
//! moment it is needed; nothing here caches arena geometry.

use crate::vec2::Vec2;

/// How an enemy picks which of the two shot pools to fire from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotSelection {
    /// Toggle between the two kinds on every successful fire trial.
    Alternating,
    /// Fair coin flip per shot.
    Uniform,
}

/// What happens to a diving enemy once it has left the bottom of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiveExitPolicy {
    /// Removed from the live set for good.
    Destroy,
    /// Back to formation, re-entering from above at a random column.
    Recycle,
}

/// Where enemy shots are aimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyAim {
    Player,
    Down,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("tick_rate must be positive, got {0}")]
    TickRate(f32),
    #[error("pool capacity for {0} must be at least 1")]
    PoolCapacity(&'static str),
    #[error("row_cap must be at least 1")]
    RowCap,
    #[error("{0} must be positive, got {1}")]
    NonPositive(&'static str, f32),
    #[error("{0} must lie in [0, 1], got {1}")]
    Probability(&'static str, f64),
    #[error("max_health ({max}) cannot be below starting_health ({starting})")]
    HealthCap { starting: u32, max: u32 },
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Simulation ticks per second
    pub tick_rate: f32,
    /// Seed for the session RNG (None = entropy)
    pub seed: Option<u64>,

    // Player
    pub player_speed: f32,
    /// Distance of the player row above the arena bottom
    pub player_row_offset: f32,
    pub fire_cooldown_ticks: u32,
    pub player_shot_speed: f32,
    pub player_shot_offset: f32,
    pub hit_flash_ticks: u64,

    // Pools
    pub player_shot_capacity: usize,
    pub enemy_shot_capacity: usize,
    pub item_capacity: usize,

    // Waves
    pub base_rows: u32,
    pub rows_per_wave: u32,
    pub row_cap: u32,
    pub column_spacing: f32,
    pub row_spacing: f32,
    pub top_margin: f32,
    pub wave_delay_ticks: u64,
    pub banner_ticks: u64,

    // Enemies
    pub oscillation_amplitude: f32,
    /// Radians per second
    pub oscillation_rate: f32,
    pub descent_speed: f32,
    pub fire_chance: f64,
    pub dive_chance: f64,
    pub enemy_shot_speed: f32,
    pub dive_speed: f32,
    /// Fractional increase of speeds and trial odds per wave after the first
    pub difficulty_per_wave: f32,
    pub enemy_shot_offset: f32,
    /// How far below the arena a diving enemy travels before it counts as exited
    pub exit_margin: f32,
    /// Height above the arena bottom that formation enemies must not reach
    pub floor_margin: f32,
    pub shot_selection: ShotSelection,
    pub dive_exit: DiveExitPolicy,
    pub enemy_aim: EnemyAim,

    // Economy
    pub starting_health: u32,
    pub max_health: u32,
    pub base_score: u64,
    pub drop_chance: f64,
    pub item_speed: f32,

    // Hitboxes (half extents)
    pub player_half: Vec2,
    pub enemy_half: Vec2,
    pub shot_half: Vec2,
    pub item_half: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            seed: None,

            player_speed: 360.0,
            player_row_offset: 60.0,
            fire_cooldown_ticks: 15,
            player_shot_speed: 550.0,
            player_shot_offset: 20.0,
            hit_flash_ticks: 6,

            player_shot_capacity: 12,
            enemy_shot_capacity: 15,
            item_capacity: 8,

            base_rows: 3,
            rows_per_wave: 1,
            row_cap: 6,
            column_spacing: 60.0,
            row_spacing: 50.0,
            top_margin: 80.0,
            wave_delay_ticks: 120,
            banner_ticks: 90,

            oscillation_amplitude: 120.0,
            oscillation_rate: 2.0,
            descent_speed: 25.0,
            fire_chance: 0.002,
            dive_chance: 0.001,
            enemy_shot_speed: 320.0,
            dive_speed: 320.0,
            difficulty_per_wave: 0.15,
            enemy_shot_offset: 20.0,
            exit_margin: 40.0,
            floor_margin: 60.0,
            shot_selection: ShotSelection::Alternating,
            dive_exit: DiveExitPolicy::Destroy,
            enemy_aim: EnemyAim::Player,

            starting_health: 3,
            max_health: 5,
            base_score: 10,
            drop_chance: 0.15,
            item_speed: 120.0,

            player_half: Vec2::new(16.0, 16.0),
            enemy_half: Vec2::new(16.0, 12.0),
            shot_half: Vec2::new(3.0, 8.0),
            item_half: Vec2::new(8.0, 8.0),
        }
    }
}

impl GameConfig {
    /// Seconds per tick
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate
    }

    /// Multiplier applied to enemy speeds and trial odds on `wave` (1-based).
    /// Grows monotonically with the wave index.
    pub fn difficulty(&self, wave: u32) -> f32 {
        1.0 + wave.saturating_sub(1) as f32 * self.difficulty_per_wave
    }

    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = std::env::var("SHOOTER_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                config.seed = Some(parsed);
            } else {
                tracing::warn!("Invalid SHOOTER_SEED '{}', using entropy", seed);
            }
        }

        if let Ok(rate) = std::env::var("SHOOTER_TICK_RATE") {
            match rate.parse::<f32>() {
                Ok(parsed) if parsed > 0.0 && parsed <= 240.0 => config.tick_rate = parsed,
                _ => tracing::warn!("SHOOTER_TICK_RATE must be 1-240, got '{}', using default", rate),
            }
        }

        if let Ok(policy) = std::env::var("SHOOTER_DIVE_EXIT") {
            match policy.to_ascii_lowercase().as_str() {
                "destroy" => config.dive_exit = DiveExitPolicy::Destroy,
                "recycle" => config.dive_exit = DiveExitPolicy::Recycle,
                _ => tracing::warn!("Invalid SHOOTER_DIVE_EXIT '{}', using default", policy),
            }
        }

        if let Ok(selection) = std::env::var("SHOOTER_SHOT_SELECTION") {
            match selection.to_ascii_lowercase().as_str() {
                "alternating" => config.shot_selection = ShotSelection::Alternating,
                "uniform" => config.shot_selection = ShotSelection::Uniform,
                _ => tracing::warn!("Invalid SHOOTER_SHOT_SELECTION '{}', using default", selection),
            }
        }

        if let Ok(aim) = std::env::var("SHOOTER_ENEMY_AIM") {
            match aim.to_ascii_lowercase().as_str() {
                "player" => config.enemy_aim = EnemyAim::Player,
                "down" => config.enemy_aim = EnemyAim::Down,
                _ => tracing::warn!("Invalid SHOOTER_ENEMY_AIM '{}', using default", aim),
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate > 0.0) {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        if self.player_shot_capacity == 0 {
            return Err(ConfigError::PoolCapacity("player shots"));
        }
        if self.enemy_shot_capacity == 0 {
            return Err(ConfigError::PoolCapacity("enemy shots"));
        }
        if self.item_capacity == 0 {
            return Err(ConfigError::PoolCapacity("items"));
        }
        if self.row_cap == 0 {
            return Err(ConfigError::RowCap);
        }
        if !(self.column_spacing > 0.0) {
            return Err(ConfigError::NonPositive("column_spacing", self.column_spacing));
        }
        for (name, p) in [
            ("fire_chance", self.fire_chance),
            ("dive_chance", self.dive_chance),
            ("drop_chance", self.drop_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Probability(name, p));
            }
        }
        if self.max_health < self.starting_health {
            return Err(ConfigError::HealthCap {
                starting: self.starting_health,
                max: self.max_health,
            });
        }
        Ok(())
    }
}
