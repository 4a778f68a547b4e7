//! Session counters and the Active / WaveClearing / GameOver state machine.

use tracing::info;

use crate::config::GameConfig;
use crate::deferred::{DeferredAction, DeferredActionQueue};
use crate::entities::{Banner, GameEvent, GameOverCause, GameStatus};

#[derive(Debug, Clone)]
pub struct GameSession {
    health: u32,
    starting_health: u32,
    max_health: u32,
    score: u64,
    combo: u32,
    base_score: u64,
    wave: u32,
    status: GameStatus,
    cause: Option<GameOverCause>,
    banner: Option<Banner>,
    /// Live enemy count seen by the previous end-of-tick check.
    observed_enemies: usize,
    deferred: DeferredActionQueue,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            health: config.starting_health,
            starting_health: config.starting_health,
            max_health: config.max_health,
            score: 0,
            combo: 0,
            base_score: config.base_score,
            wave: 1,
            status: GameStatus::Active,
            cause: None,
            banner: None,
            observed_enemies: 0,
            deferred: DeferredActionQueue::new(),
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn game_over_cause(&self) -> Option<GameOverCause> {
        self.cause
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    pub fn schedule(&mut self, deadline: u64, action: DeferredAction) {
        self.deferred.schedule(deadline, action);
    }

    pub fn drain_due(&mut self, now: u64) -> Vec<DeferredAction> {
        self.deferred.drain_due(now)
    }

    pub fn dismiss_banner(&mut self) {
        if matches!(self.banner, Some(Banner::WaveCleared(_))) {
            self.banner = None;
        }
    }

    /// Credit one kill. The combo grows first, so the Nth unbroken kill is
    /// worth `base_score * N`. Returns the points awarded.
    pub fn register_kill(&mut self) -> u64 {
        self.combo += 1;
        let points = self.base_score * self.combo as u64;
        self.score += points;
        points
    }

    /// Lose one health and the combo. Returns the remaining health.
    pub fn take_damage(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.combo = 0;
        self.health
    }

    /// Gain one health up to the cap. Returns the new health.
    pub fn heal(&mut self) -> u32 {
        self.health = (self.health + 1).min(self.max_health);
        self.health
    }

    /// A freshly spawned wave puts a clearing session back into play.
    ///
    /// `live_enemies` becomes the baseline for the next clear check, so a wave
    /// emptied on the very first tick after spawning still clears.
    pub fn wave_started(&mut self, wave: u32, live_enemies: usize) {
        if self.status == GameStatus::WaveClearing {
            self.status = GameStatus::Active;
        }
        self.wave = wave;
        self.observed_enemies = live_enemies;
    }

    fn end(&mut self, cause: GameOverCause) -> GameEvent {
        self.status = GameStatus::GameOver;
        self.cause = Some(cause);
        self.banner = Some(Banner::GameOver);
        info!(score = self.score, wave = self.wave, ?cause, "game over");
        GameEvent::GameOver {
            score: self.score,
            cause,
        }
    }

    /// End-of-tick transition check.
    ///
    /// Game over wins over wave clear. The wave clear is edge-triggered on the
    /// live enemy count falling from above zero to zero, and schedules the next
    /// wave plus the banner dismissal rather than spawning immediately.
    pub fn check_transitions(
        &mut self,
        now: u64,
        live_enemies: usize,
        floor_breached: bool,
        config: &GameConfig,
    ) -> Option<GameEvent> {
        let previous = std::mem::replace(&mut self.observed_enemies, live_enemies);
        if self.is_over() {
            return None;
        }
        if self.health == 0 {
            return Some(self.end(GameOverCause::OutOfHealth));
        }
        if floor_breached {
            return Some(self.end(GameOverCause::EnemyReachedFloor));
        }
        if self.status == GameStatus::Active && previous > 0 && live_enemies == 0 {
            let cleared = self.wave;
            let next = cleared + 1;
            self.status = GameStatus::WaveClearing;
            self.banner = Some(Banner::WaveCleared(cleared));
            self.wave = next;
            self.deferred
                .schedule(now + config.wave_delay_ticks, DeferredAction::SpawnWave(next));
            self.deferred
                .schedule(now + config.banner_ticks, DeferredAction::DismissBanner);
            info!(wave = cleared, score = self.score, "wave cleared");
            return Some(GameEvent::WaveCleared { wave: cleared });
        }
        None
    }

    /// Back to the initial counters with nothing pending.
    pub fn restart(&mut self) {
        self.health = self.starting_health;
        self.score = 0;
        self.combo = 0;
        self.wave = 1;
        self.status = GameStatus::Active;
        self.cause = None;
        self.banner = None;
        self.observed_enemies = 0;
        self.deferred.clear();
    }
}
