//! Session state and lifecycle
//!
//! A [`Session`] owns every entity collection, the score, the level
//! controller and the scheduled tasks. Everything it wants the outside world
//! to do (play a sound, show a panel, refresh the HUD) is queued as a
//! [`GameEvent`] and drained by the host after each frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Viewport;
use super::effects::ScreenShake;
use super::entities::{Enemy, Particle, Player, Projectile};
use super::level::{LevelPhase, level_config, spawn_interval_ms};
use super::schedule::{Scheduler, TaskHandle, TaskKind};
use crate::consts::*;
use crate::settings::Settings;

/// Sound cues the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Shoot,
    Hit,
    Explosion,
    LevelUp,
}

/// Overlay panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Start,
    GameOver,
    /// "LEVEL n" banner shown between levels
    LevelBanner,
}

/// Values shown on the HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub score: u64,
    /// 1-based level number
    pub level: u32,
    pub enemies_left: u32,
    pub health_percent: f32,
}

/// Output from the simulation for audio and UI
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    ShowPanel(Panel),
    HidePanel(Panel),
    LevelTitle(String),
    FinalScore(u64),
    Hud(HudSnapshot),
}

/// One play session, from start until the player dies
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the RNG was created from
    pub seed: u64,
    pub viewport: Viewport,
    pub settings: Settings,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub score: u64,
    /// 0-based index into the level progression
    pub level_index: usize,
    pub enemies_defeated: u32,
    pub level_goal: u32,
    pub running: bool,
    pub phase: LevelPhase,
    pub shake: ScreenShake,
    pub(crate) rng: Pcg32,
    pub(crate) scheduler: Scheduler,
    pub(crate) spawner: Option<TaskHandle>,
    pub(crate) transition: Option<TaskHandle>,
    /// Host time of the last timer poll
    pub(crate) clock_ms: f64,
    pub(crate) events: Vec<GameEvent>,
}

impl Session {
    pub fn new(viewport: Viewport, seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            viewport,
            settings,
            player: Player::new(viewport),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            score: 0,
            level_index: 0,
            enemies_defeated: 0,
            level_goal: level_config(0).goal,
            running: false,
            phase: LevelPhase::Active,
            shake: ScreenShake::new(),
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(),
            spawner: None,
            transition: None,
            clock_ms: 0.0,
            events: Vec::new(),
        }
    }

    /// Begin play at the current level
    pub fn start(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
        self.running = true;
        self.phase = LevelPhase::Active;
        self.level_goal = level_config(self.level_index).goal;
        self.enemies_defeated = 0;

        self.events.push(GameEvent::HidePanel(Panel::Start));
        self.arm_spawner(now_ms);
        self.publish_hud();
        log::info!("Session started at level {}", self.level());
    }

    /// Reset everything to level 1 and start again
    pub fn restart(&mut self, now_ms: f64) {
        // Drops a pending level transition along with the spawner
        self.cancel_timers();

        self.player = Player::new(self.viewport);
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.score = 0;
        self.level_index = 0;
        self.shake.reset();

        self.events.push(GameEvent::HidePanel(Panel::GameOver));
        self.events.push(GameEvent::HidePanel(Panel::LevelBanner));
        log::info!("Session restarted");
        self.start(now_ms);
    }

    /// End the run and show the final score
    pub fn stop(&mut self) {
        self.running = false;
        self.cancel_timers();
        self.events.push(GameEvent::FinalScore(self.score));
        self.events.push(GameEvent::ShowPanel(Panel::GameOver));
        log::info!(
            "Session over: score {} at level {}",
            self.score,
            self.level()
        );
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.clamp_to(viewport);
    }

    /// Run scheduled tasks that are due at `now_ms`
    pub fn tick_timers(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
        for kind in self.scheduler.due(now_ms) {
            match kind {
                TaskKind::SpawnEnemy => {
                    if self.running && !self.phase.is_transitioning() {
                        self.spawn_enemy();
                    }
                }
                TaskKind::FinishLevelTransition => {
                    self.transition = None;
                    self.finish_transition(now_ms);
                }
            }
        }
    }

    /// Place one enemy just outside a random viewport edge
    pub fn spawn_enemy(&mut self) {
        let config = level_config(self.level_index);
        let Viewport { width, height } = self.viewport;
        let pos = match self.rng.random_range(0..4) {
            0 => Vec2::new(self.rng.random::<f32>() * width, -ENEMY_SPAWN_MARGIN),
            1 => Vec2::new(width + ENEMY_SPAWN_MARGIN, self.rng.random::<f32>() * height),
            2 => Vec2::new(self.rng.random::<f32>() * width, height + ENEMY_SPAWN_MARGIN),
            _ => Vec2::new(-ENEMY_SPAWN_MARGIN, self.rng.random::<f32>() * height),
        };
        let speed = config.enemy_speed + self.rng.random::<f32>();
        let color = config.color.resolve(&mut self.rng);

        log::debug!("Spawned enemy at ({:.0}, {:.0})", pos.x, pos.y);
        self.enemies.push(Enemy::new(pos, speed, config.enemy_hp, color));
    }

    /// Pause spawning and show the banner for the next level
    pub fn begin_transition(&mut self) {
        if self.phase.is_transitioning() {
            return;
        }
        let next_index = self.level_index + 1;
        self.phase = LevelPhase::Transitioning { next_index };

        if let Some(handle) = self.spawner.take() {
            self.scheduler.cancel(handle);
        }

        self.events
            .push(GameEvent::LevelTitle(format!("LEVEL {}", next_index + 1)));
        self.events.push(GameEvent::ShowPanel(Panel::LevelBanner));
        self.transition = Some(self.scheduler.after(
            TaskKind::FinishLevelTransition,
            self.clock_ms,
            LEVEL_TRANSITION_MS,
        ));
        log::info!("Level {} cleared", self.level());
    }

    /// Load the next level once the banner has been shown
    pub fn finish_transition(&mut self, now_ms: f64) {
        let LevelPhase::Transitioning { next_index } = self.phase else {
            return;
        };

        self.events.push(GameEvent::HidePanel(Panel::LevelBanner));
        self.level_index = next_index;
        self.level_goal = level_config(next_index).goal;
        self.enemies_defeated = 0;
        self.player.heal(LEVEL_UP_HEAL);
        self.phase = LevelPhase::Active;

        self.arm_spawner(now_ms);
        self.events.push(GameEvent::Sound(SoundCue::LevelUp));
        log::info!("Level {} begins", self.level());
    }

    /// (Re)create the spawner at the current level's rate
    fn arm_spawner(&mut self, now_ms: f64) {
        if let Some(handle) = self.spawner.take() {
            self.scheduler.cancel(handle);
        }
        let interval = spawn_interval_ms(self.level_index);
        self.spawner = Some(self.scheduler.every(TaskKind::SpawnEnemy, now_ms, interval));
        log::debug!("Spawner armed every {interval} ms");
    }

    fn cancel_timers(&mut self) {
        self.scheduler.cancel_all();
        self.spawner = None;
        self.transition = None;
    }

    pub fn is_spawner_armed(&self) -> bool {
        self.spawner.is_some_and(|h| self.scheduler.is_pending(h))
    }

    pub fn has_pending_transition(&self) -> bool {
        self.transition.is_some_and(|h| self.scheduler.is_pending(h))
    }

    /// 1-based level number
    pub fn level(&self) -> u32 {
        self.level_index as u32 + 1
    }

    pub fn enemies_left(&self) -> u32 {
        self.level_goal.saturating_sub(self.enemies_defeated)
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            level: self.level(),
            enemies_left: self.enemies_left(),
            health_percent: self.player.health_percent(),
        }
    }

    pub(crate) fn publish_hud(&mut self) {
        let hud = self.hud();
        self.events.push(GameEvent::Hud(hud));
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Viewport::new(800.0, 600.0), 42, Settings::default())
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session();
        assert!(!s.running);
        assert_eq!(s.level(), 1);
        assert_eq!(s.level_goal, 10);
        assert!(!s.is_spawner_armed());
    }

    #[test]
    fn test_start_arms_spawner() {
        let mut s = session();
        s.start(0.0);
        assert!(s.running);
        assert!(s.is_spawner_armed());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::HidePanel(Panel::Start)));
        assert!(matches!(events.last(), Some(GameEvent::Hud(_))));
    }

    #[test]
    fn test_spawner_fires_at_level_rate() {
        let mut s = session();
        s.start(0.0);
        s.tick_timers(1999.0);
        assert!(s.enemies.is_empty());
        s.tick_timers(2000.0);
        assert_eq!(s.enemies.len(), 1);
        s.tick_timers(4000.0);
        assert_eq!(s.enemies.len(), 2);
    }

    #[test]
    fn test_spawn_outside_an_edge() {
        let mut s = session();
        for _ in 0..64 {
            s.spawn_enemy();
        }
        for enemy in &s.enemies {
            let Vec2 { x, y } = enemy.pos;
            let on_edge = y == -ENEMY_SPAWN_MARGIN
                || y == 600.0 + ENEMY_SPAWN_MARGIN
                || x == -ENEMY_SPAWN_MARGIN
                || x == 800.0 + ENEMY_SPAWN_MARGIN;
            assert!(on_edge, "spawned at {x}, {y}");
            assert!(enemy.speed >= 2.0 && enemy.speed < 3.0);
            assert_eq!(enemy.hp, 30.0);
        }
    }

    #[test]
    fn test_transition_cycle() {
        let mut s = session();
        s.start(0.0);
        s.player.hp = 50.0;
        s.begin_transition();
        assert!(s.phase.is_transitioning());
        assert!(!s.is_spawner_armed());
        assert!(s.has_pending_transition());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelTitle("LEVEL 2".to_string())));
        assert!(events.contains(&GameEvent::ShowPanel(Panel::LevelBanner)));

        s.tick_timers(1999.0);
        assert_eq!(s.level_index, 0);
        s.tick_timers(2000.0);
        assert_eq!(s.level_index, 1);
        assert_eq!(s.level_goal, 15);
        assert_eq!(s.enemies_defeated, 0);
        assert_eq!(s.player.hp, 70.0);
        assert_eq!(s.phase, LevelPhase::Active);
        assert!(s.is_spawner_armed());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::HidePanel(Panel::LevelBanner)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::LevelUp)));
    }

    #[test]
    fn test_no_spawns_during_transition() {
        let mut s = session();
        s.start(0.0);
        s.tick_timers(1000.0);
        s.begin_transition();
        s.tick_timers(2500.0);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_restart_cancels_pending_transition() {
        let mut s = session();
        s.start(0.0);
        s.score = 900;
        s.spawn_enemy();
        s.begin_transition();
        s.restart(100.0);

        assert_eq!(s.score, 0);
        assert_eq!(s.level_index, 0);
        assert!(s.enemies.is_empty());
        assert!(s.projectiles.is_empty());
        assert!(s.particles.is_empty());
        assert!(!s.has_pending_transition());

        // The old banner timeout would have fired at 2000
        s.tick_timers(2050.0);
        assert_eq!(s.level_index, 0);
        assert_eq!(s.phase, LevelPhase::Active);
        assert!(s.enemies.is_empty());

        // Spawner restarted at the level 1 rate from the restart time
        s.tick_timers(2100.0);
        assert_eq!(s.enemies.len(), 1);
    }

    #[test]
    fn test_stop_cancels_everything() {
        let mut s = session();
        s.start(0.0);
        s.score = 300;
        s.stop();
        assert!(!s.running);
        assert!(!s.is_spawner_armed());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::FinalScore(300)));
        assert!(events.contains(&GameEvent::ShowPanel(Panel::GameOver)));
        s.tick_timers(10_000.0);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_resize_reclamps_player() {
        let mut s = session();
        s.player.pos = Vec2::new(700.0, 500.0);
        s.resize(Viewport::new(400.0, 300.0));
        assert_eq!(s.player.pos, Vec2::new(360.0, 260.0));
    }

    #[test]
    fn test_enemies_left_never_negative() {
        let mut s = session();
        s.enemies_defeated = 12;
        assert_eq!(s.enemies_left(), 0);
    }
}
