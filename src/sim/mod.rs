//! Simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep, scaled to a 60 Hz reference frame
//! - Seeded RNG only
//! - Timed work runs through the session's scheduler at frame boundaries
//! - Drawing goes through the `Painter` seam, never a concrete backend

pub mod collision;
pub mod effects;
pub mod entities;
pub mod input;
pub mod level;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Rect, Viewport, collide};
pub use effects::{BurstSize, ScreenShake};
pub use entities::{Enemy, Entity, Particle, Player, Projectile};
pub use input::{InputSnapshot, Pointer};
pub use level::{LEVEL_TABLE, LevelColor, LevelConfig, LevelPhase, level_config, spawn_interval_ms};
pub use schedule::{Scheduler, TaskHandle, TaskKind};
pub use state::{GameEvent, HudSnapshot, Panel, Session, SoundCue};
