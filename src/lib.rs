//! Neon Swarm - A top-down arena shooter against homing swarms
//!
//! Core modules:
//! - `sim`: Simulation core (entities, collisions, levels, scheduled tasks)
//! - `renderer`: Draw-command seam plus the WebGPU backend
//! - `clock`: Frame clock feeding elapsed time into the simulation
//! - `audio`: Procedural sound cues
//! - `ui`: HUD/overlay seam driven by simulation events
//! - `settings`: Player-facing configuration

pub mod audio;
pub mod clock;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Distances are CSS pixels, speeds are pixels per reference frame and
/// durations are milliseconds.
pub mod consts {
    /// Frame length the per-frame physics constants were tuned against (60 Hz)
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Longest frame the simulation will integrate in one step
    pub const MAX_FRAME_DT_MS: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_ACCEL: f32 = 0.5;
    /// Velocity multiplier applied every reference frame
    pub const PLAYER_FRICTION: f32 = 0.9;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const SHOOT_INTERVAL_MS: f32 = 150.0;
    /// Turret drawn from the player center along the facing direction
    pub const TURRET_LENGTH: f32 = 30.0;
    pub const TURRET_WIDTH: f32 = 10.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_SIZE: f32 = 10.0;
    pub const PROJECTILE_DAMAGE: f32 = 10.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 30.0;
    /// Enemies appear this far outside a viewport edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 50.0;
    pub const CONTACT_DAMAGE: f32 = 10.0;
    pub const SCORE_PER_KILL: u64 = 100;

    /// Level progression
    pub const LEVEL_TRANSITION_MS: f64 = 2000.0;
    pub const LEVEL_UP_HEAL: f32 = 20.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 200.0;

    /// Feedback effects
    pub const CONTACT_SHAKE_INTENSITY: f32 = 10.0;
    pub const CONTACT_SHAKE_MS: f32 = 200.0;
    pub const SMALL_BURST_PARTICLES: usize = 5;
    pub const NORMAL_BURST_PARTICLES: usize = 20;
}
