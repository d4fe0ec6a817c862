//! Level table, procedural difficulty and the transition phase

use rand::Rng;

use crate::consts::MIN_SPAWN_INTERVAL_MS;
use crate::renderer::color::{Rgba, hex, hsl};

/// Enemy tint for a level
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelColor {
    Fixed(Rgba),
    /// A random fully saturated hue, picked per spawned enemy
    RandomHue,
}

impl LevelColor {
    pub fn resolve(self, rng: &mut impl Rng) -> Rgba {
        match self {
            LevelColor::Fixed(color) => color,
            LevelColor::RandomHue => hsl(rng.random::<f32>() * 360.0, 1.0, 0.5),
        }
    }
}

/// Difficulty parameters for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    /// Kills needed to finish the level
    pub goal: u32,
    pub spawn_interval_ms: f64,
    /// Base enemy speed in px per reference frame
    pub enemy_speed: f32,
    pub enemy_hp: f32,
    pub color: LevelColor,
}

impl LevelConfig {
    const fn fixed(goal: u32, spawn_interval_ms: f64, enemy_speed: f32, enemy_hp: f32, rgb: u32) -> Self {
        Self {
            goal,
            spawn_interval_ms,
            enemy_speed,
            enemy_hp,
            color: LevelColor::Fixed(hex(rgb)),
        }
    }
}

/// Hand-tuned levels; anything past the end is generated
pub const LEVEL_TABLE: [LevelConfig; 5] = [
    LevelConfig::fixed(10, 2000.0, 2.0, 30.0, 0xff0066),
    LevelConfig::fixed(15, 1500.0, 3.0, 40.0, 0xff6600),
    LevelConfig::fixed(20, 1200.0, 4.0, 50.0, 0xffcc00),
    LevelConfig::fixed(25, 1000.0, 5.0, 60.0, 0xccff00),
    LevelConfig::fixed(30, 800.0, 6.0, 80.0, 0x00ff66),
];

/// How many levels past the end of the table `index` is (0 inside the table)
fn levels_past_table(index: usize) -> u32 {
    (index + 1).saturating_sub(LEVEL_TABLE.len()) as u32
}

/// Config for the 0-based level `index`
pub fn level_config(index: usize) -> LevelConfig {
    if let Some(config) = LEVEL_TABLE.get(index) {
        return *config;
    }

    let last = LEVEL_TABLE[LEVEL_TABLE.len() - 1];
    let extra = levels_past_table(index);
    LevelConfig {
        goal: last.goal + 5 * extra,
        spawn_interval_ms: (last.spawn_interval_ms - 50.0 * f64::from(extra))
            .max(MIN_SPAWN_INTERVAL_MS),
        enemy_speed: last.enemy_speed + 0.5 * extra as f32,
        enemy_hp: last.enemy_hp + 10.0 * extra as f32,
        color: LevelColor::RandomHue,
    }
}

/// Spawner period for level `index`
///
/// Past the table this decays at 100 ms per level, faster than the
/// generated config's own interval field.
pub fn spawn_interval_ms(index: usize) -> f64 {
    let base = LEVEL_TABLE[index.min(LEVEL_TABLE.len() - 1)].spawn_interval_ms;
    match levels_past_table(index) {
        0 => base,
        extra => (base - 100.0 * f64::from(extra)).max(MIN_SPAWN_INTERVAL_MS),
    }
}

/// Whether a level is being played or the banner between levels is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelPhase {
    #[default]
    Active,
    /// Waiting out the banner before loading `next_index`
    Transitioning { next_index: usize },
}

impl LevelPhase {
    pub fn is_transitioning(self) -> bool {
        matches!(self, LevelPhase::Transitioning { .. })
    }
}
