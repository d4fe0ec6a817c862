//! Screen shake and particle bursts

use glam::Vec2;
use rand::Rng;

use super::entities::Particle;
use crate::consts::{NORMAL_BURST_PARTICLES, SMALL_BURST_PARTICLES};

/// Camera shake applied to the whole world layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub intensity: f32,
    /// Milliseconds remaining
    pub duration: f32,
    pub offset: Vec2,
}

impl ScreenShake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or replace) a shake
    pub fn trigger(&mut self, intensity: f32, duration_ms: f32) {
        self.intensity = intensity;
        self.duration = duration_ms;
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0.0
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.duration > 0.0 {
            self.duration -= dt;
            if self.duration <= 0.0 {
                self.duration = 0.0;
                self.offset = Vec2::ZERO;
            } else {
                self.offset = Vec2::new(
                    (rng.random::<f32>() - 0.5) * self.intensity,
                    (rng.random::<f32>() - 0.5) * self.intensity,
                );
            }
        } else {
            self.offset = Vec2::ZERO;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Explosion size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstSize {
    /// Projectile impact, or the player being hit
    Small,
    /// Enemy destroyed
    Normal,
}

impl BurstSize {
    pub fn particle_count(self) -> usize {
        match self {
            BurstSize::Small => SMALL_BURST_PARTICLES,
            BurstSize::Normal => NORMAL_BURST_PARTICLES,
        }
    }
}

/// Spawn a burst at `pos`, never growing `particles` past `cap`
///
/// Returns the number of particles actually added.
pub fn burst(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    size: BurstSize,
    cap: usize,
    rng: &mut impl Rng,
) -> usize {
    let room = cap.saturating_sub(particles.len());
    let count = size.particle_count().min(room);
    particles.extend((0..count).map(|_| Particle::spawn(pos, &mut *rng)));
    count
}
