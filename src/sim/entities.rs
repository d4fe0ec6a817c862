//! Player, enemies, projectiles and particles
//!
//! Entities hold plain data plus their own update and draw behavior. None of
//! them references a sibling: anything an update needs from the rest of the
//! world (the player's position, the viewport) is passed in, and anything it
//! produces (a new projectile) is returned to the session.
//!
//! Velocities and speeds are in pixels per reference frame; `steps` is the
//! elapsed time expressed in reference frames.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, Viewport};
use super::input::InputSnapshot;
use crate::consts::*;
use crate::renderer::color::{Rgba, hsl, palette};
use crate::renderer::Painter;

/// Shared interface for everything the session stores in a collection
pub trait Entity {
    /// Collision box in viewport pixels
    fn bounds(&self) -> Rect;
    /// Marked for removal at the end of the current pass
    fn is_expired(&self) -> bool;
    fn draw(&self, painter: &mut dyn Painter);
}

/// Drop expired entities, preserving the order of the rest
pub fn prune<E: Entity>(items: &mut Vec<E>) {
    items.retain(|e| !e.is_expired());
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Facing angle toward the pointer (radians)
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Milliseconds accumulated toward the next shot
    pub shoot_timer: f32,
}

impl Player {
    /// Spawn centered in the viewport
    pub fn new(viewport: Viewport) -> Self {
        let size = Vec2::splat(PLAYER_SIZE);
        Self {
            pos: viewport.center() - size / 2.0,
            vel: Vec2::ZERO,
            size,
            angle: 0.0,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            shoot_timer: SHOOT_INTERVAL_MS,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Advance movement, aim and the fire cooldown
    ///
    /// Returns a projectile when a shot was fired this frame.
    pub fn update(
        &mut self,
        dt: f32,
        steps: f32,
        input: &InputSnapshot,
        viewport: Viewport,
    ) -> Option<Projectile> {
        // Impulse while held, then friction: smooth accel/decel
        self.vel += input.move_axis() * PLAYER_ACCEL * steps;
        self.pos += self.vel * steps;
        self.vel *= PLAYER_FRICTION.powf(steps);

        self.clamp_to(viewport);

        let to_pointer = input.pointer.pos - self.center();
        self.angle = to_pointer.y.atan2(to_pointer.x);

        if input.pointer.down {
            self.shoot_timer += dt;
            if self.shoot_timer > SHOOT_INTERVAL_MS {
                self.shoot_timer = 0.0;
                return Some(self.shoot());
            }
        } else {
            // Pre-arm so the next press fires straight away
            self.shoot_timer = SHOOT_INTERVAL_MS;
        }
        None
    }

    /// Keep the whole ship inside the viewport
    pub fn clamp_to(&mut self, viewport: Viewport) {
        let max_x = (viewport.width - self.size.x).max(0.0);
        let max_y = (viewport.height - self.size.y).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }

    /// Fire a projectile from the center along the facing angle
    pub fn shoot(&self) -> Projectile {
        let dir = Vec2::new(self.angle.cos(), self.angle.sin());
        Projectile::new(self.center(), dir * PROJECTILE_SPEED)
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    /// Restore hp without exceeding the maximum
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Remaining health as a percentage, never negative
    pub fn health_percent(&self) -> f32 {
        (self.hp / self.max_hp * 100.0).max(0.0)
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, self.size)
    }

    fn is_expired(&self) -> bool {
        false
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let center = self.center();
        painter.save();
        painter.translate(center.x, center.y);
        painter.rotate(self.angle);

        // Body
        painter.set_fill(palette::PLAYER);
        painter.set_shadow(10.0, palette::PLAYER);
        painter.fill_rect(
            -self.size.x / 2.0,
            -self.size.y / 2.0,
            self.size.x,
            self.size.y,
        );

        // Turret
        painter.set_fill(palette::TURRET);
        painter.fill_rect(0.0, -TURRET_WIDTH / 2.0, TURRET_LENGTH, TURRET_WIDTH);

        painter.restore();
    }
}

/// A homing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub hp: f32,
    pub color: Rgba,
    pub angle: f32,
    pub marked_for_deletion: bool,
}

impl Enemy {
    pub fn new(pos: Vec2, speed: f32, hp: f32, color: Rgba) -> Self {
        Self {
            pos,
            size: Vec2::splat(ENEMY_SIZE),
            speed,
            hp,
            color,
            angle: 0.0,
            marked_for_deletion: false,
        }
    }

    /// Pure pursuit: head straight for `target` at constant speed
    pub fn update(&mut self, steps: f32, target: Vec2) {
        let delta = target - self.pos;
        self.angle = delta.y.atan2(delta.x);
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed * steps;
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

impl Entity for Enemy {
    fn bounds(&self) -> Rect {
        Rect::from_origin(self.pos, self.size)
    }

    fn is_expired(&self) -> bool {
        self.marked_for_deletion
    }

    fn draw(&self, painter: &mut dyn Painter) {
        let center = self.pos + self.size / 2.0;
        painter.save();
        painter.translate(center.x, center.y);
        painter.rotate(self.angle);

        painter.set_fill(self.color);
        painter.set_shadow(10.0, self.color);
        painter.fill_rect(
            -self.size.x / 2.0,
            -self.size.y / 2.0,
            self.size.x,
            self.size.y,
        );

        // Eye, offset toward the heading
        painter.set_fill(palette::ENEMY_EYE);
        painter.fill_rect(5.0, -5.0, 10.0, 10.0);

        painter.restore();
    }
}

/// A player shot
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: f32,
    pub marked_for_deletion: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: Vec2::splat(PROJECTILE_SIZE),
            damage: PROJECTILE_DAMAGE,
            marked_for_deletion: false,
        }
    }

    /// Move, and expire once outside the playfield
    pub fn update(&mut self, steps: f32, viewport: Viewport) {
        self.pos += self.vel * steps;
        if !viewport.contains(self.pos) {
            self.marked_for_deletion = true;
        }
    }
}

impl Entity for Projectile {
    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    fn is_expired(&self) -> bool {
        self.marked_for_deletion
    }

    fn draw(&self, painter: &mut dyn Painter) {
        painter.save();
        painter.set_fill(palette::PROJECTILE);
        painter.set_shadow(5.0, palette::PROJECTILE);
        painter.fill_circle(self.pos.x, self.pos.y, self.size.x / 2.0);
        painter.restore();
    }
}

/// A fading spark from an explosion
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Opacity, 1 at spawn, expired at 0
    pub life: f32,
    /// Life lost per reference frame
    pub decay: f32,
    pub size: f32,
    pub color: Rgba,
    pub marked_for_deletion: bool,
}

impl Particle {
    /// Spawn with random velocity, decay, size and a fire-colored hue
    pub fn spawn(pos: Vec2, rng: &mut impl Rng) -> Self {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 10.0,
            (rng.random::<f32>() - 0.5) * 10.0,
        );
        Self {
            pos,
            vel,
            life: 1.0,
            decay: rng.random::<f32>() * 0.05 + 0.02,
            size: rng.random::<f32>() * 5.0 + 2.0,
            color: hsl(rng.random::<f32>() * 60.0 + 10.0, 1.0, 0.5),
            marked_for_deletion: false,
        }
    }

    pub fn update(&mut self, steps: f32) {
        self.pos += self.vel * steps;
        self.life -= self.decay * steps;
        if self.life <= 0.0 {
            self.marked_for_deletion = true;
        }
    }
}

impl Entity for Particle {
    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size * 2.0))
    }

    fn is_expired(&self) -> bool {
        self.marked_for_deletion
    }

    fn draw(&self, painter: &mut dyn Painter) {
        painter.save();
        painter.set_alpha(self.life.max(0.0));
        painter.set_shadow(0.0, self.color);
        painter.set_fill(self.color);
        painter.fill_circle(self.pos.x, self.pos.y, self.size);
        painter.restore();
    }
}
