//! Per-frame update and draw passes
//!
//! `dt` is real elapsed milliseconds. Physics tuned per 60 Hz frame is
//! scaled by `dt / REFERENCE_FRAME_MS` so motion looks the same at any
//! refresh rate.

use glam::Vec2;

use super::collision::collide;
use super::effects::{BurstSize, burst};
use super::entities::{Entity, prune};
use super::input::InputSnapshot;
use super::state::{GameEvent, Session, SoundCue};
use crate::consts::*;
use crate::renderer::Painter;
use crate::renderer::color::{palette, with_alpha};

impl Session {
    /// Advance the world by `dt` milliseconds
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        if !self.running {
            return;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT_MS)
        } else {
            0.0
        };
        let steps = dt / REFERENCE_FRAME_MS;

        // Decay screen shake
        self.shake.update(dt, &mut self.rng);

        // Player movement and firing
        if let Some(shot) = self.player.update(dt, steps, input, self.viewport) {
            self.projectiles.push(shot);
            self.events.push(GameEvent::Sound(SoundCue::Shoot));
        }

        for projectile in &mut self.projectiles {
            projectile.update(steps, self.viewport);
        }
        prune(&mut self.projectiles);

        let explosions = self.resolve_enemies(steps);
        prune(&mut self.enemies);
        prune(&mut self.projectiles);
        for (pos, size) in explosions {
            self.explode(pos, size);
        }

        for particle in &mut self.particles {
            particle.update(steps);
        }
        prune(&mut self.particles);

        if self.player.is_dead() {
            self.stop();
        } else if self.enemies_defeated >= self.level_goal && !self.phase.is_transitioning() {
            self.begin_transition();
        }

        self.publish_hud();
    }

    /// Move enemies, then resolve contact and projectile hits
    ///
    /// Returns the explosions to spawn once the pass is over.
    fn resolve_enemies(&mut self, steps: f32) -> Vec<(Vec2, BurstSize)> {
        let mut explosions = Vec::new();
        let target = self.player.pos;

        for enemy in &mut self.enemies {
            enemy.update(steps, target);
            if enemy.marked_for_deletion {
                continue;
            }

            // Contact: costs the player health, awards nothing
            if collide(&self.player.bounds(), &enemy.bounds()) {
                self.player.take_damage(CONTACT_DAMAGE);
                enemy.marked_for_deletion = true;
                explosions.push((enemy.pos, BurstSize::Normal));
                explosions.push((self.player.center(), BurstSize::Small));
                self.shake.trigger(CONTACT_SHAKE_INTENSITY, CONTACT_SHAKE_MS);
                continue;
            }

            for projectile in &mut self.projectiles {
                if projectile.marked_for_deletion {
                    continue;
                }
                if !collide(&projectile.bounds(), &enemy.bounds()) {
                    continue;
                }

                enemy.take_damage(projectile.damage);
                projectile.marked_for_deletion = true;
                explosions.push((projectile.pos, BurstSize::Small));
                self.events.push(GameEvent::Sound(SoundCue::Hit));

                // Kill is counted once; the mark keeps it out of later checks
                if enemy.is_dead() {
                    enemy.marked_for_deletion = true;
                    self.score += SCORE_PER_KILL;
                    self.enemies_defeated += 1;
                    break;
                }
            }
        }

        explosions
    }

    fn explode(&mut self, pos: Vec2, size: BurstSize) {
        let cap = self.settings.max_particles();
        burst(&mut self.particles, pos, size, cap, &mut self.rng);
        self.events.push(GameEvent::Sound(SoundCue::Explosion));
    }

    /// Emit the frame's draw commands
    pub fn draw(&self, painter: &mut dyn Painter) {
        // Translucent wash over last frame leaves motion trails
        let wash = if self.settings.trails {
            palette::TRAIL_ALPHA
        } else {
            1.0
        };
        painter.save();
        painter.set_fill(with_alpha(palette::BACKGROUND, wash));
        painter.fill_rect(0.0, 0.0, self.viewport.width, self.viewport.height);
        painter.restore();

        painter.save();
        if self.settings.effective_screen_shake() {
            painter.translate(self.shake.offset.x, self.shake.offset.y);
        }

        self.player.draw(painter);
        for projectile in &self.projectiles {
            projectile.draw(painter);
        }
        for enemy in &self.enemies {
            enemy.draw(painter);
        }
        for particle in &self.particles {
            particle.draw(painter);
        }

        painter.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DisplayList, DrawCmd};
    use crate::settings::Settings;
    use crate::sim::collision::Viewport;
    use crate::sim::entities::{Enemy, Projectile};
    use crate::sim::state::Panel;

    fn running_session() -> Session {
        let mut s = Session::new(Viewport::new(800.0, 600.0), 7, Settings::default());
        s.start(0.0);
        s.drain_events();
        s
    }

    /// Stationary enemy far from the player
    fn parked_enemy(pos: Vec2, hp: f32) -> Enemy {
        Enemy::new(pos, 0.0, hp, [1.0, 0.0, 0.0, 1.0])
    }

    fn sounds(events: &[GameEvent], cue: SoundCue) -> usize {
        events
            .iter()
            .filter(|e| **e == GameEvent::Sound(cue))
            .count()
    }

    #[test]
    fn test_update_is_noop_when_stopped() {
        let mut s = Session::new(Viewport::new(800.0, 600.0), 7, Settings::default());
        let mut input = InputSnapshot::new();
        input.press("d");
        let before = s.player.pos;
        s.update(16.0, &input);
        assert_eq!(s.player.pos, before);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_kill_counted_once() {
        let mut s = running_session();
        s.enemies.push(parked_enemy(Vec2::new(50.0, 50.0), 10.0));
        // Two shots overlapping the same enemy in one frame
        s.projectiles.push(Projectile::new(Vec2::new(60.0, 60.0), Vec2::ZERO));
        s.projectiles.push(Projectile::new(Vec2::new(65.0, 65.0), Vec2::ZERO));

        s.update(16.0, &InputSnapshot::new());

        assert_eq!(s.enemies_defeated, 1);
        assert_eq!(s.score, SCORE_PER_KILL);
        assert!(s.enemies.is_empty());
        // The second shot is not consumed by a dead enemy
        assert_eq!(s.projectiles.len(), 1);

        s.update(16.0, &InputSnapshot::new());
        assert_eq!(s.enemies_defeated, 1);
    }

    #[test]
    fn test_edge_projectile_removed_on_first_timed_update() {
        let mut s = running_session();
        s.projectiles.push(Projectile::new(Vec2::new(800.0, 100.0), Vec2::new(10.0, 0.0)));

        s.update(0.0, &InputSnapshot::new());
        assert_eq!(s.projectiles.len(), 1);

        s.update(16.0, &InputSnapshot::new());
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_multiple_hits_in_one_frame() {
        let mut s = running_session();
        s.enemies.push(parked_enemy(Vec2::new(50.0, 50.0), 30.0));
        s.projectiles.push(Projectile::new(Vec2::new(60.0, 60.0), Vec2::ZERO));
        s.projectiles.push(Projectile::new(Vec2::new(65.0, 65.0), Vec2::ZERO));

        s.update(16.0, &InputSnapshot::new());

        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].hp, 10.0);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.enemies_defeated, 0);
        let events = s.drain_events();
        assert_eq!(sounds(&events, SoundCue::Hit), 2);
        assert_eq!(sounds(&events, SoundCue::Explosion), 2);
        assert_eq!(s.particles.len(), 2 * SMALL_BURST_PARTICLES);
    }

    #[test]
    fn test_contact_damages_without_score() {
        let mut s = running_session();
        let at_player = s.player.pos;
        s.enemies.push(parked_enemy(at_player, 30.0));

        s.update(16.0, &InputSnapshot::new());

        assert_eq!(s.player.hp, PLAYER_MAX_HP - CONTACT_DAMAGE);
        assert!(s.enemies.is_empty());
        assert_eq!(s.score, 0);
        assert_eq!(s.enemies_defeated, 0);
        assert!(s.shake.is_active());
        assert_eq!(
            s.particles.len(),
            NORMAL_BURST_PARTICLES + SMALL_BURST_PARTICLES
        );
    }

    #[test]
    fn test_lethal_contact_stops_same_update() {
        let mut s = running_session();
        s.player.hp = 10.0;
        let at_player = s.player.pos;
        s.enemies.push(parked_enemy(at_player, 30.0));

        s.update(16.0, &InputSnapshot::new());

        assert_eq!(s.player.hp, 0.0);
        assert!(!s.running);
        assert!(!s.is_spawner_armed());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::ShowPanel(Panel::GameOver)));
        assert!(events.contains(&GameEvent::FinalScore(0)));
        match events.last() {
            Some(GameEvent::Hud(hud)) => assert_eq!(hud.health_percent, 0.0),
            other => panic!("expected a HUD update last, got {other:?}"),
        }
    }

    #[test]
    fn test_goal_starts_transition() {
        let mut s = running_session();
        s.enemies_defeated = s.level_goal;

        s.update(16.0, &InputSnapshot::new());

        assert!(s.phase.is_transitioning());
        assert!(!s.is_spawner_armed());
        assert!(s.has_pending_transition());

        // Only one transition even though the goal stays met
        s.update(16.0, &InputSnapshot::new());
        let titles = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelTitle(_)))
            .count();
        assert_eq!(titles, 1);
    }

    #[test]
    fn test_holding_fire_shoots() {
        let mut s = running_session();
        let mut input = InputSnapshot::new();
        input.move_pointer(800.0, 320.0);
        input.set_pointer_down(true);

        s.update(16.0, &input);

        assert_eq!(s.projectiles.len(), 1);
        assert_eq!(sounds(&s.drain_events(), SoundCue::Shoot), 1);
    }

    #[test]
    fn test_projectile_leaving_is_pruned() {
        let mut s = running_session();
        s.projectiles
            .push(Projectile::new(Vec2::new(800.0, 100.0), Vec2::new(10.0, 0.0)));
        s.update(16.0, &InputSnapshot::new());
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut s = running_session();
        let mut input = InputSnapshot::new();
        input.press("d");
        let start = s.player.pos.x;
        s.update(60_000.0, &input);
        let max_steps = MAX_FRAME_DT_MS / REFERENCE_FRAME_MS;
        assert!(s.player.pos.x - start <= PLAYER_ACCEL * max_steps * max_steps + 1e-3);
    }

    #[test]
    fn test_nan_dt_is_ignored() {
        let mut s = running_session();
        s.update(f32::NAN, &InputSnapshot::new());
        assert!(s.player.pos.is_finite());
    }

    #[test]
    fn test_hud_published_each_update() {
        let mut s = running_session();
        s.enemies_defeated = 3;
        s.update(16.0, &InputSnapshot::new());
        let events = s.drain_events();
        let Some(GameEvent::Hud(hud)) = events.last() else {
            panic!("expected a HUD update");
        };
        assert_eq!(hud.enemies_left, 7);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.health_percent, 100.0);
    }

    #[test]
    fn test_particles_disabled() {
        let mut s = running_session();
        s.settings.particles = false;
        s.enemies.push(parked_enemy(Vec2::new(50.0, 50.0), 30.0));
        s.projectiles.push(Projectile::new(Vec2::new(60.0, 60.0), Vec2::ZERO));
        s.update(16.0, &InputSnapshot::new());
        assert!(s.particles.is_empty());
        assert_eq!(sounds(&s.drain_events(), SoundCue::Explosion), 1);
    }

    #[test]
    fn test_draw_order() {
        let mut s = running_session();
        s.enemies.push(parked_enemy(Vec2::new(50.0, 50.0), 30.0));
        s.projectiles.push(Projectile::new(Vec2::new(300.0, 300.0), Vec2::ZERO));
        s.shake.offset = Vec2::new(2.0, -1.0);

        let mut list = DisplayList::new();
        s.draw(&mut list);
        let cmds = list.commands();

        // Trail wash first
        assert_eq!(
            cmds[1],
            DrawCmd::SetFill(with_alpha(palette::BACKGROUND, palette::TRAIL_ALPHA))
        );
        assert_eq!(cmds[2], DrawCmd::FillRect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 });
        assert_eq!(cmds[5], DrawCmd::Translate { x: 2.0, y: -1.0 });

        let projectile_at = cmds
            .iter()
            .position(|c| matches!(c, DrawCmd::FillCircle { .. }))
            .unwrap();
        let enemy_at = cmds
            .iter()
            .position(|c| *c == DrawCmd::SetFill([1.0, 0.0, 0.0, 1.0]))
            .unwrap();
        assert!(projectile_at < enemy_at);
        assert_eq!(cmds.last(), Some(&DrawCmd::Restore));
    }

    #[test]
    fn test_draw_skips_shake_when_disabled() {
        let mut s = running_session();
        s.settings.screen_shake = false;
        s.shake.offset = Vec2::new(3.0, 3.0);
        let mut list = DisplayList::new();
        s.draw(&mut list);
        assert!(
            !list
                .commands()
                .iter()
                .any(|c| *c == DrawCmd::Translate { x: 3.0, y: 3.0 })
        );
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut s = running_session();
            let mut input = InputSnapshot::new();
            input.press("w");
            input.set_pointer_down(true);
            for frame in 1..=300 {
                let now = f64::from(frame) * 16.0;
                s.tick_timers(now);
                s.update(16.0, &input);
            }
            (s.score, s.enemies.len(), s.player.pos, s.particles.len())
        };
        assert_eq!(run(), run());
    }
}
