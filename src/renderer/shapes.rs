//! Tessellation of recorded draw commands into triangles

use glam::{Affine2, Vec2};
use std::f32::consts::PI;

use super::color::{Rgba, with_alpha};
use super::painter::{DisplayList, DrawCmd};
use super::vertex::Vertex;

/// Opacity of the glow halo relative to the shadow color
const GLOW_ALPHA: f32 = 0.35;

/// Fill and transform state saved/restored by the painter stack
#[derive(Debug, Clone, Copy)]
struct PaintState {
    transform: Affine2,
    fill: Rgba,
    alpha: f32,
    shadow_blur: f32,
    shadow_color: Rgba,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            fill: [0.0, 0.0, 0.0, 1.0],
            alpha: 1.0,
            shadow_blur: 0.0,
            shadow_color: [0.0; 4],
        }
    }
}

impl PaintState {
    fn fill_color(&self) -> Rgba {
        with_alpha(self.fill, self.fill[3] * self.alpha)
    }

    fn glow_color(&self) -> Rgba {
        with_alpha(self.shadow_color, self.shadow_color[3] * self.alpha * GLOW_ALPHA)
    }
}

/// Turn a display list into a triangle list in viewport pixels
///
/// Unbalanced `Restore` commands are ignored rather than underflowing the
/// stack.
pub fn tessellate(list: &DisplayList) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(list.len() * 6);
    let mut state = PaintState::default();
    let mut stack: Vec<PaintState> = Vec::new();

    for cmd in list.commands() {
        match *cmd {
            DrawCmd::Save => stack.push(state),
            DrawCmd::Restore => {
                if let Some(saved) = stack.pop() {
                    state = saved;
                }
            }
            DrawCmd::Translate { x, y } => {
                state.transform = state.transform * Affine2::from_translation(Vec2::new(x, y));
            }
            DrawCmd::Rotate { angle } => {
                state.transform = state.transform * Affine2::from_angle(angle);
            }
            DrawCmd::SetFill(color) => state.fill = color,
            DrawCmd::SetAlpha(alpha) => state.alpha = alpha.clamp(0.0, 1.0),
            DrawCmd::SetShadow { blur, color } => {
                state.shadow_blur = blur.max(0.0);
                state.shadow_color = color;
            }
            DrawCmd::FillRect {
                x,
                y,
                width,
                height,
            } => {
                if state.shadow_blur > 0.0 {
                    let pad = state.shadow_blur / 2.0;
                    vertices.extend(quad(
                        &state.transform,
                        Vec2::new(x - pad, y - pad),
                        Vec2::new(width + 2.0 * pad, height + 2.0 * pad),
                        state.glow_color(),
                    ));
                }
                vertices.extend(quad(
                    &state.transform,
                    Vec2::new(x, y),
                    Vec2::new(width, height),
                    state.fill_color(),
                ));
            }
            DrawCmd::FillCircle { x, y, radius } => {
                let center = Vec2::new(x, y);
                if state.shadow_blur > 0.0 {
                    let r = radius + state.shadow_blur / 2.0;
                    vertices.extend(circle(
                        &state.transform,
                        center,
                        r,
                        state.glow_color(),
                        segments_for(r),
                    ));
                }
                vertices.extend(circle(
                    &state.transform,
                    center,
                    radius,
                    state.fill_color(),
                    segments_for(radius),
                ));
            }
        }
    }

    vertices
}

/// Segment count that keeps small particles cheap and large circles round
fn segments_for(radius: f32) -> u32 {
    (radius * 1.5).clamp(8.0, 48.0) as u32
}

/// Generate vertices for a filled rectangle (two triangles)
pub fn quad(transform: &Affine2, origin: Vec2, size: Vec2, color: Rgba) -> [Vertex; 6] {
    let corners = [
        origin,
        origin + Vec2::new(size.x, 0.0),
        origin + size,
        origin + Vec2::new(0.0, size.y),
    ]
    .map(|p| transform.transform_point2(p));
    let v = |p: Vec2| Vertex::new(p.x, p.y, color);

    [
        v(corners[0]),
        v(corners[1]),
        v(corners[2]),
        v(corners[0]),
        v(corners[2]),
        v(corners[3]),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(
    transform: &Affine2,
    center: Vec2,
    radius: f32,
    color: Rgba,
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let c = transform.transform_point2(center);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let p1 = transform
            .transform_point2(center + Vec2::new(radius * theta1.cos(), radius * theta1.sin()));
        let p2 = transform
            .transform_point2(center + Vec2::new(radius * theta2.cos(), radius * theta2.sin()));

        // Triangle from center to edge
        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Painter;

    #[test]
    fn test_rect_is_two_triangles() {
        let mut list = DisplayList::new();
        list.set_fill([1.0, 0.0, 0.0, 1.0]);
        list.fill_rect(0.0, 0.0, 10.0, 5.0);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), 6);
        assert_eq!(verts[2].position, [10.0, 5.0]);
    }

    #[test]
    fn test_translate_and_restore() {
        let mut list = DisplayList::new();
        list.save();
        list.translate(100.0, 50.0);
        list.fill_rect(0.0, 0.0, 1.0, 1.0);
        list.restore();
        list.fill_rect(0.0, 0.0, 1.0, 1.0);
        let verts = tessellate(&list);
        assert_eq!(verts[0].position, [100.0, 50.0]);
        assert_eq!(verts[6].position, [0.0, 0.0]);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let mut list = DisplayList::new();
        list.rotate(std::f32::consts::FRAC_PI_2);
        list.fill_rect(0.0, 0.0, 10.0, 1.0);
        let verts = tessellate(&list);
        // (10, 0) rotated a quarter turn lands on (0, 10)
        let p = verts[1].position;
        assert!(p[0].abs() < 1e-4);
        assert!((p[1] - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_alpha_scales_fill() {
        let mut list = DisplayList::new();
        list.set_fill([1.0, 1.0, 1.0, 0.5]);
        list.set_alpha(0.5);
        list.fill_circle(0.0, 0.0, 4.0);
        let verts = tessellate(&list);
        assert!(!verts.is_empty());
        assert!((verts[0].color[3] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_adds_glow_pass() {
        let mut list = DisplayList::new();
        list.set_shadow(10.0, [1.0, 1.0, 1.0, 1.0]);
        list.fill_rect(0.0, 0.0, 4.0, 4.0);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), 12);
        assert_eq!(verts[0].position, [-5.0, -5.0]);
    }

    #[test]
    fn test_unbalanced_restore_is_ignored() {
        let mut list = DisplayList::new();
        list.restore();
        list.fill_rect(1.0, 1.0, 1.0, 1.0);
        assert_eq!(tessellate(&list)[0].position, [1.0, 1.0]);
    }
}
