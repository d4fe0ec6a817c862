//! Immediate-mode draw command seam
//!
//! The simulation draws through [`Painter`], a small canvas-like API
//! (fill state, transform stack, rectangles and circles). [`DisplayList`]
//! records the commands so the GPU backend can tessellate them and tests can
//! inspect draw order.

use super::color::Rgba;

/// Canvas-style drawing surface
pub trait Painter {
    /// Push the current transform and fill state
    fn save(&mut self);
    /// Pop back to the last saved transform and fill state
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate subsequent drawing (radians, clockwise in screen space)
    fn rotate(&mut self, angle: f32);
    fn set_fill(&mut self, color: Rgba);
    /// Global opacity multiplier (0..1)
    fn set_alpha(&mut self, alpha: f32);
    /// Glow around subsequent shapes; a blur of 0 disables it
    fn set_shadow(&mut self, blur: f32, color: Rgba);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);
}

/// A single recorded command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { angle: f32 },
    SetFill(Rgba),
    SetAlpha(f32),
    SetShadow { blur: f32, color: Rgba },
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    FillCircle { x: f32, y: f32, radius: f32 },
}

/// Recording painter
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCmd>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded commands, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Painter for DisplayList {
    fn save(&mut self) {
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCmd::Translate { x, y });
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCmd::Rotate { angle });
    }

    fn set_fill(&mut self, color: Rgba) {
        self.commands.push(DrawCmd::SetFill(color));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::SetAlpha(alpha));
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.commands.push(DrawCmd::SetShadow { blur, color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCmd::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.commands.push(DrawCmd::FillCircle { x, y, radius });
    }
}
