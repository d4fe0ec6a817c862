//! Polled input snapshot
//!
//! Browser listeners write into this; the simulation only reads it.

use std::collections::HashSet;

use glam::Vec2;

/// Pointer (mouse) state in viewport pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub pos: Vec2,
    pub down: bool,
}

/// Current keyboard and pointer state
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Held keys, lowercased
    keys: HashSet<String>,
    pub pointer: Pointer,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    /// Case-insensitive held check
    pub fn is_down(&self, key: &str) -> bool {
        self.keys.contains(&key.to_lowercase())
    }

    pub fn any_down(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.is_down(k))
    }

    pub fn move_pointer(&mut self, x: f32, y: f32) {
        self.pointer.pos = Vec2::new(x, y);
    }

    pub fn set_pointer_down(&mut self, down: bool) {
        self.pointer.down = down;
    }

    /// Forget everything held (window blur drops key-up events)
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.pointer.down = false;
    }

    /// Movement direction from WASD/arrow keys, each axis in -1..=1
    pub fn move_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.any_down(&["w", "arrowup"]) {
            axis.y -= 1.0;
        }
        if self.any_down(&["s", "arrowdown"]) {
            axis.y += 1.0;
        }
        if self.any_down(&["a", "arrowleft"]) {
            axis.x -= 1.0;
        }
        if self.any_down(&["d", "arrowright"]) {
            axis.x += 1.0;
        }
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_case_insensitive() {
        let mut input = InputSnapshot::new();
        input.press("W");
        assert!(input.is_down("w"));
        input.release("w");
        assert!(!input.is_down("W"));
    }

    #[test]
    fn test_move_axis_opposing_keys_cancel() {
        let mut input = InputSnapshot::new();
        input.press("a");
        input.press("ArrowRight");
        input.press("w");
        assert_eq!(input.move_axis(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_release_all() {
        let mut input = InputSnapshot::new();
        input.press("d");
        input.set_pointer_down(true);
        input.release_all();
        assert_eq!(input.move_axis(), Vec2::ZERO);
        assert!(!input.pointer.down);
    }
}
