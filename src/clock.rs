//! Frame clock
//!
//! Turns the host's per-frame timestamps (rAF time in the browser) into
//! elapsed milliseconds for the simulation, and keeps a rolling FPS figure.

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    running: bool,
    last_time: Option<f64>,
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            running: false,
            last_time: None,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }

    /// Start ticking; the next frame reports zero elapsed time
    pub fn start(&mut self) {
        self.running = true;
        self.last_time = None;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record a frame at `time_ms` and return the elapsed milliseconds
    ///
    /// Returns `None` while stopped. A timestamp older than the previous one
    /// yields zero.
    pub fn tick(&mut self, time_ms: f64) -> Option<f32> {
        if !self.running {
            return None;
        }

        let dt = match self.last_time {
            Some(last) => (time_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        // Track frame times for FPS
        let oldest = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        // Counts only until the window has wrapped once
        if self.frames_seen <= FPS_WINDOW {
            self.frames_seen += 1;
        }

        if self.frames_seen > FPS_WINDOW {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / elapsed).round() as u32;
            }
        }

        Some(dt)
    }

    /// Frames per second over the last [`FPS_WINDOW`] frames (0 until full)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(100.0), None);
        clock.start();
        assert_eq!(clock.tick(1000.0), Some(0.0));
        assert_eq!(clock.tick(1016.0), Some(16.0));
    }

    #[test]
    fn test_restart_resets_baseline() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.tick(0.0);
        clock.stop();
        clock.start();
        assert_eq!(clock.tick(5000.0), Some(0.0));
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.tick(100.0);
        assert_eq!(clock.tick(90.0), Some(0.0));
    }

    #[test]
    fn test_fps_at_60hz() {
        let mut clock = FrameClock::new();
        clock.start();
        for frame in 0..=120 {
            clock.tick(f64::from(frame) * 1000.0 / 60.0);
        }
        assert_eq!(clock.fps(), 60);
    }

    #[test]
    fn test_frame_count_stays_bounded() {
        let mut clock = FrameClock::new();
        clock.start();
        for frame in 0..1000 {
            clock.tick(f64::from(frame) * 1000.0 / 30.0);
        }
        assert_eq!(clock.frames_seen, FPS_WINDOW + 1);
        assert_eq!(clock.fps(), 30);
    }
}
