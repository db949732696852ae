use glam::Vec2;

/// Lower bound on the time between two mouse samples, in milliseconds.
/// Keeps bursts of events from producing huge velocities.
pub const MIN_SAMPLE_INTERVAL_MS: f64 = 14.0;

/// Position reported while the pointer is idle; outside the unit square so
/// nothing is stamped.
pub const OFF_SCREEN: Vec2 = Vec2::splat(-1.0);

/// Pointer input for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// uv space, origin bottom-left.
    pub position: Vec2,
    /// Page pixels per millisecond, y down.
    pub velocity: Vec2,
}

impl PointerSample {
    pub fn idle() -> Self {
        Self {
            position: OFF_SCREEN,
            velocity: Vec2::ZERO,
        }
    }
}

/// Turns `mousemove` events into per-frame [`PointerSample`]s.
#[derive(Clone, Debug)]
pub struct MouseTracker {
    position: Vec2,
    velocity: Vec2,
    last_page: Vec2,
    last_time: Option<f64>,
    moved: bool,
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self {
            position: OFF_SCREEN,
            velocity: Vec2::ZERO,
            last_page: Vec2::ZERO,
            last_time: None,
            moved: false,
        }
    }
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a move to `page` (CSS pixels) at `now_ms`, within a window of
    /// `window_size` CSS pixels.
    pub fn on_move(&mut self, page: Vec2, window_size: Vec2, now_ms: f64) {
        let size = window_size.max(Vec2::ONE);
        self.position = Vec2::new(page.x / size.x, 1.0 - page.y / size.y);

        let last_time = match self.last_time {
            Some(t) => t,
            None => {
                self.last_page = page;
                now_ms
            }
        };

        let delta = page - self.last_page;
        self.last_page = page;

        let dt = (now_ms - last_time).max(MIN_SAMPLE_INTERVAL_MS);
        self.last_time = Some(now_ms);

        self.velocity = delta / dt as f32;
        self.moved = true;
    }

    /// Input for the coming frame. If no move arrived since the previous
    /// call the pointer reads as idle, so velocity never hangs after the
    /// mouse stops.
    pub fn frame_input(&mut self) -> PointerSample {
        if !std::mem::take(&mut self.moved) {
            return PointerSample::idle();
        }
        PointerSample {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(1000.0, 500.0);

    #[test]
    fn starts_idle() {
        let mut tracker = MouseTracker::new();
        assert_eq!(tracker.frame_input(), PointerSample::idle());
    }

    #[test]
    fn first_move_has_no_velocity() {
        let mut tracker = MouseTracker::new();
        tracker.on_move(Vec2::new(250.0, 125.0), WINDOW, 1000.0);
        let sample = tracker.frame_input();
        assert_eq!(sample.position, Vec2::new(0.25, 0.75));
        assert_eq!(sample.velocity, Vec2::ZERO);
    }

    #[test]
    fn velocity_is_pixels_per_millisecond() {
        let mut tracker = MouseTracker::new();
        tracker.on_move(Vec2::new(0.0, 0.0), WINDOW, 1000.0);
        tracker.on_move(Vec2::new(40.0, -20.0), WINDOW, 1020.0);
        assert_eq!(tracker.frame_input().velocity, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn short_intervals_are_clamped() {
        let mut tracker = MouseTracker::new();
        tracker.on_move(Vec2::ZERO, WINDOW, 1000.0);
        tracker.on_move(Vec2::new(28.0, 0.0), WINDOW, 1001.0);
        assert_eq!(tracker.frame_input().velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn frame_without_moves_reads_idle() {
        let mut tracker = MouseTracker::new();
        tracker.on_move(Vec2::ZERO, WINDOW, 0.0);
        tracker.on_move(Vec2::new(14.0, 0.0), WINDOW, 14.0);
        assert_ne!(tracker.frame_input().velocity, Vec2::ZERO);
        assert_eq!(tracker.frame_input(), PointerSample::idle());
    }
}
