//! Sleep-based frame pacing for interactive mode.

use std::time::{Duration, Instant};

/// Caps the presentation rate at a target frames-per-second.
///
/// Each [`tick`](Self::tick) blocks until at least one frame interval has
/// passed since the previous tick, then returns the real elapsed time.
/// Frames are never dropped; a slow frame simply makes the next wait shorter
/// (or zero).
#[derive(Debug, Clone)]
pub struct FramePacer {
    last: Option<Instant>,
    frame_index: u64,
}

impl FramePacer {
    /// Create a pacer. The first tick does not wait.
    pub fn new() -> Self {
        Self {
            last: None,
            frame_index: 0,
        }
    }

    /// Minimum duration of one frame at `fps`.
    pub fn interval(fps: u32) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
    }

    /// Wait out the remainder of the current frame interval.
    pub fn tick(&mut self, fps: u32) -> Duration {
        let now = Instant::now();
        let Some(last) = self.last else {
            self.last = Some(now);
            self.frame_index += 1;
            return Duration::ZERO;
        };

        let interval = Self::interval(fps);
        let elapsed = now.saturating_duration_since(last);
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }

        let now = Instant::now();
        self.last = Some(now);
        self.frame_index += 1;
        now.saturating_duration_since(last)
    }

    /// Number of ticks so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_returns_immediately() {
        let mut pacer = FramePacer::new();
        assert_eq!(pacer.tick(60), Duration::ZERO);
        assert_eq!(pacer.frame_index(), 1);
    }

    #[test]
    fn later_ticks_wait_a_full_interval() {
        let mut pacer = FramePacer::new();
        pacer.tick(100);
        let dt = pacer.tick(100);
        assert!(dt >= Duration::from_millis(10), "dt was {dt:?}");
        assert_eq!(pacer.frame_index(), 2);
    }

    #[test]
    fn interval_guards_against_zero_fps() {
        assert_eq!(FramePacer::interval(0), Duration::from_secs(1));
        assert_eq!(FramePacer::interval(4), Duration::from_millis(250));
    }
}
