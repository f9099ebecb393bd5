//! Frame clock for the render loop

use std::time::{Duration, Instant};

/// Largest delta handed to the mixer in a single tick
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Render clock - monotonic, produces per-frame deltas
/// INVARIANT: deltas are never negative and never exceed MAX_FRAME_DELTA
#[derive(Debug)]
pub struct FrameClock {
    /// Last update instant
    last_update: Option<Instant>,
    /// Total time handed out so far
    total: Duration,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock {
            last_update: None,
            total: Duration::ZERO,
            frames: 0,
        }
    }

    /// Advance to `now` and return the delta since the previous tick.
    /// The first tick returns zero.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let elapsed = match self.last_update {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };

        // Clamp to prevent large jumps (e.g., after a stalled frame or sleep)
        let clamped = elapsed.min(MAX_FRAME_DELTA);

        self.total += clamped;
        self.frames += 1;
        self.last_update = Some(now);
        clamped
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Sum of all deltas produced
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), Duration::ZERO);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_delta_between_ticks() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(dt, Duration::from_millis(16));
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let dt = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(dt, MAX_FRAME_DELTA);
        assert_eq!(clock.total(), MAX_FRAME_DELTA);
    }

    #[test]
    fn test_backwards_instant_yields_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start + Duration::from_millis(50));
        assert_eq!(clock.tick_at(start), Duration::ZERO);
    }
}
