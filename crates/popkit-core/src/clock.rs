#![forbid(unsafe_code)]

//! Frame timing.
//!
//! Everything time-dependent in popkit is driven by explicit deltas so tests
//! can step deterministically. [`FrameClock`] converts wall-clock time into
//! those deltas for applications.

use std::time::Duration;

use web_time::Instant;

/// Measures the time between successive frames.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    /// Create a clock; the first tick reports zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time since the previous call.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame (e.g. after the app was suspended).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// One-shot, non-cancelable countdown.
///
/// [`Countdown::advance`] reports `true` exactly once: on the call that
/// reaches the deadline. A zero delay fires on the first advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: Duration,
    fired: bool,
}

impl Countdown {
    pub fn new(delay: Duration) -> Self {
        Self {
            remaining: delay,
            fired: false,
        }
    }

    /// Advance by `dt`; returns `true` on the single firing step.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.fired = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once() {
        let mut c = Countdown::new(Duration::from_millis(150));
        assert!(!c.advance(Duration::from_millis(100)));
        assert!(c.advance(Duration::from_millis(100)));
        assert!(!c.advance(Duration::from_millis(100)));
        assert!(c.has_fired());
    }

    #[test]
    fn zero_delay_fires_on_first_advance() {
        let mut c = Countdown::new(Duration::ZERO);
        assert!(c.advance(Duration::ZERO));
        assert!(!c.advance(Duration::ZERO));
    }

    #[test]
    fn frame_clock_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), Duration::ZERO);
        clock.reset();
        assert_eq!(clock.tick(), Duration::ZERO);
    }
}
