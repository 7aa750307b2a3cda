//! Wall-clock helpers for the frame loop and the background worker

use std::time::{Duration, Instant};

/// Pausable stopwatch with an optional time limit
///
/// A zero limit counts as already expired.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
    paused_at: Option<Instant>,
    limit: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::with_limit(Duration::ZERO)
    }

    pub fn with_limit(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            paused_at: None,
            limit,
        }
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
        if self.paused_at.is_some() {
            self.paused_at = Some(self.started);
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn set_limit(&mut self, limit: Duration) {
        self.limit = limit;
    }

    pub fn elapsed(&self) -> Duration {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        now.saturating_duration_since(self.started)
    }

    pub fn time_ran_out(&self) -> bool {
        self.limit.is_zero() || self.elapsed() >= self.limit
    }

    /// Time left before the limit expires
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Freeze or unfreeze the elapsed time
    pub fn toggle_pause(&mut self) {
        match self.paused_at.take() {
            Some(paused_at) => self.started += paused_at.elapsed(),
            None => self.paused_at = Some(Instant::now()),
        }
    }
}

/// Keeps a batch from finishing faster than one display frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPacer {
    frame_period: Option<Duration>,
}

impl BatchPacer {
    pub fn new(frame_rate: u32, enabled: bool) -> Self {
        debug_assert!(frame_rate > 0);
        let frame_period = (enabled && frame_rate > 0)
            .then(|| Duration::from_nanos(1_000_000_000 / frame_rate as u64));
        Self { frame_period }
    }

    pub fn disabled() -> Self {
        Self { frame_period: None }
    }

    pub fn frame_period(&self) -> Option<Duration> {
        self.frame_period
    }

    /// Sleep the calling worker for what is left of the frame begun at `started`
    ///
    /// Returns how long it slept.
    pub fn throttle(&self, started: Instant) -> Duration {
        let Some(period) = self.frame_period else {
            return Duration::ZERO;
        };
        let elapsed = started.elapsed();
        let remaining = period.saturating_sub(elapsed);
        if remaining.is_zero() {
            tracing::trace!("Frame overran its period: {:?} > {:?}", elapsed, period);
        } else {
            std::thread::sleep(remaining);
        }
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_has_run_out() {
        assert!(Stopwatch::new().time_ran_out());
    }

    #[test]
    fn test_limit_not_reached() {
        let stopwatch = Stopwatch::with_limit(Duration::from_secs(60));
        assert!(!stopwatch.time_ran_out());
        assert!(stopwatch.remaining() > Duration::from_secs(59));
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut stopwatch = Stopwatch::new();
        stopwatch.toggle_pause();
        assert!(stopwatch.is_paused());
        let frozen = stopwatch.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stopwatch.elapsed(), frozen);

        stopwatch.toggle_pause();
        assert!(!stopwatch.is_paused());
        // Paused span is not counted
        assert!(stopwatch.elapsed() < Duration::from_millis(5) + frozen);
    }

    #[test]
    fn test_disabled_pacer_never_sleeps() {
        let pacer = BatchPacer::new(60, false);
        assert_eq!(pacer, BatchPacer::disabled());
        assert_eq!(pacer.throttle(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn test_pacer_fills_frame_period() {
        let pacer = BatchPacer::new(100, true);
        assert_eq!(pacer.frame_period(), Some(Duration::from_millis(10)));

        let started = Instant::now();
        pacer.throttle(started);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_pacer_skips_sleep_after_overrun() {
        let pacer = BatchPacer::new(1000, true);
        let started = Instant::now() - Duration::from_millis(50);
        assert_eq!(pacer.throttle(started), Duration::ZERO);
    }
}
