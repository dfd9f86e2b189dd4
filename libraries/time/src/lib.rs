#![allow(missing_docs, reason = "TODO add later")]

use std::time::Duration;

use web_time::Instant;

/// Measures the time passed between consecutive frames.
///
/// The first call to [`Clock::delta`] returns the time since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Returns the time since the previous call and restarts the measurement.
    pub fn delta(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        delta
    }

    /// Same as [`Clock::delta`] in seconds, capped at `max_seconds`.
    ///
    /// The cap keeps a stalled loop (debugger, suspended window) from producing one huge step.
    pub fn delta_secs_capped(&mut self, max_seconds: f32) -> f32 {
        self.delta().as_secs_f32().min(max_seconds)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn deltas_add_up_to_the_measured_span() {
        let outer = Instant::now();
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(5));
        let first = clock.delta();
        thread::sleep(Duration::from_millis(5));
        let second = clock.delta();

        assert!(first >= Duration::from_millis(5), "first delta too short: {first:?}");
        assert!(second >= Duration::from_millis(5), "second delta too short: {second:?}");
        assert!(first + second <= outer.elapsed(), "deltas exceed elapsed time");
    }

    #[test]
    fn capped_delta_never_exceeds_cap() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(20));
        let delta = clock.delta_secs_capped(0.001);
        assert!(delta <= 0.001, "cap ignored: {delta}");
    }
}
