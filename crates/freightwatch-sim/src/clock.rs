//! The simulated clock.
//!
//! Simulated time is decoupled from wall time by a speed multiplier:
//! one real second advances the simulation by `speed` seconds. The
//! clock is an explicit parameter everywhere, never ambient, so tests
//! drive it with injected timestamps and stay deterministic.

use chrono::{DateTime, Duration, Utc};

/// Simulated time with a real-to-simulated speed multiplier.
#[derive(Debug, Clone)]
pub struct SimClock {
    now: DateTime<Utc>,
    speed: f64,
}

impl SimClock {
    /// Create a clock starting at `start` running at `speed` simulated
    /// seconds per real second. Non-positive speeds are clamped to 1.
    #[must_use]
    pub fn new(start: DateTime<Utc>, speed: f64) -> Self {
        Self {
            now: start,
            speed: if speed > 0.0 { speed } else { 1.0 },
        }
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The speed multiplier.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Advance by a real-time duration, scaled by the multiplier.
    /// Returns the simulated time after the advance.
    pub fn advance(&mut self, real_elapsed: Duration) -> DateTime<Utc> {
        let real_secs = duration_secs(real_elapsed);
        let sim = Duration::milliseconds(to_millis(real_secs * self.speed));
        self.now = self
            .now
            .checked_add_signed(sim)
            .unwrap_or(self.now);
        self.now
    }

    /// Advance by an already-simulated duration, ignoring the multiplier.
    pub fn advance_simulated(&mut self, sim_elapsed: Duration) -> DateTime<Utc> {
        self.now = self
            .now
            .checked_add_signed(sim_elapsed)
            .unwrap_or(self.now);
        self.now
    }
}

/// A `chrono::Duration` as fractional seconds.
fn duration_secs(d: Duration) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ms = d.num_milliseconds() as f64;
    ms / 1000.0
}

/// Fractional seconds to whole milliseconds, saturating.
#[allow(clippy::cast_precision_loss)]
fn to_millis(secs: f64) -> i64 {
    let ms = secs * 1000.0;
    if ms >= i64::MAX as f64 {
        i64::MAX
    } else if ms <= i64::MIN as f64 {
        i64::MIN
    } else {
        #[allow(clippy::cast_possible_truncation)]
        {
            ms as i64
        }
    }
}
