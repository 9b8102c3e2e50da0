//! Controllable clock for deterministic testing
//!
//! # Examples
//!
//! ```ignore
//! use chrono::Duration;
//! use fraplin_common::testing::MockClock;
//! use fraplin_common::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.utc_now();
//!
//! // Simulate three days passing
//! clock.advance(Duration::days(3));
//!
//! assert_eq!(clock.utc_now() - start, Duration::days(3));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::time::Clock;

/// Mock clock whose time only moves when told to.
///
/// Clones share the same elapsed time, so a clone handed to the code under
/// test observes every `advance` made by the test.
#[derive(Debug, Clone)]
pub struct MockClock {
    base: DateTime<Utc>,
    elapsed: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a mock clock starting at the current real time.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Create a mock clock starting at a fixed instant.
    pub fn starting_at(base: DateTime<Utc>) -> Self {
        Self { base, elapsed: Arc::new(Mutex::new(Duration::zero())) }
    }

    /// Advance the clock without waiting.
    pub fn advance(&self, duration: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(PoisonError::into_inner);
        *elapsed += duration;
    }

    /// Replace the elapsed time with an absolute value.
    pub fn set_elapsed(&self, duration: Duration) {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner) = duration;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn utc_now(&self) -> DateTime<Utc> {
        self.base + self.elapsed()
    }
}
