//! Wall clock abstraction
//!
//! Credential expiry is computed against a [`Clock`] so tests can move time
//! forward without waiting.
//!
//! # Examples
//!
//! ```
//! use fraplin_common::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.utc_now();
//! assert!(now.timestamp() > 0);
//! ```

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current wall clock time in UTC.
    fn utc_now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch.
    fn millis_since_epoch(&self) -> i64 {
        self.utc_now().timestamp_millis()
    }
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn utc_now(&self) -> DateTime<Utc> {
        (**self).utc_now()
    }
}
