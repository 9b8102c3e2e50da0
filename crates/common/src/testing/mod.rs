//! Test doubles for common abstractions

pub mod time;

pub use time::MockClock;
