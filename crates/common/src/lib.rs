//! Common utilities shared across Fraplin crates.
//!
//! - [`time`]: the [`Clock`] abstraction and the real system clock
//! - `testing`: `MockClock` for deterministic expiry tests, behind the
//!   `test-utils` feature

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(any(feature = "test-utils", test))]
pub mod testing;
pub mod time;

pub use time::{Clock, SystemClock};
