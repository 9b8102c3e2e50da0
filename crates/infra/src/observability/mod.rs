//! Observability setup for binaries and demos

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
