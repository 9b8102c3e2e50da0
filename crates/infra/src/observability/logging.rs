//! Structured logging configuration
//!
//! Library code only emits `tracing` events; binaries call
//! [`init_logging`] once to install a subscriber. `RUST_LOG` overrides the
//! configured default level.
//!
//! ```ignore
//! use fraplin_infra::observability::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig::text().with_level(tracing::Level::DEBUG));
//! ```

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// JSON lines instead of human readable text
    pub json_format: bool,
    /// Used when `RUST_LOG` is not set
    pub default_level: Level,
    /// Emit span enter/exit events
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { json_format: false, default_level: Level::INFO, include_spans: false }
    }
}

impl LoggingConfig {
    pub fn json() -> Self {
        Self { json_format: true, ..Default::default() }
    }

    pub fn text() -> Self {
        Self { json_format: false, ..Default::default() }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_spans(mut self) -> Self {
        self.include_spans = true;
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.include_spans {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a global subscriber was already set; the existing
/// one stays in place.
pub fn init_logging(config: LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));
    let span_events = config.span_events();

    let installed = if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );
        tracing::subscriber::set_global_default(subscriber).is_ok()
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_span_events(span_events).with_target(true));
        tracing::subscriber::set_global_default(subscriber).is_ok()
    };

    if installed {
        tracing::debug!(
            json = config.json_format,
            level = %config.default_level,
            "Logging initialized"
        );
    }
    installed
}

/// JSON subscriber writing to `writer`, for capturing output in tests.
pub fn json_subscriber<W>(writer: W, level: Level) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(EnvFilter::new(level.to_string())).with(
        fmt::layer().json().with_writer(writer).with_target(true).with_current_span(true),
    )
}
