//! Conversions from external infrastructure errors into domain errors.

use fraplin_domain::FraplinError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FraplinError);

impl From<InfraError> for FraplinError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FraplinError> for InfraError {
    fn from(value: FraplinError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoFraplinError {
    fn into_fraplin(self) -> FraplinError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FraplinError */
/* -------------------------------------------------------------------------- */

impl IntoFraplinError for HttpError {
    fn into_fraplin(self) -> FraplinError {
        // Query strings can carry filters with record data; messages keep the path only.
        let target = self
            .url()
            .map(|url| {
                let mut url = url.clone();
                url.set_query(None);
                url.to_string()
            })
            .unwrap_or_default();
        let err = self.without_url();

        if err.is_decode() {
            return FraplinError::Decode(format!("invalid response body from {target}: {err}"));
        }

        if err.is_builder() {
            return FraplinError::InvalidInput(format!("invalid HTTP request: {err}"));
        }

        if err.is_timeout() {
            return FraplinError::Transport(format!("HTTP request to {target} timed out"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if err.is_connect() {
            return FraplinError::Transport(format!("HTTP connection failure to {target}"));
        }

        if let Some(status) = err.status() {
            return FraplinError::Transport(format!(
                "{target} returned status {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        FraplinError::Transport(format!("HTTP request to {target} failed: {err}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_fraplin())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → FraplinError */
/* -------------------------------------------------------------------------- */

impl IntoFraplinError for JsonError {
    fn into_fraplin(self) -> FraplinError {
        use serde_json::error::Category;

        match self.classify() {
            Category::Io => FraplinError::Transport(format!("failed to read JSON: {self}")),
            Category::Syntax | Category::Data | Category::Eof => {
                FraplinError::Decode(self.to_string())
            }
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_fraplin())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → FraplinError */
/* -------------------------------------------------------------------------- */

impl IntoFraplinError for UrlError {
    fn into_fraplin(self) -> FraplinError {
        FraplinError::Config(format!("invalid URL: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_fraplin())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
