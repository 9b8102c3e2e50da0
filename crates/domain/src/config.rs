//! Configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTHORITY_URL, DEFAULT_BATCH_SIZE, DEFAULT_TIMEOUT_SECS};
use crate::errors::{FraplinError, Result};
use crate::impl_config_option;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraplinConfig {
    pub site: SiteConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<CloudConfig>,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Target Frappe site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub url: String,
    /// Static `key:secret` pair sent as `token <api_token>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

/// Frappe Cloud account used to obtain site sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    pub token: String,
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
}

/// Pagination and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub duplicate_info_policy: DuplicateInfoPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            duplicate_info_policy: DuplicateInfoPolicy::default(),
        }
    }
}

/// What to do when two enrichment entries share a doc type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateInfoPolicy {
    #[default]
    LastWins,
    FirstWins,
    Reject,
}

impl_config_option!(DuplicateInfoPolicy {
    LastWins => "last_wins",
    FirstWins => "first_wins",
    Reject => "reject",
});

impl CloudConfig {
    /// Account token against the default Frappe Cloud authority.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), authority_url: default_authority_url() }
    }
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

const fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl FraplinConfig {
    /// Check the invariants that do not need URL parsing.
    ///
    /// # Errors
    /// Returns `FraplinError::Config` for an empty site URL, a zero batch
    /// size or timeout, or when no credential is configured.
    pub fn validate(&self) -> Result<()> {
        if self.site.url.trim().is_empty() {
            return Err(FraplinError::Config("site url must not be empty".to_string()));
        }
        if self.fetch.batch_size == 0 {
            return Err(FraplinError::Config("batch_size must be positive".to_string()));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(FraplinError::Config("timeout_seconds must be positive".to_string()));
        }
        if self.site.api_token.is_none() && self.cloud.is_none() {
            return Err(FraplinError::Config(
                "either site.api_token or cloud.token must be set".to_string(),
            ));
        }
        Ok(())
    }
}
