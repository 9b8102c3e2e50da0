//! Site session credential issued by the authority server

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{FraplinError, Result};

/// Session id for one site and the instant after which it must not be used.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl SiteToken {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { token: token.into(), expires_at }
    }

    /// Token issued at `issued_at` that stays valid for `validity`.
    ///
    /// # Errors
    /// Returns `FraplinError::InvalidInput` when the expiry falls outside
    /// the representable date range.
    pub fn issued_at(
        token: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Result<Self> {
        let expires_at = issued_at.checked_add_signed(validity).ok_or_else(|| {
            FraplinError::InvalidInput(format!(
                "site token validity of {validity} overflows the expiry date"
            ))
        })?;
        Ok(Self::new(token, expires_at))
    }

    /// A token is still usable at the exact instant it expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Value for the `Authorization` header of site requests.
    pub fn authorization_value(&self) -> String {
        format!("token {}", self.token)
    }
}

// The session id is a credential; keep it out of logs.
impl fmt::Debug for SiteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
