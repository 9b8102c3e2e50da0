//! Port interfaces for site authentication

use async_trait::async_trait;
use fraplin_domain::Result;
use url::Url;

/// Exchanges an account credential for a site session id.
#[async_trait]
pub trait SiteTokenIssuer: Send + Sync {
    /// Ask the authority for a session on `site_host` and return its id.
    async fn issue_session(&self, site_host: &str) -> Result<String>;
}

/// Provides the `Authorization` header value for requests to a site.
#[async_trait]
pub trait SiteAuthorization: Send + Sync {
    async fn authorization(&self, site: &Url) -> Result<String>;
}
