//! Static API key authorization for Frappe sites

use async_trait::async_trait;
use fraplin_core::SiteAuthorization;
use fraplin_domain::Result;
use url::Url;

/// Sends the same `token <key:secret>` header to every site.
#[derive(Clone)]
pub struct ApiKeyAuthorization {
    header_value: String,
}

impl ApiKeyAuthorization {
    /// `api_token` is the `api_key:api_secret` pair of a site user.
    pub fn new(api_token: impl AsRef<str>) -> Self {
        Self { header_value: format!("token {}", api_token.as_ref()) }
    }
}

#[async_trait]
impl SiteAuthorization for ApiKeyAuthorization {
    async fn authorization(&self, _site: &Url) -> Result<String> {
        Ok(self.header_value.clone())
    }
}

impl std::fmt::Debug for ApiKeyAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthorization").field("header_value", &"<redacted>").finish()
    }
}
