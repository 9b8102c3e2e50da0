//! Exchanges a Frappe Cloud account token for site sessions
//!
//! `POST {authority}` with `{"name": "<site host>"}` and
//! `Authorization: Token <account token>` answers
//! `{"message": {"sid": "<session id>"}}`.

use async_trait::async_trait;
use fraplin_core::SiteTokenIssuer;
use fraplin_domain::constants::DEFAULT_AUTHORITY_URL;
use fraplin_domain::{FraplinError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::errors::InfraError;
use crate::http::{json_body, HttpClient};

#[derive(Serialize)]
struct SiteLoginRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct SiteLoginResponse {
    message: SiteLoginMessage,
}

#[derive(Deserialize)]
struct SiteLoginMessage {
    sid: String,
}

/// Client for the Frappe Cloud site login endpoint
#[derive(Clone)]
pub struct FrappeCloudClient {
    http: HttpClient,
    authority_url: Url,
    token: String,
}

impl FrappeCloudClient {
    /// Create a client for the public Frappe Cloud authority.
    pub fn new(token: impl Into<String>, http: HttpClient) -> Result<Self> {
        let authority_url = Url::parse(DEFAULT_AUTHORITY_URL)
            .map_err(|err| FraplinError::from(InfraError::from(err)))?;
        Ok(Self::with_authority_url(token, authority_url, http))
    }

    pub fn with_authority_url(
        token: impl Into<String>,
        authority_url: Url,
        http: HttpClient,
    ) -> Self {
        Self { http, authority_url, token: token.into() }
    }

    pub fn authority_url(&self) -> &Url {
        &self.authority_url
    }
}

#[async_trait]
impl SiteTokenIssuer for FrappeCloudClient {
    /// # Errors
    /// Any failure, including transport errors and malformed answers, is
    /// reported as `FraplinError::Auth`.
    #[instrument(skip(self))]
    async fn issue_session(&self, site_host: &str) -> Result<String> {
        let body = json_body(&SiteLoginRequest { name: site_host }).map_err(|err| {
            FraplinError::Auth(format!("site login request for {site_host} failed: {err}"))
        })?;
        let request = self
            .http
            .request(Method::POST, self.authority_url.clone())
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body);

        let response: SiteLoginResponse =
            self.http.get_json_if_successful(request).await.map_err(|err| {
                FraplinError::Auth(format!("site login for {site_host} failed: {err}"))
            })?;

        if response.message.sid.is_empty() {
            return Err(FraplinError::Auth(format!(
                "site login for {site_host} returned an empty session id"
            )));
        }

        debug!("Site session received");
        Ok(response.message.sid)
    }
}

impl std::fmt::Debug for FrappeCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrappeCloudClient")
            .field("authority_url", &self.authority_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}
