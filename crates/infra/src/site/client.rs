//! Frappe site REST client
//!
//! Serves pages of `GET {site}/api/resource/{resource}` to the core
//! paginator and exposes the doc type fetch directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fraplin_core::{
    BatchLoader, DocTypeCatalog, DocTypeService, DocTypeServiceConfig, PageRequest,
    ResourcePageFetcher, ResourceQuery, SiteAuthorization, SiteTokenCache,
};
use fraplin_domain::constants::RESOURCE_API_PATH;
use fraplin_domain::{
    DocTypeInfo, FraplinConfig, FraplinError, RawRecord, RecordSet, ResourceType, Result,
};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::auth::ApiKeyAuthorization;
use crate::cloud::FrappeCloudClient;
use crate::errors::InfraError;
use crate::http::{resource_url, HttpClient};

#[derive(Deserialize)]
struct ResourcePage {
    data: Vec<Value>,
}

/// Client for one Frappe site
#[derive(Clone)]
pub struct FrappeSiteClient {
    http: HttpClient,
    base_url: Url,
    auth: Arc<dyn SiteAuthorization>,
    doc_types: DocTypeServiceConfig,
}

impl FrappeSiteClient {
    pub fn new(base_url: Url, auth: Arc<dyn SiteAuthorization>, http: HttpClient) -> Self {
        Self { http, base_url, auth, doc_types: DocTypeServiceConfig::default() }
    }

    /// Client authenticating with a site user's `api_key:api_secret`.
    pub fn with_api_token(base_url: Url, api_token: &str, http: HttpClient) -> Self {
        Self::new(base_url, Arc::new(ApiKeyAuthorization::new(api_token)), http)
    }

    /// Build a client from application configuration.
    ///
    /// A site API token takes precedence; otherwise sessions are obtained
    /// from the Frappe Cloud authority and cached per site.
    ///
    /// # Errors
    /// Returns `FraplinError::Config` for invalid settings or URLs.
    pub fn from_config(config: &FraplinConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_url(&config.site.url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.fetch.timeout_seconds))
            .build()?;

        let auth: Arc<dyn SiteAuthorization> = match (&config.site.api_token, &config.cloud) {
            (Some(api_token), _) => Arc::new(ApiKeyAuthorization::new(api_token)),
            (None, Some(cloud)) => {
                let authority_url = parse_url(&cloud.authority_url)?;
                let issuer = FrappeCloudClient::with_authority_url(
                    cloud.token.clone(),
                    authority_url,
                    http.clone(),
                );
                Arc::new(SiteTokenCache::new(Arc::new(issuer)))
            }
            (None, None) => {
                return Err(FraplinError::Config("no site credentials configured".to_string()))
            }
        };

        Ok(Self::new(base_url, auth, http)
            .with_doc_type_config(DocTypeServiceConfig::from(&config.fetch)))
    }

    #[must_use]
    pub fn with_doc_type_config(mut self, config: DocTypeServiceConfig) -> Self {
        self.doc_types = config;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch every record of `resource`; see [`BatchLoader::load_batches`].
    pub async fn load_batches(
        &self,
        resource: &ResourceType,
        batch_size: usize,
        query: &ResourceQuery,
    ) -> Result<RecordSet> {
        BatchLoader::new(Arc::new(self.clone())).load_batches(resource, batch_size, query).await
    }

    /// Fetch all doc types with their standard and custom fields.
    pub async fn get_doc_types<I>(&self, additional_info: I) -> Result<DocTypeCatalog>
    where
        I: IntoIterator<Item = DocTypeInfo>,
    {
        DocTypeService::with_config(Arc::new(self.clone()), self.doc_types)
            .get_doc_types(additional_info)
            .await
    }
}

#[async_trait]
impl ResourcePageFetcher for FrappeSiteClient {
    async fn fetch_page(
        &self,
        resource: &ResourceType,
        page: PageRequest,
        query: &ResourceQuery,
    ) -> Result<Vec<RawRecord>> {
        let mut pairs: Vec<(String, String)> =
            page.query_pairs().into_iter().map(|(key, value)| (key.to_string(), value)).collect();
        pairs.extend(query.query_pairs());

        let url = resource_url(&self.base_url, [RESOURCE_API_PATH, resource.as_str()], &pairs)?;
        let authorization = self.auth.authorization(&self.base_url).await?;

        debug!(%resource, offset = page.offset, limit = page.limit, "Requesting resource page");
        let request = self
            .http
            .request(Method::GET, url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json");
        let page_body: ResourcePage = self.http.get_json_if_successful(request).await?;

        page_body.data.into_iter().map(RawRecord::from_value).collect()
    }
}

impl std::fmt::Debug for FrappeSiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrappeSiteClient")
            .field("base_url", &self.base_url.as_str())
            .field("doc_types", &self.doc_types)
            .finish_non_exhaustive()
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| FraplinError::from(InfraError::from(err)))?;
    if url.host_str().is_none() {
        return Err(FraplinError::Config(format!("URL has no host: {raw}")));
    }
    info!(url = %url, "Using endpoint");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use fraplin_domain::{CloudConfig, FetchConfig, SiteConfig};

    use super::*;

    fn config(api_token: Option<&str>, cloud: Option<&str>) -> FraplinConfig {
        FraplinConfig {
            site: SiteConfig {
                url: "https://erp.example.com".to_string(),
                api_token: api_token.map(str::to_string),
            },
            cloud: cloud.map(|token| CloudConfig {
                token: token.to_string(),
                authority_url: "https://frappecloud.com/api/method/press.api.site.login"
                    .to_string(),
            }),
            fetch: FetchConfig { batch_size: 250, ..FetchConfig::default() },
        }
    }

    #[test]
    fn from_config_carries_batch_size() {
        let client = FrappeSiteClient::from_config(&config(Some("k:s"), None)).unwrap();
        assert_eq!(client.doc_types.batch_size, 250);
        assert_eq!(client.base_url().host_str(), Some("erp.example.com"));
    }

    #[test]
    fn from_config_accepts_cloud_credentials() {
        assert!(FrappeSiteClient::from_config(&config(None, Some("cloud"))).is_ok());
    }

    #[test]
    fn from_config_rejects_bad_site_url() {
        let mut cfg = config(Some("k:s"), None);
        cfg.site.url = "erp.example.com".to_string();
        let err = FrappeSiteClient::from_config(&cfg).unwrap_err();
        assert!(matches!(err, FraplinError::Config(_)));
    }
}
