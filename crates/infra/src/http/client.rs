use std::time::Duration;

use fraplin_domain::constants::{DEFAULT_TIMEOUT_SECS, USER_AGENT};
use fraplin_domain::FraplinError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::InfraError;

/// Longest response body quoted in a status error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP client that performs exactly one attempt per request.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, FraplinError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, FraplinError> {
        let request = builder.build().map_err(|err| FraplinError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, url = %redacted(&url), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, url = %redacted(&url), %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, url = %redacted(&url), error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// Send the request and decode a successful JSON response into `T`.
    ///
    /// # Errors
    /// `FraplinError::Transport` when the request fails or the status is not
    /// 2xx, `FraplinError::Decode` when the body does not match `T`.
    pub async fn get_json_if_successful<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, FraplinError> {
        let response = self.send(builder).await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &redacted(&url), &body));
        }

        let bytes =
            response.bytes().await.map_err(|err| FraplinError::from(InfraError::from(err)))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            FraplinError::Decode(format!("unexpected response from {}: {err}", redacted(&url)))
        })
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: String,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, FraplinError> {
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).user_agent(self.user_agent).no_proxy();

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| FraplinError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

fn map_status_error(status: StatusCode, url: &str, body: &str) -> FraplinError {
    let body = body.trim();
    if body.is_empty() {
        return FraplinError::Transport(format!("{url} returned status {status}"));
    }
    let quoted: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    FraplinError::Transport(format!("{url} returned status {status}: {quoted}"))
}

// Query strings can carry filters with customer data; logs keep the path only.
fn redacted(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    #[tokio::test]
    async fn decodes_successful_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let payload: Payload = client
            .get_json_if_successful(client.request(Method::GET, format!("{}/ok", server.uri())))
            .await
            .unwrap();

        assert_eq!(payload, Payload { value: 7 });
    }

    #[tokio::test]
    async fn server_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_json_if_successful::<Payload>(client.request(Method::GET, server.uri()))
            .await
            .unwrap_err();

        match err {
            FraplinError::Transport(msg) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("maintenance"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn wrong_shape_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"other": 1})))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_json_if_successful::<Payload>(client.request(Method::GET, server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FraplinError::Decode(msg) if msg.contains("value")));
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": 1})))
            .mount(&server)
            .await;

        let client = HttpClient::builder().user_agent("fraplin-test").build().unwrap();
        let _: Payload =
            client.get_json_if_successful(client.request(Method::GET, server.uri())).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].headers.get("user-agent").unwrap(), "fraplin-test");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        let err = map_status_error(StatusCode::BAD_GATEWAY, "http://site/api", &body);
        assert!(err.to_string().len() < 700);
    }
}
