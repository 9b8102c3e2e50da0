//! In-memory `ResourcePageFetcher`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fraplin_core::{PageRequest, ResourcePageFetcher, ResourceQuery};
use fraplin_domain::{FraplinError, RawRecord, ResourceType, Result as DomainResult};
use serde_json::Value;

/// One page request as the fetcher saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub resource: String,
    pub page: PageRequest,
    pub query: ResourceQuery,
}

/// Serves fixed rows per resource, sliced by the requested window.
#[derive(Default, Clone)]
pub struct InMemoryPageFetcher {
    rows: Arc<HashMap<String, Vec<Value>>>,
    failures: Arc<HashMap<String, FraplinError>>,
    delays: Arc<HashMap<String, Duration>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl InMemoryPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for `resource`.
    pub fn with_rows(mut self, resource: &str, rows: Vec<Value>) -> Self {
        Arc::make_mut(&mut self.rows).insert(resource.to_string(), rows);
        self
    }

    /// Fail every page of `resource` with `error`.
    pub fn with_failure(mut self, resource: &str, error: FraplinError) -> Self {
        Arc::make_mut(&mut self.failures).insert(resource.to_string(), error);
        self
    }

    /// Sleep before answering pages of `resource`.
    pub fn with_delay(mut self, resource: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.delays).insert(resource.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, resource: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.resource == resource).collect()
    }
}

#[async_trait]
impl ResourcePageFetcher for InMemoryPageFetcher {
    async fn fetch_page(
        &self,
        resource: &ResourceType,
        page: PageRequest,
        query: &ResourceQuery,
    ) -> DomainResult<Vec<RawRecord>> {
        self.requests.lock().unwrap().push(RecordedRequest {
            resource: resource.to_string(),
            page,
            query: query.clone(),
        });

        if let Some(delay) = self.delays.get(resource.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(error) = self.failures.get(resource.as_str()) {
            return Err(error.clone());
        }

        let rows = self.rows.get(resource.as_str()).map(Vec::as_slice).unwrap_or_default();
        rows.iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .map(RawRecord::from_value)
            .collect()
    }
}
