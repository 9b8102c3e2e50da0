//! Port interfaces for page fetching

use async_trait::async_trait;
use fraplin_domain::{RawRecord, ResourceType, Result};

use super::query::ResourceQuery;

/// One offset/limit window of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// The `limit_start` / `limit` query pairs, in that order.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("limit_start", self.offset.to_string()), ("limit", self.limit.to_string())]
    }
}

/// Trait for fetching a single page of a remote collection
#[async_trait]
pub trait ResourcePageFetcher: Send + Sync {
    /// Fetch the records of one page, in server order.
    async fn fetch_page(
        &self,
        resource: &ResourceType,
        page: PageRequest,
        query: &ResourceQuery,
    ) -> Result<Vec<RawRecord>>;
}
