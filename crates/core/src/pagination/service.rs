//! Batch paginator - fetches every page of a collection

use std::sync::Arc;

use fraplin_domain::{FraplinError, RecordSet, ResourceRecord, ResourceType, Result};
use tracing::{debug, info, instrument};

use super::ports::{PageRequest, ResourcePageFetcher};
use super::query::ResourceQuery;

/// Loads whole collections through a [`ResourcePageFetcher`], one page at a
/// time.
#[derive(Clone)]
pub struct BatchLoader {
    fetcher: Arc<dyn ResourcePageFetcher>,
}

impl BatchLoader {
    pub fn new(fetcher: Arc<dyn ResourcePageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch pages of `batch_size` records until a short page arrives.
    ///
    /// Page `i` starts at `i * batch_size`. The short page (possibly empty)
    /// is included. Records with identical content collapse into one.
    ///
    /// # Errors
    /// Returns `FraplinError::InvalidInput` for a zero batch size, otherwise
    /// the first page error unchanged. No partial result is returned.
    #[instrument(skip(self, resource, query), fields(resource = %resource))]
    pub async fn load_batches(
        &self,
        resource: &ResourceType,
        batch_size: usize,
        query: &ResourceQuery,
    ) -> Result<RecordSet> {
        if batch_size == 0 {
            return Err(FraplinError::InvalidInput("batch size must be positive".to_string()));
        }

        let mut records = RecordSet::new();
        let mut page_index = 0usize;
        loop {
            let offset = page_index.checked_mul(batch_size).ok_or_else(|| {
                FraplinError::Internal(format!("page offset overflow for {resource}"))
            })?;
            let page = self
                .fetcher
                .fetch_page(resource, PageRequest { offset, limit: batch_size }, query)
                .await?;

            let page_len = page.len();
            debug!(page = page_index, offset, records = page_len, "Fetched page");
            records.extend(page);

            if page_len < batch_size {
                break;
            }
            page_index += 1;
        }

        info!(pages = page_index + 1, records = records.len(), "Resource loaded");
        Ok(records)
    }

    /// Fetch every record of `R`, projecting `R::FIELDS`, and decode them.
    ///
    /// # Errors
    /// As [`Self::load_batches`], plus `FraplinError::Decode` when a record
    /// lacks a required field.
    pub async fn load_typed<R: ResourceRecord>(
        &self,
        batch_size: usize,
        query: ResourceQuery,
    ) -> Result<Vec<R>> {
        let resource = ResourceType::new(R::RESOURCE);
        let query = query.with_fields(R::FIELDS.iter().copied());
        let records = self.load_batches(&resource, batch_size, &query).await?;

        records
            .into_iter()
            .map(|record| {
                record.decode::<R>().map_err(|err| match err {
                    FraplinError::Decode(msg) => FraplinError::Decode(format!("{resource}: {msg}")),
                    other => other,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for BatchLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader").finish_non_exhaustive()
    }
}
