//! Doc type service - core business logic

use std::sync::Arc;

use fraplin_domain::constants::{DEFAULT_BATCH_SIZE, DOCTYPE_RESOURCE};
use fraplin_domain::{
    DocCustomFieldRaw, DocFieldRaw, DocTypeInfo, DocTypeRaw, DuplicateInfoPolicy, FetchConfig,
    FraplinError, Result,
};
use tracing::{info, instrument};

use super::catalog::DocTypeCatalog;
use super::merge::{assemble, group_fields, index_additional_info, FieldGroups};
use crate::pagination::ports::ResourcePageFetcher;
use crate::pagination::{BatchLoader, ResourceQuery};

/// Settings for [`DocTypeService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocTypeServiceConfig {
    pub batch_size: usize,
    pub duplicate_info_policy: DuplicateInfoPolicy,
}

impl Default for DocTypeServiceConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            duplicate_info_policy: DuplicateInfoPolicy::default(),
        }
    }
}

impl From<&FetchConfig> for DocTypeServiceConfig {
    fn from(config: &FetchConfig) -> Self {
        Self { batch_size: config.batch_size, duplicate_info_policy: config.duplicate_info_policy }
    }
}

/// Doc type service
///
/// Fetches `DocType`, `DocField` and `Custom Field` concurrently and joins
/// them into [`fraplin_domain::DocType`] objects.
#[derive(Debug, Clone)]
pub struct DocTypeService {
    loader: BatchLoader,
    config: DocTypeServiceConfig,
}

impl DocTypeService {
    /// Create a new service with the default batch size of 1000
    pub fn new(fetcher: Arc<dyn ResourcePageFetcher>) -> Self {
        Self::with_config(fetcher, DocTypeServiceConfig::default())
    }

    pub fn with_config(
        fetcher: Arc<dyn ResourcePageFetcher>,
        config: DocTypeServiceConfig,
    ) -> Self {
        Self { loader: BatchLoader::new(fetcher), config }
    }

    pub fn config(&self) -> DocTypeServiceConfig {
        self.config
    }

    /// Fetch all doc types with their fields, attaching matching enrichment.
    ///
    /// The three collections are loaded concurrently. When any of them fails
    /// the other two are cancelled and that first error is returned.
    ///
    /// # Errors
    /// Returns `FraplinError::InvalidInput` for a zero batch size or a
    /// rejected duplicate enrichment, otherwise the first fetch or decode
    /// error.
    #[instrument(skip_all, fields(batch_size = self.config.batch_size))]
    pub async fn get_doc_types<I>(&self, additional_info: I) -> Result<DocTypeCatalog>
    where
        I: IntoIterator<Item = DocTypeInfo>,
    {
        let batch_size = self.config.batch_size;
        if batch_size == 0 {
            return Err(FraplinError::InvalidInput("batch size must be positive".to_string()));
        }
        let additional_info =
            index_additional_info(additional_info, self.config.duplicate_info_policy)?;

        let (doc_types, fields, custom_fields) = tokio::try_join!(
            self.loader.load_typed::<DocTypeRaw>(batch_size, ResourceQuery::new()),
            self.loader.load_typed::<DocFieldRaw>(
                batch_size,
                ResourceQuery::new().with_param("parent", DOCTYPE_RESOURCE),
            ),
            self.loader.load_typed::<DocCustomFieldRaw>(batch_size, ResourceQuery::new()),
        )?;

        let field_count = fields.len();
        let custom_field_count = custom_fields.len();
        let mut groups = FieldGroups::new();
        group_fields(&mut groups, fields);
        group_fields(&mut groups, custom_fields);

        let catalog = DocTypeCatalog::new(assemble(doc_types, groups, &additional_info));
        info!(
            doc_types = catalog.len(),
            fields = field_count,
            custom_fields = custom_field_count,
            "Doc type catalog built"
        );
        Ok(catalog)
    }
}
