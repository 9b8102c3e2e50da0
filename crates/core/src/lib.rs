//! # Fraplin Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for page fetching and site authorization
//! - The batch paginator
//! - The doc type merge service
//! - The single-flight site credential cache
//!
//! ## Architecture Principles
//! - Only depends on `fraplin-common` and `fraplin-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod doctypes;
pub mod pagination;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{SiteAuthorization, SiteTokenIssuer};
pub use auth::{SiteTokenCache, SiteTokenCacheConfig};
pub use doctypes::{DocTypeCatalog, DocTypeService, DocTypeServiceConfig};
pub use pagination::ports::{PageRequest, ResourcePageFetcher};
pub use pagination::{BatchLoader, ResourceQuery};
