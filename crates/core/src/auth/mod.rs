//! Site authentication: ports and the cached session store

pub mod ports;
pub mod token_cache;

pub use token_cache::{SiteTokenCache, SiteTokenCacheConfig};
