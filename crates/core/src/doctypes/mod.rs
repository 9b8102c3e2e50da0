//! Doc type metadata: concurrent fetch and merge into [`DocType`] objects
//!
//! [`DocType`]: fraplin_domain::DocType

pub mod catalog;
pub mod merge;
pub mod service;

pub use catalog::DocTypeCatalog;
pub use service::{DocTypeService, DocTypeServiceConfig};
