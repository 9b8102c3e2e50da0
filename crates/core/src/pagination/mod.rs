//! Offset/limit pagination over `/api/resource` collections

pub mod ports;
pub mod query;
pub mod service;

pub use query::ResourceQuery;
pub use service::BatchLoader;
