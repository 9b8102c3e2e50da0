//! # Fraplin Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest based HTTP transport
//! - The Frappe site REST client (`FrappeSiteClient`)
//! - The Frappe Cloud site login client (`FrappeCloudClient`)
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Implements traits defined in `fraplin-core`
//! - Contains all "impure" code (network, files, environment)

pub mod auth;
pub mod cloud;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod site;

// Re-export commonly used items
pub use auth::ApiKeyAuthorization;
pub use cloud::FrappeCloudClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_logging, LoggingConfig};
pub use site::FrappeSiteClient;
