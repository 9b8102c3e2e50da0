//! # Fraplin Domain
//!
//! Domain types and models for Fraplin.
//!
//! This crate contains:
//! - Raw Frappe resource records and the assembled `DocType`
//! - The site session credential (`SiteToken`)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Fraplin crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
