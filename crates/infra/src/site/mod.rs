//! Frappe site access

pub mod client;

pub use client::FrappeSiteClient;
