//! Frappe Cloud authority client

pub mod client;

pub use client::FrappeCloudClient;
