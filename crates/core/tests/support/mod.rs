//! Shared test helpers for `fraplin-core` integration tests.
//!
//! These helpers provide in-memory implementations of the core ports so
//! tests can focus on pagination, merge and caching behaviour.

#![allow(dead_code)]

pub mod fetcher;
pub mod issuer;
