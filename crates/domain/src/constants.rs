//! Domain constants
//!
//! Centralized location for protocol names and defaults used across the
//! workspace.

// Frappe resource names
pub const DOCTYPE_RESOURCE: &str = "DocType";
pub const DOCFIELD_RESOURCE: &str = "DocField";
pub const CUSTOM_FIELD_RESOURCE: &str = "Custom Field";

// Pagination
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const RESOURCE_API_PATH: &str = "api/resource";

// Site credentials
pub const DEFAULT_AUTHORITY_URL: &str = "https://frappecloud.com/api/method/press.api.site.login";
/// Session validity assumed for a site login, kept one hour shorter than the
/// three days the server grants.
pub const SITE_TOKEN_VALIDITY_HOURS: i64 = 3 * 24 - 1;

// HTTP
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("fraplin/", env!("CARGO_PKG_VERSION"));
