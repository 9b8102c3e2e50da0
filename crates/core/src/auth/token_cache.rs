//! Site session cache with single-flight refresh
//!
//! Holds one session per site host:
//! - The first request for a host installs an in-flight fetch; concurrent
//!   requests for the same host await that fetch instead of starting their own
//! - A completed fetch stays in place and serves later requests until it expires
//! - Expired or failed entries are evicted, so the next request fetches again

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fraplin_common::{Clock, SystemClock};
use fraplin_domain::constants::SITE_TOKEN_VALIDITY_HOURS;
use fraplin_domain::{FraplinError, Result, SiteToken};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::ports::{SiteAuthorization, SiteTokenIssuer};

type SharedFetch = Shared<BoxFuture<'static, Result<SiteToken>>>;

/// Settings for [`SiteTokenCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteTokenCacheConfig {
    /// How long a freshly issued session is trusted.
    pub validity: Duration,
}

impl Default for SiteTokenCacheConfig {
    fn default() -> Self {
        Self { validity: Duration::hours(SITE_TOKEN_VALIDITY_HOURS) }
    }
}

struct CacheEntry {
    /// Distinguishes this fetch from a later one for the same host.
    generation: u64,
    fetch: SharedFetch,
}

/// Per-site session cache backed by a [`SiteTokenIssuer`].
pub struct SiteTokenCache<K: Clock + 'static = SystemClock> {
    issuer: Arc<dyn SiteTokenIssuer>,
    clock: Arc<K>,
    config: SiteTokenCacheConfig,
    entries: DashMap<String, CacheEntry>,
    next_generation: AtomicU64,
}

impl SiteTokenCache<SystemClock> {
    /// Create a cache with the default 71 hour validity and the system clock.
    pub fn new(issuer: Arc<dyn SiteTokenIssuer>) -> Self {
        Self {
            issuer,
            clock: Arc::new(SystemClock),
            config: SiteTokenCacheConfig::default(),
            entries: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl<K: Clock + 'static> SiteTokenCache<K> {
    /// Create a cache with an explicit clock and configuration.
    ///
    /// # Errors
    /// Returns `FraplinError::InvalidInput` if the validity is not positive.
    pub fn with_clock(
        issuer: Arc<dyn SiteTokenIssuer>,
        clock: Arc<K>,
        config: SiteTokenCacheConfig,
    ) -> Result<Self> {
        if config.validity <= Duration::zero() {
            return Err(FraplinError::InvalidInput(
                "site token validity must be positive".to_string(),
            ));
        }
        Ok(Self {
            issuer,
            clock,
            config,
            entries: DashMap::new(),
            next_generation: AtomicU64::new(0),
        })
    }

    /// Return a usable session for `site`, fetching one if needed.
    ///
    /// # Errors
    /// Returns `FraplinError::InvalidInput` when the URL has no host, or the
    /// issuer's error (normally `FraplinError::Auth`). Failures are not
    /// cached.
    #[instrument(skip(self, site), fields(site = site.host_str().unwrap_or_default()))]
    pub async fn get_site_token(&self, site: &Url) -> Result<SiteToken> {
        let host = site_host(site)?;
        loop {
            let (generation, fetch) = self.entry_for(host);
            match fetch.await {
                Ok(token) if !token.is_expired_at(self.clock.utc_now()) => return Ok(token),
                Ok(token) => {
                    warn!(expired_at = %token.expires_at, "Evicting expired site token");
                    self.evict(host, generation);
                }
                Err(err) => {
                    self.evict(host, generation);
                    return Err(err);
                }
            }
        }
    }

    /// Drop the cached session for `site`. Returns whether one was present.
    pub fn invalidate(&self, site: &Url) -> bool {
        site.host_str().is_some_and(|host| self.entries.remove(host).is_some())
    }

    /// Number of sites with a cached or in-flight session.
    pub fn cached_sites(&self) -> usize {
        self.entries.len()
    }

    /// Current entry for `host`, installing a new fetch when there is none.
    fn entry_for(&self, host: &str) -> (u64, SharedFetch) {
        match self.entries.entry(host.to_string()) {
            Entry::Occupied(entry) => {
                let entry = entry.get();
                (entry.generation, entry.fetch.clone())
            }
            Entry::Vacant(entry) => {
                let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
                let fetch = self.start_fetch(host);
                entry.insert(CacheEntry { generation, fetch: fetch.clone() });
                (generation, fetch)
            }
        }
    }

    // Only removes the entry this caller observed; a newer fetch stays.
    fn evict(&self, host: &str, generation: u64) {
        self.entries.remove_if(host, |_, entry| entry.generation == generation);
    }

    fn start_fetch(&self, host: &str) -> SharedFetch {
        let issuer = Arc::clone(&self.issuer);
        let clock = Arc::clone(&self.clock);
        let validity = self.config.validity;
        let host = host.to_string();

        async move {
            debug!(site = %host, "Requesting site session from authority");
            let issued = issuer.issue_session(&host).await.and_then(|session_id| {
                SiteToken::issued_at(session_id, clock.utc_now(), validity)
            });
            match issued {
                Ok(token) => {
                    info!(site = %host, expires_at = %token.expires_at, "Site session issued");
                    Ok(token)
                }
                Err(err) => {
                    warn!(site = %host, error = %err, "Site session request failed");
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl<K: Clock + 'static> SiteAuthorization for SiteTokenCache<K> {
    async fn authorization(&self, site: &Url) -> Result<String> {
        Ok(self.get_site_token(site).await?.authorization_value())
    }
}

impl<K: Clock + 'static> std::fmt::Debug for SiteTokenCache<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteTokenCache")
            .field("config", &self.config)
            .field("cached_sites", &self.entries.len())
            .finish_non_exhaustive()
    }
}

fn site_host(site: &Url) -> Result<&str> {
    site.host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| FraplinError::InvalidInput(format!("site url has no host: {site}")))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    struct StaticIssuer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SiteTokenIssuer for StaticIssuer {
        async fn issue_session(&self, site_host: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{site_host}-{n}"))
        }
    }

    fn site(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn hit_does_not_call_issuer_again() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let cache = SiteTokenCache::new(issuer.clone());

        let first = cache.get_site_token(&site("https://a.frappe.cloud")).await.unwrap();
        let second = cache.get_site_token(&site("https://a.frappe.cloud/app")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.cached_sites(), 1);
    }

    #[tokio::test]
    async fn sites_are_cached_independently() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let cache = SiteTokenCache::new(issuer.clone());

        let a = cache.get_site_token(&site("https://a.frappe.cloud")).await.unwrap();
        let b = cache.get_site_token(&site("https://b.frappe.cloud")).await.unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(cache.cached_sites(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let cache = SiteTokenCache::new(issuer.clone());
        let url = site("https://a.frappe.cloud");

        cache.get_site_token(&url).await.unwrap();
        assert!(cache.invalidate(&url));
        assert!(!cache.invalidate(&url));
        let token = cache.get_site_token(&url).await.unwrap();

        assert_eq!(token.token, "a.frappe.cloud-1");
    }

    #[tokio::test]
    async fn url_without_host_is_rejected() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let cache = SiteTokenCache::new(issuer.clone());

        let err = cache.get_site_token(&site("data:text/plain,hello")).await.unwrap_err();

        assert!(matches!(err, FraplinError::InvalidInput(_)));
        assert_eq!(issuer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_positive_validity_is_rejected() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let result = SiteTokenCache::with_clock(
            issuer,
            Arc::new(SystemClock),
            SiteTokenCacheConfig { validity: Duration::zero() },
        );
        assert!(matches!(result, Err(FraplinError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn authorization_header_uses_session_id() {
        let issuer = Arc::new(StaticIssuer { calls: AtomicUsize::new(0) });
        let cache = SiteTokenCache::new(issuer);

        let header = cache.authorization(&site("https://a.frappe.cloud")).await.unwrap();

        assert_eq!(header, "token a.frappe.cloud-0");
    }
}
