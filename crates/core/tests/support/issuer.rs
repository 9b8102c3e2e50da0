//! Scriptable `SiteTokenIssuer`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fraplin_core::SiteTokenIssuer;
use fraplin_domain::{FraplinError, Result as DomainResult};

/// Issues `sid-<n>` sessions, optionally slowly or with queued failures.
#[derive(Default, Clone)]
pub struct CountingIssuer {
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
    failures: Arc<Mutex<VecDeque<FraplinError>>>,
}

impl CountingIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The next call fails with `error`; later calls succeed again.
    pub fn fail_next(self, error: FraplinError) -> Self {
        self.failures.lock().unwrap().push_back(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SiteTokenIssuer for CountingIssuer {
    async fn issue_session(&self, _site_host: &str) -> DomainResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = self.failures.lock().unwrap().pop_front();
        match failure {
            Some(error) => Err(error),
            None => Ok(format!("sid-{n}")),
        }
    }
}
