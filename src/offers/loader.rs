// offers/loader.rs

use crate::model::ScriptLoadError;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_OFFERS_SCRIPT_URL: &str = "https://sc.affilizz.com/affilizz.js";

/// Where an external script actually comes from.
#[async_trait::async_trait]
pub trait ScriptSource: Send + Sync {
    async fn load(&self, url: &str) -> Result<(), ScriptLoadError>;
}

/// Fetches the script over HTTP; a success status counts as loaded.
pub struct HttpScriptSource {
    client: Client,
}

impl HttpScriptSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; GardenCompare/0.1)")
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ScriptSource for HttpScriptSource {
    async fn load(&self, url: &str) -> Result<(), ScriptLoadError> {
        info!("Loading offers script {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Offers script request failed: {:?}", e);
            ScriptLoadError::Failed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!("Offers script responded [{}]", status);
            return Err(ScriptLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        info!("Offers script loaded [{}]", status);
        Ok(())
    }
}

pub type ScriptLoad = Shared<BoxFuture<'static, Result<(), ScriptLoadError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

/// One load per script URL, shared by every caller. A failed load is replaced by a
/// fresh one the next time it is requested after it settled; callers that joined
/// while it was in flight all see the same failure.
pub struct ScriptRegistry {
    source: Arc<dyn ScriptSource>,
    loads: Mutex<HashMap<String, ScriptLoad>>,
}

impl ScriptRegistry {
    pub fn new(source: Arc<dyn ScriptSource>) -> Self {
        Self {
            source,
            loads: Mutex::new(HashMap::new()),
        }
    }

    pub fn ensure_loaded(&self, url: &str) -> ScriptLoad {
        let mut loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = loads.get(url) {
            match existing.peek() {
                Some(Err(e)) => info!("Previous load of {} failed ({}), requesting again", url, e),
                _ => return existing.clone(),
            }
        }

        let source = self.source.clone();
        let owned_url = url.to_string();
        let load = async move { source.load(&owned_url).await }.boxed().shared();
        loads.insert(url.to_string(), load.clone());
        load
    }

    pub fn state(&self, url: &str) -> LoadState {
        let loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        match loads.get(url).map(|l| l.peek()) {
            None => LoadState::NotRequested,
            Some(None) => LoadState::Loading,
            Some(Some(Ok(()))) => LoadState::Loaded,
            Some(Some(Err(_))) => LoadState::Failed,
        }
    }
}

/// The offers script as seen by the cards: one registry, one URL.
#[derive(Clone)]
pub struct OffersScript {
    registry: Arc<ScriptRegistry>,
    url: String,
}

impl OffersScript {
    pub fn new(registry: Arc<ScriptRegistry>, url: impl Into<String>) -> Self {
        Self {
            registry,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ensure_loaded(&self) -> ScriptLoad {
        self.registry.ensure_loaded(&self.url)
    }

    pub fn state(&self) -> LoadState {
        self.registry.state(&self.url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    /// Waits for a released permit before answering, counting every request.
    pub(crate) struct GatedSource {
        pub calls: AtomicUsize,
        release: Semaphore,
        pub fail: bool,
    }

    impl GatedSource {
        pub fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                release: Semaphore::new(0),
                fail,
            })
        }

        pub fn release(&self, loads: usize) {
            self.release.add_permits(loads);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ScriptSource for GatedSource {
        async fn load(&self, url: &str) -> Result<(), ScriptLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(permit) = self.release.acquire().await {
                permit.forget();
            }
            if self.fail {
                Err(ScriptLoadError::Failed {
                    url: url.to_string(),
                    reason: "blocked".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    const URL: &str = "https://cdn.test/offers.js";

    #[tokio::test]
    async fn concurrent_callers_share_one_request() {
        let source = GatedSource::new(false);
        let registry = ScriptRegistry::new(source.clone());
        assert_eq!(registry.state(URL), LoadState::NotRequested);

        let first = registry.ensure_loaded(URL);
        let second = registry.ensure_loaded(URL);
        assert_eq!(registry.state(URL), LoadState::Loading);

        source.release(1);
        let (a, b) = futures::join!(first, second);
        assert_eq!(a, Ok(()));
        assert_eq!(b, Ok(()));
        assert_eq!(source.calls(), 1);
        assert_eq!(registry.state(URL), LoadState::Loaded);

        assert_eq!(registry.ensure_loaded(URL).await, Ok(()));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn in_flight_failure_is_shared_then_retried() {
        let source = GatedSource::new(true);
        let registry = ScriptRegistry::new(source.clone());

        let first = registry.ensure_loaded(URL);
        let second = registry.ensure_loaded(URL);
        source.release(1);
        let (a, b) = futures::join!(first, second);
        assert!(a.is_err());
        assert_eq!(a, b);
        assert_eq!(source.calls(), 1);
        assert_eq!(registry.state(URL), LoadState::Failed);

        let retry = registry.ensure_loaded(URL);
        source.release(1);
        assert!(retry.await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn urls_are_tracked_separately() {
        let source = GatedSource::new(false);
        let registry = ScriptRegistry::new(source.clone());
        let a = registry.ensure_loaded("https://a.test/x.js");
        let b = registry.ensure_loaded("https://b.test/x.js");
        source.release(2);
        let (ra, rb) = futures::join!(a, b);
        assert!(ra.is_ok() && rb.is_ok());
        assert_eq!(source.calls(), 2);
    }
}
