//! The offline worker: lifecycle handling and fetch interception.
//!
//! Install pre-populates the current cache namespace from a fixed asset
//! manifest; activate deletes every stale namespace and claims open pages;
//! once activated, every intercepted GET is routed through
//! [`classify`](crate::strategy::classify) into one of the two strategies.

use std::sync::Arc;

use money_net::{FetchRequest, FetchResponse, Fetcher};
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::cache::CacheStorage;
use crate::lifecycle::{Clients, WorkerState};
use crate::strategy::{classify, fallback_response, StrategyDecision};
use crate::SwError;

/// Current cache namespace. Bumping this string is the only supported
/// cache-invalidation mechanism: stale namespaces are deleted on the next
/// activation and the manifest is re-cached on the next install.
pub const CACHE_NAME: &str = "money-app-v1";

/// Assets pre-cached at install time.
pub const ASSET_MANIFEST: [&str; 4] = ["/", "/index.html", "/src/main.js", "/src/style.css"];

/// Result of intercepting a request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The worker does not handle this request; forward it untouched.
    Bypass,
    /// The worker produced the response.
    Respond(FetchResponse),
}

/// The offline worker.
pub struct OfflineWorker {
    origin: Url,
    state: RwLock<WorkerState>,
    caches: Arc<RwLock<CacheStorage>>,
    clients: Arc<RwLock<Clients>>,
    fetcher: Arc<dyn Fetcher>,
}

impl OfflineWorker {
    /// Create a worker for the given origin.
    pub fn new(origin: Url, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            origin,
            state: RwLock::new(WorkerState::Parsed),
            caches: Arc::new(RwLock::new(CacheStorage::new())),
            clients: Arc::new(RwLock::new(Clients::new())),
            fetcher,
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Shared cache storage handle.
    pub fn caches(&self) -> Arc<RwLock<CacheStorage>> {
        Arc::clone(&self.caches)
    }

    /// Shared client registry handle.
    pub fn clients(&self) -> Arc<RwLock<Clients>> {
        Arc::clone(&self.clients)
    }

    async fn transition(&self, next: WorkerState) -> Result<(), SwError> {
        let mut state = self.state.write().await;
        if !state.can_transition_to(next) {
            return Err(SwError::IllegalTransition { from: *state, to: next });
        }
        trace!(from = %*state, to = %next, "Lifecycle transition");
        *state = next;
        Ok(())
    }

    /// Handle the install event: pre-cache the asset manifest, then skip
    /// the waiting phase.
    ///
    /// A failure on any individual asset is logged and swallowed; install
    /// never fails as a whole.
    pub async fn install(&self) -> Result<(), SwError> {
        self.transition(WorkerState::Installing).await?;

        self.caches.write().await.open(CACHE_NAME);
        for path in ASSET_MANIFEST {
            let url = match self.origin.join(path) {
                Ok(url) => url,
                Err(err) => {
                    warn!(path, error = %err, "Asset path did not resolve, skipping");
                    continue;
                }
            };

            match self.fetcher.fetch(&FetchRequest::get(url.clone())).await {
                Ok(response) => {
                    let mut storage = self.caches.write().await;
                    if let Err(err) = storage.open(CACHE_NAME).put(&url, &response) {
                        warn!(url = %url, error = %err, "Asset pre-cache failed");
                    }
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "Asset pre-cache failed");
                }
            }
        }

        // skipWaiting: become installed immediately, without waiting for
        // existing pages to close.
        self.transition(WorkerState::Installed).await?;
        info!(cache = CACHE_NAME, "Offline worker installed");
        Ok(())
    }

    /// Handle the activate event: delete every cache namespace other than
    /// the current one, then claim all open pages.
    pub async fn activate(&self) -> Result<(), SwError> {
        self.transition(WorkerState::Activating).await?;

        {
            let mut storage = self.caches.write().await;
            for name in storage.keys() {
                if name != CACHE_NAME {
                    if storage.delete(&name) {
                        debug!(cache = %name, "Deleted stale cache namespace");
                    } else {
                        warn!(cache = %name, "Stale cache namespace disappeared before deletion");
                    }
                }
            }
        }

        self.clients.write().await.claim();

        self.transition(WorkerState::Activated).await?;
        info!(cache = CACHE_NAME, "Offline worker activated");
        Ok(())
    }

    /// Retire the worker when a newer one takes over.
    pub async fn retire(&self) -> Result<(), SwError> {
        self.transition(WorkerState::Redundant).await
    }

    /// Intercept a request.
    ///
    /// Non-GET requests and anything arriving before activation pass
    /// through untouched.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchOutcome {
        if !self.state().await.can_intercept_fetch() {
            trace!(url = %request.url, "Worker not active, bypassing");
            return FetchOutcome::Bypass;
        }

        match classify(&request.method, &request.url) {
            StrategyDecision::Bypass => FetchOutcome::Bypass,
            StrategyDecision::NetworkFirst => {
                FetchOutcome::Respond(self.network_first(request).await)
            }
            StrategyDecision::CacheFirst => {
                FetchOutcome::Respond(self.cache_first(request).await)
            }
        }
    }

    /// Network-first: live response wins; the cache is the offline fallback.
    async fn network_first(&self, request: &FetchRequest) -> FetchResponse {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.spawn_cache_write(request.url.clone(), response.clone());
                }
                // Non-ok responses pass through unmodified and uncached.
                response
            }
            Err(err) => {
                debug!(url = %request.url, error = %err, "Network failed, consulting cache");
                match self.cached_response(&request.url).await {
                    Some(response) => response,
                    None => fallback_response(),
                }
            }
        }
    }

    /// Cache-first: a hit answers immediately, with no network request.
    async fn cache_first(&self, request: &FetchRequest) -> FetchResponse {
        if let Some(response) = self.cached_response(&request.url).await {
            trace!(url = %request.url, "Cache hit");
            return response;
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.ok() {
                    self.spawn_cache_write(request.url.clone(), response.clone());
                }
                response
            }
            Err(err) => {
                debug!(url = %request.url, error = %err, "Network failed on cache miss");
                fallback_response()
            }
        }
    }

    async fn cached_response(&self, url: &Url) -> Option<FetchResponse> {
        let storage = self.caches.read().await;
        storage
            .cache(CACHE_NAME)
            .and_then(|cache| cache.match_request(url))
            .map(|entry| entry.to_response())
    }

    /// Store a response clone without blocking the response path.
    ///
    /// The write races the caller's response; its errors are logged here
    /// and never reach the caller.
    fn spawn_cache_write(&self, url: Url, response: FetchResponse) {
        let caches = Arc::clone(&self.caches);
        tokio::spawn(async move {
            let mut storage = caches.write().await;
            if let Err(err) = storage.open(CACHE_NAME).put(&url, &response) {
                warn!(url = %url, error = %err, "Background cache write failed");
            }
        });
    }
}
