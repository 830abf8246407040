//! # Money SW
//!
//! Offline worker for the Money App client: fetch interception with two
//! selectable caching strategies and a graceful-degradation fallback.
//!
//! ## Architecture
//!
//! ```text
//! OfflineWorker
//!     ├── lifecycle: Parsed → Installing → Installed → Activating
//!     │              → Activated → (Redundant on update)
//!     ├── StrategyDecision = classify(method, url)
//!     │       ├── Bypass        non-GET, untouched
//!     │       ├── NetworkFirst  /api/ and auth-domain URLs
//!     │       └── CacheFirst    everything else
//!     └── CacheStorage
//!             └── Cache ("money-app-v1")
//!                     └── URL → response snapshot
//! ```
//!
//! Cache writes never block the response path: strategies spawn a detached
//! write whose failures are logged on their own channel. Concurrent
//! identical requests are not deduplicated; the store is last-write-wins.

use thiserror::Error;

pub mod cache;
pub mod lifecycle;
pub mod strategy;
pub mod worker;

pub use cache::{Cache, CacheEntry, CacheError, CacheStorage};
pub use lifecycle::{Client, Clients, WorkerState};
pub use strategy::{classify, fallback_response, StrategyDecision};
pub use worker::{FetchOutcome, OfflineWorker, ASSET_MANIFEST, CACHE_NAME};

/// Errors that can occur in offline worker operations.
#[derive(Error, Debug)]
pub enum SwError {
    #[error("Illegal lifecycle transition: {from} -> {to}")]
    IllegalTransition {
        from: lifecycle::WorkerState,
        to: lifecycle::WorkerState,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),
}
