//! Request/response cache store.
//!
//! A [`CacheStorage`] holds named [`Cache`] namespaces; each namespace maps
//! request URLs to stored response snapshots. Exactly one namespace is
//! current at any time, all others are stale and deleted wholesale on
//! worker activation.

use bytes::Bytes;
use hashbrown::HashMap;
use http::{HeaderMap, StatusCode};
use money_net::FetchResponse;
use thiserror::Error;
use url::Url;

/// Errors from cache store operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Attempt to store a non-success response.
    #[error("Response not cacheable: status {0}")]
    NotCacheable(StatusCode),
}

/// A stored response snapshot.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Request URL the snapshot answers.
    pub url: String,
    /// Response status.
    pub status: StatusCode,
    /// Response status text.
    pub status_text: String,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl CacheEntry {
    /// Snapshot a response for storage.
    pub fn from_response(url: &Url, response: &FetchResponse) -> Self {
        Self {
            url: url.to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            body: response.body.clone(),
        }
    }

    /// Rehydrate the snapshot into a response.
    pub fn to_response(&self) -> FetchResponse {
        FetchResponse {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// One cache namespace.
///
/// Entries are immutable once written; a fresher successful response for
/// the same URL overwrites in place (last write wins).
#[derive(Debug, Default)]
pub struct Cache {
    /// Namespace name.
    pub name: String,
    entries: HashMap<String, CacheEntry>,
}

impl Cache {
    /// Create an empty namespace.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Look up the entry for a request URL.
    pub fn match_request(&self, url: &Url) -> Option<&CacheEntry> {
        self.entries.get(url.as_str())
    }

    /// Store a response snapshot. Only ok-status responses are accepted.
    pub fn put(&mut self, url: &Url, response: &FetchResponse) -> Result<(), CacheError> {
        if !response.ok() {
            return Err(CacheError::NotCacheable(response.status));
        }
        self.entries
            .insert(url.to_string(), CacheEntry::from_response(url, response));
        Ok(())
    }

    /// Delete the entry for a URL.
    pub fn delete(&mut self, url: &Url) -> bool {
        self.entries.remove(url.as_str()).is_some()
    }

    /// All stored request URLs.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the namespace is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The set of cache namespaces.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: HashMap<String, Cache>,
}

impl CacheStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a namespace, creating it if absent.
    pub fn open(&mut self, name: &str) -> &mut Cache {
        self.caches
            .entry(name.to_string())
            .or_insert_with(|| Cache::new(name))
    }

    /// Get an existing namespace without creating it.
    pub fn cache(&self, name: &str) -> Option<&Cache> {
        self.caches.get(name)
    }

    /// Check whether a namespace exists.
    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a namespace and all its entries.
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// All namespace names.
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }
}
