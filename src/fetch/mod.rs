//! Cached multi-source JSON fetcher
//!
//! A fetch first consults the cache. A fresh entry is returned without any
//! network access. Otherwise the access routes are tried in order, one
//! outstanding attempt at a time, each bounded by the same per-attempt
//! timeout. The first route that yields a success status with a JSON body of
//! the expected shape wins: its payload is cached and returned. When every
//! route fails the caller gets a single [`FetchError::AllSourcesExhausted`].

mod routes;
mod transport;

use chrono::Utc;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, KeyValueStore};

pub use routes::{default_routes, AccessRoute, RouteKind};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};

/// Default freshness window for cached payloads
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single route attempt did not produce a payload
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The attempt exceeded the per-attempt timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body was not JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON lacked the expected field
    #[error("missing expected field {0}")]
    MissingShape(String),
}

/// One failed attempt, kept for the aggregate error
#[derive(Debug)]
pub struct FailedAttempt {
    pub route: String,
    pub error: AttemptError,
}

impl fmt::Display for FailedAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.route, self.error)
    }
}

/// Errors surfaced by [`Fetcher::fetch`]
#[derive(Debug, Error)]
pub enum FetchError {
    /// No access route produced a usable payload
    #[error("all sources exhausted for {target} ({} attempts)", attempts.len())]
    AllSourcesExhausted {
        target: String,
        attempts: Vec<FailedAttempt>,
    },
}

/// What a parsed payload must contain to count as a success
///
/// Pointers are RFC 6901 JSON pointers. A pointer that resolves to `null`
/// does not count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// This pointer must resolve
    Pointer(String),
    /// At least one of these pointers must resolve
    AnyOf(Vec<String>),
}

impl Shape {
    fn check(&self, payload: &Value) -> Result<(), AttemptError> {
        let resolves = |pointer: &str| payload.pointer(pointer).is_some_and(|v| !v.is_null());
        match self {
            Shape::Pointer(pointer) if !resolves(pointer) => {
                Err(AttemptError::MissingShape(pointer.clone()))
            }
            Shape::AnyOf(pointers) if !pointers.iter().any(|p| resolves(p)) => {
                Err(AttemptError::MissingShape(pointers.join(" | ")))
            }
            _ => Ok(()),
        }
    }
}

/// A resource to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// URL of the upstream resource
    pub target: String,
    /// Cache key, defaults to the target URL
    pub cache_key: Option<String>,
    /// Shape a valid payload has
    pub required: Option<Shape>,
}

impl FetchRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cache_key: None,
            required: None,
        }
    }

    pub fn cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    /// Rejects payloads where `pointer` does not resolve, e.g. `/chart/result/0/meta`
    pub fn require(mut self, pointer: impl Into<String>) -> Self {
        self.required = Some(Shape::Pointer(pointer.into()));
        self
    }

    /// Rejects payloads where none of `pointers` resolves
    pub fn require_any<I, S>(mut self, pointers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(Shape::AnyOf(pointers.into_iter().map(Into::into).collect()));
        self
    }

    /// Key the payload is cached under
    pub fn effective_key(&self) -> &str {
        self.cache_key.as_deref().unwrap_or(&self.target)
    }

    fn check_shape(&self, payload: &Value) -> Result<(), AttemptError> {
        match &self.required {
            Some(shape) => shape.check(payload),
            None => Ok(()),
        }
    }
}

/// Fetches JSON through a cache and an ordered list of access routes
///
/// Cheap to clone; clones share the transport and the cache.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    store: Arc<dyn KeyValueStore>,
    routes: Vec<AccessRoute>,
    freshness: Duration,
    timeout: Duration,
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("routes", &self.routes)
            .field("freshness", &self.freshness)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Creates a fetcher with the default routes, freshness window and timeout
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            transport,
            store,
            routes: default_routes(),
            freshness: DEFAULT_FRESHNESS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_routes(mut self, routes: Vec<AccessRoute>) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn routes(&self) -> &[AccessRoute] {
        &self.routes
    }

    /// Shortcut for [`Fetcher::fetch`] on a bare URL
    pub async fn fetch_url(&self, target: &str) -> Result<Value, FetchError> {
        self.fetch(&FetchRequest::new(target)).await
    }

    /// Returns the payload for `request`, from cache when fresh, else from the first working route
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Value, FetchError> {
        let key = request.effective_key();

        if let Some(payload) = self.cached(key) {
            debug!(key, "cache hit");
            return Ok(payload);
        }

        let mut attempts = Vec::new();

        for route in &self.routes {
            let url = route.rewrite(&request.target);
            debug!(route = %route.name, %url, "fetching");

            match self.attempt(&url, request).await {
                Ok(payload) => {
                    if let Err(e) = self.store.set(key, &CacheEntry::now(payload.clone())) {
                        warn!(key, error = %e, "failed to write cache entry");
                    }
                    return Ok(payload);
                }
                Err(error) => {
                    warn!(route = %route.name, target = %request.target, %error, "route failed");
                    attempts.push(FailedAttempt {
                        route: route.name.clone(),
                        error,
                    });
                }
            }
        }

        Err(FetchError::AllSourcesExhausted {
            target: request.target.clone(),
            attempts,
        })
    }

    /// Removes every cached payload
    pub fn clear_cache(&self) -> Result<(), crate::cache::CacheError> {
        self.store.clear()
    }

    fn cached(&self, key: &str) -> Option<Value> {
        let window = chrono::Duration::from_std(self.freshness).ok()?;
        let entry = self.store.get(key)?;
        entry.is_fresh(Utc::now(), window).then_some(entry.payload)
    }

    async fn attempt(&self, url: &str, request: &FetchRequest) -> Result<Value, AttemptError> {
        let response = tokio::time::timeout(self.timeout, self.transport.get(url, self.timeout))
            .await
            .map_err(|_| AttemptError::Timeout(self.timeout))??;

        if !response.is_success() {
            return Err(AttemptError::Status(response.status));
        }

        let payload: Value = serde_json::from_str(&response.body)?;
        request.check_shape(&payload)?;
        Ok(payload)
    }
}
