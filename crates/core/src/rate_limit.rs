//! Fixed-window request counting per principal.
//!
//! The counter state lives behind [`RateLimitStore`] so the in-process map
//! used by a single instance can be replaced by a shared store when the API
//! runs on several hosts. [`RateLimiter`] owns the policy (ceiling + window)
//! and is handed to the auth gate through application state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CoreError;

/// Result of counting one request against a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Requests counted in the current window, including this one.
    pub count: u32,
    /// Time left until the window resets.
    pub resets_in: Duration,
}

/// Storage for fixed-window counters keyed by principal.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key` at `now`, starting a fresh window when the
    /// previous one has elapsed.
    async fn hit(&self, key: &str, window: Duration, now: Instant) -> WindowCount;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Process-local counter store. State resets on restart.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop windows that have fully elapsed as of `now`. Returns how many
    /// entries were removed.
    pub async fn prune(&self, window: Duration, now: Instant) -> usize {
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, w| now.saturating_duration_since(w.started_at) < window);
        before - windows.len()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, window: Duration, now: Instant) -> WindowCount {
        let mut windows = self.windows.lock().await;
        let entry = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(entry.started_at);
        if elapsed >= window {
            entry.started_at = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        WindowCount {
            count: entry.count,
            resets_in: window.saturating_sub(now.saturating_duration_since(entry.started_at)),
        }
    }
}

/// Fixed-window rate limiting policy over an injected store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// `max_requests == 0` disables limiting.
    pub fn new(store: Arc<dyn RateLimitStore>, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    /// A limiter that never rejects.
    pub fn disabled() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()), 0, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_requests > 0 && !self.window.is_zero()
    }

    /// Count a request for `key`, failing with [`CoreError::RateLimited`] once
    /// the ceiling is exceeded within the current window.
    pub async fn check(&self, key: &str) -> Result<(), CoreError> {
        self.check_at(key, Instant::now()).await
    }

    pub async fn check_at(&self, key: &str, now: Instant) -> Result<(), CoreError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let counted = self.store.hit(key, self.window, now).await;
        if counted.count > self.max_requests {
            let retry_after_secs = counted.resets_in.as_secs_f64().ceil().max(1.0) as u64;
            tracing::warn!(key, count = counted.count, retry_after_secs, "Rate limit exceeded");
            return Err(CoreError::RateLimited { retry_after_secs });
        }
        Ok(())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}
