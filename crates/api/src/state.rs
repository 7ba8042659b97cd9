use std::sync::Arc;

use folio_core::rate_limit::RateLimiter;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: folio_db::DbPool,
    /// Server configuration (JWT secret, limits, CORS).
    pub config: Arc<ServerConfig>,
    /// Per-principal request limiter consulted by the auth gate.
    pub rate_limiter: RateLimiter,
    /// Media provider, absent when no credentials are configured.
    pub media: Option<Arc<dyn MediaStore>>,
}
