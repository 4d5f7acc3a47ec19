use std::sync::Arc;

use guardpost_core::clock::Clock;
use guardpost_core::store::RecordStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (checkpoint and guard CRUD).
    pub pool: guardpost_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Authoritative patrol record store. All check-ins go through it.
    pub records: Arc<dyn RecordStore>,
    /// Resolves "today" when a date filter is omitted.
    pub clock: Arc<dyn Clock>,
}
