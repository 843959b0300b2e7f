use std::sync::Arc;

use canvass_core::registry::OrganizationRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: canvass_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Organization registry, loaded once at startup.
    pub registry: Arc<OrganizationRegistry>,
}
