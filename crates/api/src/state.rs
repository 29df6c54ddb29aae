use std::sync::Arc;

use releasetracker_core::directory::ReleaseDirectory;
use releasetracker_db::PgReleaseStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: releasetracker_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Release directory backed by the same pool.
    pub directory: ReleaseDirectory<PgReleaseStore>,
}

impl AppState {
    pub fn new(pool: releasetracker_db::DbPool, config: ServerConfig) -> Self {
        let directory = ReleaseDirectory::new(PgReleaseStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            directory,
        }
    }
}
