//! StarLine dashboard: polls the vendor API in the background, caches the
//! latest device snapshot on disk and serves a small maintenance dashboard.
//!
//! Re-exports modules needed by the binaries and integration tests in `tests/`.

pub mod api;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod starline;
pub mod store;

use store::history::HistoryStore;
use store::services::ServiceStore;
use store::snapshot::SnapshotStore;

/// Shared application state passed to handlers.
///
/// Handlers only read the snapshot cache; the vendor session lives in the
/// refresher task, not here.
pub struct AppState {
    pub config: config::Config,
    pub snapshots: SnapshotStore,
    pub services: ServiceStore,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            snapshots: SnapshotStore::new(config.snapshot_path()),
            services: ServiceStore::new(config.services_path()),
            history: HistoryStore::new(config.history_path()),
            config,
        }
    }
}
