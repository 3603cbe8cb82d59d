//! Background job: poll StarLine and overwrite the local snapshot cache.
//!
//! Runs once immediately and then every two minutes. The task owns the
//! session client, so at most one refresh is ever in flight; a tick that
//! comes due while a refresh is still running is skipped.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::starline::session::SessionClient;
use crate::store::snapshot::SnapshotStore;

pub const REFRESH_PERIOD: Duration = Duration::from_secs(120);

/// Spawn the refresher. Call this once at startup.
pub fn spawn(client: SessionClient, store: SnapshotStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut client = client;
        let mut interval = time::interval(REFRESH_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            run_cycle(&mut client, &store).await;
        }
    })
}

/// One fetch → write cycle. Failures are logged and leave the cache as it was.
pub async fn run_cycle(client: &mut SessionClient, store: &SnapshotStore) -> bool {
    tracing::debug!("Fetching data from StarLine API");

    let data = match client.fetch_device_data().await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("StarLine refresh failed: {}", e);
            return false;
        }
    };

    match store.write(&data) {
        Ok(()) => {
            tracing::debug!("snapshot refresh succeeded");
            true
        }
        Err(e) => {
            tracing::error!("failed to save StarLine snapshot: {:#}", e);
            false
        }
    }
}
