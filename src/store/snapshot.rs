use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

use super::write_atomic;
use crate::models::snapshot::DeviceSnapshot;

/// Local snapshot cache: the last successfully fetched device state, stored
/// as pretty-printed UTF-8 JSON and fully overwritten on each refresh.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, data: &Value) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(data).context("failed to serialize snapshot")?;
        write_atomic(&self.path, &body)?;
        tracing::debug!(path = %self.path.display(), "snapshot cache updated");
        Ok(())
    }

    /// Absent, unreadable, or malformed cache reads as an empty document.
    pub fn load(&self) -> DeviceSnapshot {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(_) => return DeviceSnapshot::default(),
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(v @ Value::Object(_)) => DeviceSnapshot::new(v),
            Ok(_) => DeviceSnapshot::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "snapshot cache is not valid JSON: {}", e);
                DeviceSnapshot::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::DeviceStatus;
    use serde_json::json;

    #[test]
    fn test_write_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("starline_data.json"));
        let data = json!({
            "codestring": "OK",
            "user_data": {"devices": [{"activity_ts": 1700000000, "obd": {"mileage": 12345}, "alias": "Машина"}]}
        });

        store.write(&data).unwrap();
        let snap = store.load();

        assert_eq!(snap.raw(), &data);
        assert_eq!(snap.status(), DeviceStatus::Online);
        assert_eq!(snap.mileage(), Some(12345));
        assert_eq!(snap.activity_ts(), Some(1700000000));

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("Машина"), "non-ASCII must be stored as UTF-8");
        assert!(text.contains("\n  "), "cache is pretty-printed");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), DeviceSnapshot::default());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starline_data.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(SnapshotStore::new(&path).load(), DeviceSnapshot::default());
    }
}
