use std::path::{Path, PathBuf};

use anyhow::Context;

use super::write_atomic;
use crate::models::history::HistoryEntry;

/// Append-only service log (`services_history.yaml`), a YAML list.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Option<Vec<HistoryEntry>> =
            serde_yaml::from_str(&text).context("services_history.yaml is malformed")?;
        Ok(entries.unwrap_or_default())
    }

    /// All entries in insertion order; an unreadable log shows as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        self.read().unwrap_or_else(|e| {
            tracing::error!("failed to load service history: {:#}", e);
            Vec::new()
        })
    }

    /// Appends an entry. Refuses to overwrite a log it cannot parse.
    pub fn append(&self, entry: HistoryEntry) -> anyhow::Result<()> {
        let mut entries = self.read()?;
        entries.push(entry);
        let text = serde_yaml::to_string(&entries).context("failed to serialize history")?;
        write_atomic(&self.path, text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(service: &str, mileage: i64) -> HistoryEntry {
        HistoryEntry {
            date: "01.02.2024".into(),
            mileage,
            service: service.into(),
            description: "dealer".into(),
            cost: 4_200,
        }
    }

    #[test]
    fn test_append_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("services_history.yaml"));
        assert!(store.load().is_empty());

        store.append(entry("Oil change", 10_000)).unwrap();
        store.append(entry("Замена фильтра", 12_000)).unwrap();

        let entries = store.load();
        assert_eq!(entries, vec![entry("Oil change", 10_000), entry("Замена фильтра", 12_000)]);
    }

    #[test]
    fn test_empty_file_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services_history.yaml");
        std::fs::write(&path, "").unwrap();
        assert!(HistoryStore::new(&path).load().is_empty());
    }

    #[test]
    fn test_append_refuses_to_clobber_corrupt_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services_history.yaml");
        std::fs::write(&path, "foo: [unclosed").unwrap();
        let store = HistoryStore::new(&path);
        assert!(store.append(entry("Oil change", 1)).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "foo: [unclosed");
    }
}
