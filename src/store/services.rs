//! Service reminders (`services.yaml`).
//!
//! The file maps an arbitrary key to `{description, latest_action_km, range_km}`.
//! It is edited by hand, so unknown keys and ordering are preserved on write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_yaml::{Mapping, Value};

use super::write_atomic;
use crate::models::service::ServiceStatus;

#[derive(Debug, Clone)]
pub struct ServiceStore {
    path: PathBuf,
}

impl ServiceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_mapping(&self) -> anyhow::Result<Mapping> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        match serde_yaml::from_str::<Value>(&text)? {
            Value::Mapping(m) => Ok(m),
            _ => anyhow::bail!("services.yaml must contain a mapping"),
        }
    }

    /// Raw mapping; errors are logged and read as empty.
    fn load_mapping(&self) -> Mapping {
        match self.read_mapping() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("failed to load services.yaml: {:#}", e);
                Mapping::new()
            }
        }
    }

    /// Reminders with their remaining distance at `mileage`.
    /// Entries missing a field, with non-integer distances, or with distances
    /// too large to compute are skipped.
    pub fn list(&self, mileage: i64) -> Vec<ServiceStatus> {
        self.load_mapping()
            .values()
            .filter_map(|service| {
                let description = service.get("description").and_then(scalar_to_string)?;
                let latest = service.get("latest_action_km").and_then(Value::as_i64)?;
                let range = service.get("range_km").and_then(Value::as_i64)?;
                let status = ServiceStatus::compute(description, latest, range, mileage);
                if status.is_none() {
                    tracing::warn!("skipping service with out-of-range distances");
                }
                status
            })
            .collect()
    }

    /// Sets `latest_action_km` on every reminder named `description`.
    /// Returns whether the file was rewritten.
    pub fn record_action(&self, description: &str, mileage: i64) -> anyhow::Result<bool> {
        let mut data = self.load_mapping();
        let mut updated = false;

        for service in data.values_mut() {
            let matches = service
                .get("description")
                .and_then(scalar_to_string)
                .is_some_and(|d| d == description);
            if !matches {
                continue;
            }
            if let Some(entry) = service.as_mapping_mut() {
                entry.insert(
                    Value::String("latest_action_km".into()),
                    Value::Number(mileage.into()),
                );
                updated = true;
            }
        }

        if updated {
            let text = serde_yaml::to_string(&data).context("failed to serialize services.yaml")?;
            write_atomic(&self.path, text.as_bytes())?;
            tracing::info!("Service '{}' successfully updated", description);
        }
        Ok(updated)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
