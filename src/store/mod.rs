//! Flat-file stores under the data directory.
//!
//! All writes go through [`write_atomic`]: a temp file in the same directory
//! is persisted over the target, so readers see either the old or the new
//! document, never a partial one.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use tempfile::NamedTempFile;

pub mod history;
pub mod services;
pub mod snapshot;

pub fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let mut temp = NamedTempFile::new_in(parent).context("failed to create temp file")?;
    temp.write_all(contents).context("failed to write temp file")?;
    temp.flush().context("failed to flush temp file")?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}
