use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::MemoryStore;

/// Load a store snapshot, or start fresh when the file does not exist yet.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MemoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No snapshot at {}, starting empty", path.display());
        return Ok(MemoryStore::new());
    }

    let json = fs::read_to_string(path).context("Failed to read snapshot file")?;
    let store = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot {:?}", path))?;

    info!("Loaded snapshot from {}", path.display());
    Ok(store)
}

/// Write the whole store back to disk as pretty JSON.
pub fn save<P: AsRef<Path>>(path: P, store: &MemoryStore) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
        }
    }

    let json = serde_json::to_string_pretty(store).context("Failed to serialize snapshot")?;
    fs::write(path, json).context("Failed to write snapshot file")?;

    info!("Saved snapshot to {}", path.display());
    Ok(())
}
