// ── Persisted driver store ──
//
// Last reported driver value per node, kept across restarts so a reloaded
// tag manager can restore its settings. Stored as pretty JSON:
// `{ "nodes": { "<address>": { "ST": 1, "GV1": 0 } } }`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::NodeAddress;
use crate::driver::{Driver, DriverDef};
use crate::error::CoreError;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    nodes: BTreeMap<NodeAddress, BTreeMap<Driver, i64>>,
}

/// Driver values of every node known to the node server.
#[derive(Debug, Default)]
pub struct DriverStore {
    data: StoreFile,
    path: Option<PathBuf>,
}

impl DriverStore {
    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store at `path`. A missing file yields an empty store
    /// that will be created on the first [`save`](Self::save).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();

        let data = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| persistence(&path, &e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no driver state yet");
                StoreFile::default()
            }
            Err(e) => return Err(persistence(&path, &e)),
        };

        Ok(Self {
            data,
            path: Some(path),
        })
    }

    /// Write the store back to its file. No-op for in-memory stores.
    pub fn save(&self) -> Result<(), CoreError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| persistence(path, &e))?;
        }
        let text = serde_json::to_string_pretty(&self.data).map_err(|e| persistence(path, &e))?;

        // Replace the file in one step so an interrupted save leaves the
        // previous state readable.
        let tmp = temp_path(path);
        std::fs::write(&tmp, text).map_err(|e| persistence(&tmp, &e))?;
        std::fs::rename(&tmp, path).map_err(|e| persistence(path, &e))?;

        debug!(path = %path.display(), nodes = self.data.nodes.len(), "driver state saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether `address` has ever been registered.
    pub fn contains(&self, address: &NodeAddress) -> bool {
        self.data.nodes.contains_key(address)
    }

    /// Register `address` with the declared defaults, keeping any values
    /// already stored.
    pub fn register(&mut self, address: &NodeAddress, defs: &[DriverDef]) {
        let values = self.data.nodes.entry(address.clone()).or_default();
        for def in defs {
            values.entry(def.driver).or_insert(def.default);
        }
    }

    pub fn get(&self, address: &NodeAddress, driver: Driver) -> Option<i64> {
        self.data.nodes.get(address)?.get(&driver).copied()
    }

    pub fn set(&mut self, address: &NodeAddress, driver: Driver, value: i64) {
        self.data
            .nodes
            .entry(address.clone())
            .or_default()
            .insert(driver, value);
    }

    /// All stored values of `address`, in driver order.
    pub fn values(&self, address: &NodeAddress) -> Vec<(Driver, i64)> {
        self.data
            .nodes
            .get(address)
            .map(|values| values.iter().map(|(d, v)| (*d, *v)).collect())
            .unwrap_or_default()
    }
}

/// Sibling of `path` that `save` writes before renaming into place.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "state".into(), |n| n.to_string_lossy().into_owned());
    path.with_file_name(format!(".{name}.tmp"))
}

fn persistence(path: &Path, err: &dyn std::fmt::Display) -> CoreError {
    CoreError::Persistence {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
