//! Best-effort dump of the node list sent with each request

use crate::core::error::Result;
use crate::graph::flatten::FlatSnapshot;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `{ "Nodes": [...] }` to a fixed path for offline inspection
#[derive(Debug, Clone)]
pub struct DiagnosticsWriter {
    path: PathBuf,
}

impl DiagnosticsWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, snapshot: &FlatSnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = snapshot.to_pretty_json()?;
        fs::write(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "Serialized navigation map:\n{}", json);
        Ok(())
    }

    /// Write, logging instead of failing
    pub fn write_best_effort(&self, snapshot: &FlatSnapshot) {
        if let Err(e) = self.write(snapshot) {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not write navigation map");
        }
    }
}
