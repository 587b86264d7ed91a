//! File-backed offline store for the CLI.
//!
//! The file holds every saved view of both kinds as JSON. It is loaded into
//! a [`MemoryBackend`] before a command runs and written back after the
//! command succeeds, so views saved offline survive between runs. A missing
//! file is an empty store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use gridview_client::{MemoryBackend, SettingsBackend};
use gridview_core::snapshot::{ViewKind, ViewSnapshot};

#[derive(Debug, Default, Serialize, Deserialize)]
struct OfflineFile {
    #[serde(default)]
    columns: Vec<ViewSnapshot>,
    #[serde(default)]
    filters: Vec<ViewSnapshot>,
}

pub struct OfflineStore {
    path: PathBuf,
    backend: Arc<MemoryBackend>,
}

impl OfflineStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<OfflineFile>(&raw)
                .with_context(|| format!("{} is not a saved view store", path.display()))?
        } else {
            OfflineFile::default()
        };

        let backend = Arc::new(MemoryBackend::new());
        backend.seed(ViewKind::Columns, file.columns);
        backend.seed(ViewKind::Filters, file.filters);
        tracing::info!(path = %path.display(), "Using offline view store");

        Ok(Self {
            path: path.to_path_buf(),
            backend,
        })
    }

    pub fn backend(&self) -> Arc<dyn SettingsBackend> {
        self.backend.clone()
    }

    /// Write the current rows back to the file.
    pub fn persist(&self) -> anyhow::Result<()> {
        let file = OfflineFile {
            columns: self.backend.rows(ViewKind::Columns),
            filters: self.backend.rows(ViewKind::Filters),
        };
        let raw = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
