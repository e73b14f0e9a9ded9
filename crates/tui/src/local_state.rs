//! Snapshot persistence on the local file system.
//!
//! The file holds the raw JSON produced by the engine. Reading it back goes
//! through [`engine::Snapshot::from_json`], which tolerates stale or damaged
//! content, so this module only deals with bytes and paths.

use std::{
    fs,
    path::{Path, PathBuf},
};

use engine::{Calculator, Observer, SessionEvent, Snapshot};

use crate::error::Result;

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

    /// Raw snapshot text, or `None` on first start.
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn persist(&self, calculator: &Calculator) -> Result<()> {
        let payload = Snapshot::from(calculator).to_json()?;
        self.save(&payload)
    }
}

/// Writes a fresh snapshot after every accepted input.
impl Observer for SnapshotStore {
    fn notify(&mut self, event: &SessionEvent<'_>, calculator: &Calculator) {
        if !matches!(event, SessionEvent::Changed { .. }) {
            return;
        }
        if let Err(err) = self.persist(calculator) {
            tracing::warn!("failed to persist snapshot to {}: {err}", self.path.display());
        }
    }
}
