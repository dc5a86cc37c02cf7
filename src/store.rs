//! Durable storage for the preference model.
//!
//! The model lives in one JSON file. Loading never fails: a missing or broken
//! file yields the default model. Saving rewrites the whole document through a
//! temporary file in the same directory, so a crash mid-write leaves the old
//! document intact.

use crate::model::PreferenceModel;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Handle to the preferences document on disk.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the model, falling back to the default shape on any failure.
    #[must_use]
    pub fn load(&self) -> PreferenceModel {
        if !self.path.exists() {
            log::info!("No preferences at {}, starting fresh", self.path.display());
            return PreferenceModel::default();
        }

        match self.read() {
            Ok(model) => {
                log::info!(
                    "Loaded preferences from {} ({} tracks, {} plays)",
                    self.path.display(),
                    model.track_stats.len(),
                    model.total_plays
                );
                model
            }
            Err(err) => {
                log::warn!("Ignoring unreadable preferences: {err:#}");
                PreferenceModel::default()
            }
        }
    }

    fn read(&self) -> Result<PreferenceModel> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences file {}", self.path.display()))?;
        let model: PreferenceModel = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed preferences document {}", self.path.display()))?;
        Ok(model.migrate())
    }

    /// Replace the stored document with `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the document cannot
    /// be serialized, or the temporary file cannot be written or moved into place.
    pub fn save(&self, model: &PreferenceModel) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create preferences directory {}", dir.display()))?;

        let json = serde_json::to_string_pretty(model).context("Failed to serialize preferences")?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write preferences to temporary file")?;
        tmp.as_file().sync_all().context("Failed to flush preferences")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace preferences file {}", self.path.display()))?;

        log::trace!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}
