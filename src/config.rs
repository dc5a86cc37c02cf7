//! # Configuration Module
//!
//! Locates the preferences document. Musify keeps it in the platform-standard
//! data directory:
//! - Linux: `~/.local/share/musify/`
//! - macOS: `~/Library/Application Support/musify/`
//! - Windows: `%APPDATA%\musify\`
//!
//! The location can be overridden with `--preferences` or the
//! `MUSIFY_PREFERENCES` environment variable.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// File name of the preferences document inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Returns the platform-appropriate data directory for Musify, creating it
/// if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The musify subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let musify_dir = data_dir.join("musify");
    fs::create_dir_all(&musify_dir)
        .with_context(|| format!(
            "Failed to create Musify data directory at {}. Please check file permissions.",
            musify_dir.display()
        ))?;

    Ok(musify_dir)
}

/// Returns the platform-appropriate preferences file path.
///
/// # Examples
///
/// ```no_run
/// use musify::config::get_preferences_path;
///
/// let path = get_preferences_path()?;
/// println!("Preferences location: {}", path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Same as [`get_data_dir`].
pub fn get_preferences_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(PREFERENCES_FILE))
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the preferences document
    pub preferences_path: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            preferences_path: get_preferences_path().unwrap_or_else(|_| PathBuf::from(PREFERENCES_FILE)),
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime configuration at the default location.
    ///
    /// # Errors
    ///
    /// Fails when the data directory cannot be resolved or created.
    pub fn new() -> Result<Self> {
        Ok(Self {
            preferences_path: get_preferences_path()?,
        })
    }

    /// Create configuration with an explicit preferences path
    pub fn with_preferences_path(preferences_path: PathBuf) -> Self {
        Self { preferences_path }
    }

    /// Use `overridden` when given, the default location otherwise.
    ///
    /// # Errors
    ///
    /// Fails only when falling back to the default location fails.
    pub fn resolve(overridden: Option<PathBuf>) -> Result<Self> {
        match overridden {
            Some(path) => Ok(Self::with_preferences_path(path)),
            None => Self::new(),
        }
    }
}
