//! # Configuration Module
//!
//! This module handles configuration management and data directory setup for
//! Attune. It provides platform-appropriate storage locations for the track
//! catalog, downloaded assets, and session snapshots.
//!
//! ## Data Storage
//!
//! Attune keeps its files in the platform-standard data directory:
//! - Linux: `~/.local/share/attune/`
//! - macOS: `~/Library/Application Support/attune/`
//! - Windows: `%APPDATA%\attune\`
//!
//! Inside that directory live `catalog.json` (the track catalog), `assets/`
//! (local audio files named `<asset_id>.mp3`), and `snapshots/` (saved
//! sessions).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Returns the platform-appropriate data directory for Attune.
///
/// The `attune` subdirectory is created if it doesn't exist.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The attune subdirectory cannot be created due to permissions
/// - The filesystem is read-only
pub fn get_data_dir() -> Result<PathBuf> {
    // Get platform-appropriate data directory
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    // Create attune subdirectory
    let attune_dir = data_dir.join("attune");
    fs::create_dir_all(&attune_dir)
        .with_context(|| format!(
            "Failed to create Attune data directory at {}. Please check file permissions.",
            attune_dir.display()
        ))?;

    Ok(attune_dir)
}

/// Returns the path where the track catalog is expected.
///
/// # Errors
///
/// Propagates the errors of [`get_data_dir`].
pub fn get_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.json"))
}

/// Returns the directory holding saved session snapshots, creating it on
/// first use.
pub fn get_snapshot_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?.join("snapshots");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create snapshot directory at {}", dir.display()))?;
    Ok(dir)
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the track catalog file
    pub catalog_path: PathBuf,
    /// Prefix prepended to asset ids when resolving playable URLs.
    /// Defaults to the local `assets/` directory under the data dir so
    /// resolved URLs are ordinary file paths.
    pub asset_base_url: String,
    /// Directory holding saved session snapshots
    pub snapshot_dir: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let data_dir = get_data_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            catalog_path: data_dir.join("catalog.json"),
            asset_base_url: format!("{}/assets/", data_dir.display()),
            snapshot_dir: data_dir.join("snapshots"),
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime configuration rooted at the standard data dir
    pub fn new() -> Result<Self> {
        let data_dir = get_data_dir()?;
        Ok(Self {
            catalog_path: data_dir.join("catalog.json"),
            asset_base_url: format!("{}/assets/", data_dir.display()),
            snapshot_dir: get_snapshot_dir()?,
        })
    }

    /// Create configuration with an explicit catalog path
    pub fn with_catalog_path(mut self, catalog_path: PathBuf) -> Self {
        self.catalog_path = catalog_path;
        self
    }

    /// Create configuration with an explicit asset base URL
    pub fn with_asset_base_url(mut self, asset_base_url: String) -> Self {
        self.asset_base_url = asset_base_url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_returns_valid_path() {
        let result = get_data_dir();
        assert!(result.is_ok());

        let path = result.unwrap();
        assert!(path.is_absolute(), "Data directory should be absolute");
        assert_eq!(path.file_name().unwrap(), "attune");
    }

    #[test]
    fn test_get_data_dir_creates_directory() {
        let path = get_data_dir().expect("Should get valid path");
        assert!(path.exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_get_catalog_path_consistent_results() {
        // Multiple calls should return the same path
        let path1 = get_catalog_path().expect("First call should succeed");
        let path2 = get_catalog_path().expect("Second call should succeed");

        assert_eq!(path1, path2);
        assert!(path1.to_string_lossy().ends_with("catalog.json"));
    }

    #[test]
    fn test_runtime_config_builders() {
        let config = RuntimeConfig::default()
            .with_catalog_path(PathBuf::from("/tmp/tracks.json"))
            .with_asset_base_url("/tmp/assets/".to_string());

        assert_eq!(config.catalog_path, PathBuf::from("/tmp/tracks.json"));
        assert_eq!(config.asset_base_url, "/tmp/assets/");
    }

    #[test]
    fn test_default_asset_base_points_at_data_dir() {
        let config = RuntimeConfig::default();
        assert!(config.asset_base_url.ends_with("/assets/"));
    }
}
