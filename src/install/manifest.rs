//! Installation manifest: what an install changed, for safe uninstall and audit

use std::fs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EventKind;
use crate::paths::ClaudePaths;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationChanges {
    pub files_created: Vec<String>,
    pub hooks_added: Vec<EventKind>,
    pub existing_hooks_preserved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationManifest {
    pub installed_at: DateTime<Utc>,
    pub app_version: String,
    /// Copy of `settings.json` taken before install; empty when there was none.
    pub backup_path: String,
    pub changes: InstallationChanges,
}

/// Kept after uninstall so the last installation stays queryable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallRecord {
    pub uninstalled_at: DateTime<Utc>,
    pub backup_path: String,
    pub hooks_removed: usize,
    pub files_deleted: usize,
    pub manifest: InstallationManifest,
}

pub fn write_manifest(paths: &ClaudePaths, manifest: &InstallationManifest) -> Result<(), String> {
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| format!("Failed to serialize manifest: {}", e))?;
    fs::write(paths.manifest(), json).map_err(|e| format!("Failed to write manifest: {}", e))
}

/// Manifest of the current installation.
pub fn read_manifest(paths: &ClaudePaths) -> Result<InstallationManifest, String> {
    let manifest_path = paths.manifest();
    if !manifest_path.exists() {
        return Err(
            "Installation manifest not found. The application may not be installed.".to_string(),
        );
    }

    let contents = fs::read_to_string(&manifest_path)
        .map_err(|e| format!("Failed to read installation manifest: {}", e))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse installation manifest: {}", e))
}

pub fn write_uninstall_record(paths: &ClaudePaths, record: &UninstallRecord) -> Result<(), String> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| format!("Failed to serialize uninstall record: {}", e))?;
    fs::write(paths.last_uninstall(), json)
        .map_err(|e| format!("Failed to write uninstall record: {}", e))
}

pub fn read_uninstall_record(paths: &ClaudePaths) -> Result<Option<UninstallRecord>, String> {
    let record_path = paths.last_uninstall();
    if !record_path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&record_path)
        .map_err(|e| format!("Failed to read uninstall record: {}", e))?;
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| format!("Failed to parse uninstall record: {}", e))
}

/// Current manifest, or the one preserved by the most recent uninstall.
pub fn installation_info(paths: &ClaudePaths) -> Result<InstallationManifest, String> {
    match read_manifest(paths) {
        Ok(manifest) => Ok(manifest),
        Err(err) => match read_uninstall_record(paths)? {
            Some(record) => Ok(record.manifest),
            None => Err(err),
        },
    }
}
