//! Installation state queries

use std::fs;

use crate::install::hooks::all_notify_hooks_present;
use crate::install::manifest::{read_manifest, read_uninstall_record};
use crate::install::{installation_info, InstallationManifest};
use crate::paths::ClaudePaths;

/// Check that every notification hook is registered in settings.json
pub fn check_notification_system(paths: &ClaudePaths) -> Result<bool, String> {
    let settings_path = paths.claude_settings();
    if !settings_path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&settings_path)
        .map_err(|e| format!("Failed to read settings.json: {}", e))?;
    let settings: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse settings.json: {}", e))?;

    Ok(all_notify_hooks_present(&settings))
}

pub fn get_installation_info(paths: &ClaudePaths) -> Result<InstallationManifest, String> {
    installation_info(paths)
}

/// The installation manifest as pretty JSON
pub fn export_installation_log(paths: &ClaudePaths) -> Result<String, String> {
    let manifest = installation_info(paths)?;
    serde_json::to_string_pretty(&manifest)
        .map_err(|e| format!("Failed to serialize manifest: {}", e))
}

/// Backup of the most recent install, or of the uninstall that followed it
pub fn get_backup_path(paths: &ClaudePaths) -> Result<String, String> {
    if let Ok(manifest) = read_manifest(paths) {
        return Ok(manifest.backup_path);
    }
    match read_uninstall_record(paths)? {
        Some(record) => Ok(record.backup_path),
        None => installation_info(paths).map(|m| m.backup_path),
    }
}
