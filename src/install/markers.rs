//! Sentinel files: `.sounds-enabled` (hooks active) and `.uninstalled` (user removed them)

use std::fs;

use crate::paths::ClaudePaths;

pub fn sounds_enabled(paths: &ClaudePaths) -> bool {
    paths.sounds_enabled_marker().exists()
}

pub fn set_sounds_enabled(paths: &ClaudePaths, enabled: bool) -> Result<(), String> {
    let path = paths.sounds_enabled_marker();

    if enabled {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to enable sounds: {}", e))?;
        }
        fs::write(&path, "").map_err(|e| format!("Failed to enable sounds: {}", e))?;
    } else if path.exists() {
        fs::remove_file(&path).map_err(|e| format!("Failed to disable sounds: {}", e))?;
    }

    log::info!("Sounds {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub fn was_uninstalled(paths: &ClaudePaths) -> bool {
    paths.uninstalled_marker().exists()
}

pub fn set_uninstalled(paths: &ClaudePaths, uninstalled: bool) -> Result<(), String> {
    let path = paths.uninstalled_marker();
    if uninstalled {
        fs::write(&path, "").map_err(|e| format!("Failed to create uninstall marker: {}", e))
    } else if path.exists() {
        fs::remove_file(&path).map_err(|e| format!("Failed to remove uninstall marker: {}", e))
    } else {
        Ok(())
    }
}
