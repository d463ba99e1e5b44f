//! Notification hook installation commands

use std::fs;

use crate::install::hooks::strip_notify_hooks;
use crate::install::{install_hooks as install_into, HookInstaller};
use crate::paths::ClaudePaths;

/// Install the notification hooks, pointing them at this binary
pub fn install_hooks(paths: &ClaudePaths) -> Result<String, String> {
    let installer = HookInstaller::for_current_exe(paths.clone())?;
    install_into(installer.paths(), installer.notifier_bin())
}

/// Put the Claude directory back into a never-installed state (development aid)
pub fn dev_reset_install(paths: &ClaudePaths) -> Result<(), String> {
    // 1. Markers, settings document and manifests
    let files = [
        paths.sounds_enabled_marker(),
        paths.uninstalled_marker(),
        paths.settings_document(),
        paths.manifest(),
        paths.notify_script(),
        paths.uninstall_script(),
    ];
    for file in files {
        if file.exists() {
            fs::remove_file(&file)
                .map_err(|e| format!("Failed to remove {}: {}", file.display(), e))?;
        }
    }

    // 2. Global voice files
    let global_voices = paths.global_voices_dir();
    if global_voices.exists() {
        fs::remove_dir_all(&global_voices)
            .map_err(|e| format!("Failed to remove global voices: {}", e))?;
    }

    // 3. Hooks in settings.json
    let settings_file = paths.claude_settings();
    if settings_file.exists() {
        let contents = fs::read_to_string(&settings_file)
            .map_err(|e| format!("Failed to read settings.json: {}", e))?;

        if let Ok(mut settings) = serde_json::from_str::<serde_json::Value>(&contents) {
            let removed = strip_notify_hooks(&mut settings);
            let emptied = settings
                .get("hooks")
                .and_then(|h| h.as_object())
                .is_some_and(|h| h.is_empty());
            if emptied {
                if let Some(obj) = settings.as_object_mut() {
                    obj.remove("hooks");
                }
            }
            if removed > 0 || emptied {
                let settings_str = serde_json::to_string_pretty(&settings)
                    .map_err(|e| format!("Failed to serialize settings: {}", e))?;
                fs::write(&settings_file, settings_str)
                    .map_err(|e| format!("Failed to write settings.json: {}", e))?;
            }
        }
    }

    log::info!("Development reset of {:?}", paths.root());
    Ok(())
}
