//! Hook uninstallation

use std::fs;

use super::backup::create_backup;
use super::hooks::strip_notify_hooks;
use super::manifest::{read_manifest, write_uninstall_record, UninstallRecord};
use super::markers::set_uninstalled;
use crate::paths::ClaudePaths;

/// Uninstall the notification hooks.
///
/// Backs up `settings.json` before changing it, removes only our hook entries
/// and files, leaves `audio-notifier.yaml` untouched, and writes the
/// `.uninstalled` marker so startup does not reinstall.
pub fn uninstall_hooks(paths: &ClaudePaths) -> Result<String, String> {
    // 1. Read manifest to know what was installed
    let manifest = read_manifest(paths)?;

    // 2. Back up before mutating anything
    let backup_path = create_backup(paths)?;
    let backup_display = backup_path
        .as_deref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    // 3. Remove our hook entries from settings.json
    let settings_file = paths.claude_settings();
    let mut hooks_removed = 0;
    if settings_file.exists() {
        let contents = fs::read_to_string(&settings_file)
            .map_err(|e| format!("Failed to read settings.json: {}", e))?;
        let mut settings: serde_json::Value = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse settings.json: {}", e))?;

        hooks_removed = strip_notify_hooks(&mut settings);

        let settings_str = serde_json::to_string_pretty(&settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&settings_file, settings_str)
            .map_err(|e| format!("Failed to write settings.json: {}", e))?;
    }

    // 4. Delete installed files
    let mut files_deleted = 0;
    for path in [
        paths.notify_script(),
        paths.uninstall_script(),
        paths.sounds_enabled_marker(),
    ] {
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to remove {:?}: {}", path, e))?;
            files_deleted += 1;
        }
    }

    let global_voices_dir = paths.global_voices_dir();
    if global_voices_dir.exists() {
        files_deleted += fs::read_dir(&global_voices_dir)
            .map(|entries| entries.flatten().count())
            .unwrap_or(0);
        fs::remove_dir_all(&global_voices_dir)
            .map_err(|e| format!("Failed to remove global voices: {}", e))?;
    }

    // 5. Remember the user's choice
    set_uninstalled(paths, true)?;

    // 6. Keep the manifest queryable, then retire it
    write_uninstall_record(
        paths,
        &UninstallRecord {
            uninstalled_at: chrono::Utc::now(),
            backup_path: backup_display.clone(),
            hooks_removed,
            files_deleted,
            manifest: manifest.clone(),
        },
    )?;
    fs::remove_file(paths.manifest()).map_err(|e| format!("Failed to remove manifest: {}", e))?;

    log::info!(
        "Uninstalled notification hooks: {} hooks, {} files",
        hooks_removed,
        files_deleted
    );

    let backup_line = if backup_display.is_empty() {
        "No settings.json found, no backup needed".to_string()
    } else {
        format!("Backup created at: {}", backup_display)
    };
    let mut result = format!(
        "Uninstallation complete!\n\nRemoved {} hooks and deleted {} files.\n{}\nConfig preserved at: {}",
        hooks_removed,
        files_deleted,
        backup_line,
        paths.settings_document().to_string_lossy()
    );

    if !manifest.changes.existing_hooks_preserved.is_empty() {
        result.push_str(&format!(
            "\n\nYour existing hooks were preserved: {}",
            manifest.changes.existing_hooks_preserved.join(", ")
        ));
    }

    Ok(result)
}
