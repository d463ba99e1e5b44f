//! Hook installation

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use super::backup::{create_backup, Rollback};
use super::hooks::{foreign_hook_types, merge_hooks};
use super::manifest::{write_manifest, InstallationChanges, InstallationManifest, APP_VERSION};
use super::scripts::{notify_script, uninstall_script};
use crate::config::storage::write_document;
use crate::config::{EventKind, SettingsDocument};
use crate::paths::ClaudePaths;

/// Install the notification hooks.
///
/// Safe to run repeatedly: scripts are rewritten, our hook entries replaced
/// rather than duplicated, and an existing settings document left alone. If any
/// step fails, `settings.json` and every file this attempt created are
/// restored before the error is returned.
pub fn install_hooks(paths: &ClaudePaths, notifier_bin: &Path) -> Result<String, String> {
    let mut rollback = Rollback::default();
    match apply_install(paths, notifier_bin, &mut rollback) {
        Ok(message) => {
            log::info!("Installed notification hooks into {:?}", paths.root());
            Ok(message)
        }
        Err(err) => {
            log::warn!("Install failed, rolling back: {}", err);
            rollback.restore();
            Err(err)
        }
    }
}

fn apply_install(
    paths: &ClaudePaths,
    notifier_bin: &Path,
    rollback: &mut Rollback,
) -> Result<String, String> {
    let settings_file = paths.claude_settings();

    // 1. Read existing settings before touching anything
    let original = if settings_file.exists() {
        Some(
            fs::read_to_string(&settings_file)
                .map_err(|e| format!("Failed to read settings.json: {}", e))?,
        )
    } else {
        None
    };
    let mut settings: serde_json::Value = match &original {
        Some(content) if !content.trim().is_empty() => serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse settings.json: {}", e))?,
        _ => serde_json::json!({}),
    };
    if !settings.is_object() {
        return Err("Settings is not an object".to_string());
    }

    fs::create_dir_all(paths.root())
        .map_err(|e| format!("Failed to create Claude directory: {}", e))?;

    // 2. Back up settings.json
    let backup_path = create_backup(paths)?;

    // 3. The user is reinstalling; forget the earlier uninstall
    let uninstalled_marker = paths.uninstalled_marker();
    if uninstalled_marker.exists() {
        fs::remove_file(&uninstalled_marker)
            .map_err(|e| format!("Failed to remove uninstall marker: {}", e))?;
        rollback.removed_marker(uninstalled_marker);
    }

    // 4. Write hook scripts
    let scripts_dir = paths.scripts_dir();
    fs::create_dir_all(&scripts_dir)
        .map_err(|e| format!("Failed to create scripts directory: {}", e))?;

    let mut files_created = Vec::new();
    let scripts = [
        (paths.notify_script(), notify_script(paths.root(), notifier_bin)),
        (paths.uninstall_script(), uninstall_script(paths.root(), notifier_bin)),
    ];
    for (script_path, content) in scripts {
        write_executable(&script_path, &content, rollback)?;
        files_created.push(path_string(&script_path));
    }

    // 5. Register hooks, preserving everything that is not ours
    let old_hooks = settings.get("hooks").cloned().unwrap_or(serde_json::Value::Null);
    let existing_hooks_preserved = foreign_hook_types(&old_hooks);
    settings["hooks"] = merge_hooks(&old_hooks, paths)?;

    let settings_str = serde_json::to_string_pretty(&settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    rollback.settings_before(settings_file.clone(), original);
    fs::write(&settings_file, settings_str)
        .map_err(|e| format!("Failed to write settings.json: {}", e))?;

    // 6. Enable sounds
    let sounds_enabled = paths.sounds_enabled_marker();
    if !sounds_enabled.exists() {
        fs::write(&sounds_enabled, "").map_err(|e| format!("Failed to enable sounds: {}", e))?;
        rollback.created(sounds_enabled.clone());
    }
    files_created.push(path_string(&sounds_enabled));

    // 7. Seed the settings document on first install
    let config_file = paths.settings_document();
    if !config_file.exists() {
        write_document(&config_file, &SettingsDocument::default())
            .map_err(|e| format!("Failed to create default config: {}", e))?;
        rollback.created(config_file.clone());
        files_created.push(path_string(&config_file));
    }

    // 8. Record what changed
    let manifest = InstallationManifest {
        installed_at: chrono::Utc::now(),
        app_version: APP_VERSION.to_string(),
        backup_path: backup_path.as_deref().map(path_string).unwrap_or_default(),
        changes: InstallationChanges {
            files_created,
            hooks_added: EventKind::ALL.to_vec(),
            existing_hooks_preserved: existing_hooks_preserved.clone(),
        },
    };
    let manifest_existed = paths.manifest().exists();
    write_manifest(paths, &manifest)?;
    if !manifest_existed {
        rollback.created(paths.manifest());
    }

    let mut result_message =
        "Installation complete! Audio notifications are now active.".to_string();
    if !existing_hooks_preserved.is_empty() {
        result_message.push_str(&format!(
            "\n\nExisting hooks preserved: {}",
            existing_hooks_preserved.join(", ")
        ));
    }

    Ok(result_message)
}

fn write_executable(path: &Path, content: &str, rollback: &mut Rollback) -> Result<(), String> {
    let existed = path.exists();
    fs::write(path, content).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
    if !existed {
        rollback.created(path.to_path_buf());
    }

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)
            .map_err(|e| format!("Failed to get script metadata: {}", e))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)
            .map_err(|e| format!("Failed to set script permissions: {}", e))?;
    }
    Ok(())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
