//! Backups of `settings.json` and rollback of a failed install

use std::fs;
use std::path::PathBuf;

use crate::paths::ClaudePaths;

/// Copy `settings.json` into the backups directory.
///
/// Returns `None` when there is no settings file to back up.
pub fn create_backup(paths: &ClaudePaths) -> Result<Option<PathBuf>, String> {
    let settings_file = paths.claude_settings();
    if !settings_file.exists() {
        return Ok(None);
    }

    let backup_dir = paths.backups_dir();
    fs::create_dir_all(&backup_dir)
        .map_err(|e| format!("Failed to create backup directory: {}", e))?;

    let timestamp = chrono::Utc::now().timestamp();
    let mut backup_path = backup_dir.join(format!("settings-pre-audio-notifier-{}.json", timestamp));
    // Two operations within the same second must not overwrite each other's backup.
    let mut suffix = 1;
    while backup_path.exists() {
        backup_path = backup_dir.join(format!(
            "settings-pre-audio-notifier-{}-{}.json",
            timestamp, suffix
        ));
        suffix += 1;
    }

    fs::copy(&settings_file, &backup_path)
        .map_err(|e| format!("Failed to create backup: {}", e))?;

    log::info!("Backed up settings.json to {:?}", backup_path);
    Ok(Some(backup_path))
}

/// Undo log for an install attempt. Restores in reverse order of recording.
#[derive(Debug, Default)]
pub struct Rollback {
    created_files: Vec<PathBuf>,
    /// Original `settings.json` content; `Some(None)` when it did not exist.
    settings: Option<(PathBuf, Option<String>)>,
    removed_markers: Vec<PathBuf>,
}

impl Rollback {
    /// Remember a file that only exists because of this attempt.
    pub fn created(&mut self, path: PathBuf) {
        self.created_files.push(path);
    }

    pub fn settings_before(&mut self, path: PathBuf, content: Option<String>) {
        if self.settings.is_none() {
            self.settings = Some((path, content));
        }
    }

    pub fn removed_marker(&mut self, path: PathBuf) {
        self.removed_markers.push(path);
    }

    /// Best effort: every step is attempted, failures are logged.
    pub fn restore(self) {
        for path in self.created_files.iter().rev() {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    log::warn!("Rollback could not remove {:?}: {}", path, e);
                }
            }
        }

        if let Some((path, content)) = self.settings {
            let result = match content {
                Some(content) => fs::write(&path, content),
                None if path.exists() => fs::remove_file(&path),
                None => Ok(()),
            };
            if let Err(e) = result {
                log::warn!("Rollback could not restore {:?}: {}", path, e);
            }
        }

        for path in self.removed_markers {
            if let Err(e) = fs::write(&path, "") {
                log::warn!("Rollback could not recreate {:?}: {}", path, e);
            }
        }
    }
}
