//! Sound switch and custom sound commands

use std::fs;
use std::path::Path;

use crate::install::markers;
use crate::paths::ClaudePaths;

const SOUND_EXTENSIONS: [&str; 3] = ["aiff", "wav", "mp3"];

pub fn get_sounds_enabled(paths: &ClaudePaths) -> Result<bool, String> {
    Ok(markers::sounds_enabled(paths))
}

pub fn set_sounds_enabled(paths: &ClaudePaths, enabled: bool) -> Result<(), String> {
    markers::set_sounds_enabled(paths, enabled)
}

/// Flip the sound switch and return the new state
pub fn toggle_sounds(paths: &ClaudePaths) -> Result<bool, String> {
    let enabled = !markers::sounds_enabled(paths);
    markers::set_sounds_enabled(paths, enabled)?;
    Ok(enabled)
}

pub fn was_uninstalled(paths: &ClaudePaths) -> Result<bool, String> {
    Ok(markers::was_uninstalled(paths))
}

/// Copy a sound file into the custom sounds directory and return its new path
pub fn upload_sound(paths: &ClaudePaths, source_path: &Path) -> Result<String, String> {
    let file_name = source_path
        .file_name()
        .ok_or("Invalid source path".to_string())?;
    if !is_sound_file(source_path) {
        return Err(format!(
            "Unsupported sound format: {} (expected .aiff, .wav or .mp3)",
            source_path.display()
        ));
    }

    let sounds_dir = paths.custom_sounds_dir();
    fs::create_dir_all(&sounds_dir)
        .map_err(|e| format!("Failed to create sounds directory: {}", e))?;

    let dest_path = sounds_dir.join(file_name);
    fs::copy(source_path, &dest_path).map_err(|e| format!("Failed to copy sound file: {}", e))?;

    dest_path
        .to_str()
        .ok_or("Invalid destination path".to_string())
        .map(|s| s.to_string())
}

pub fn list_custom_sounds(paths: &ClaudePaths) -> Result<Vec<String>, String> {
    let sounds_dir = paths.custom_sounds_dir();
    if !sounds_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&sounds_dir)
        .map_err(|e| format!("Failed to read sounds directory: {}", e))?;

    let mut sounds: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| is_sound_file(path))
        .filter_map(|path| path.to_str().map(str::to_string))
        .collect();
    sounds.sort();

    Ok(sounds)
}

fn is_sound_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOUND_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
