//! Settings document commands

use crate::config::storage::write_document;
use crate::config::voice_select::normalize_document;
use crate::config::{load_or_default, SettingsDocument, YamlFileStore};
use crate::paths::ClaudePaths;

/// Load the settings document, falling back to defaults
pub fn load_config(paths: &ClaudePaths) -> Result<SettingsDocument, String> {
    Ok(load_or_default(&YamlFileStore::new(paths.settings_document())))
}

/// Normalize and write a complete settings document
pub fn save_config(paths: &ClaudePaths, mut config: SettingsDocument) -> Result<(), String> {
    config.sanitize();
    normalize_document(&mut config);
    write_document(&paths.settings_document(), &config)
        .map_err(|e| format!("Failed to save configuration: {}", e))
}

/// The settings document as YAML
pub fn show_config(paths: &ClaudePaths) -> Result<String, String> {
    let config = load_config(paths)?;
    serde_yaml::to_string(&config).map_err(|e| format!("Failed to serialize config: {}", e))
}
