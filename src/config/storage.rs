//! YAML persistence for the settings document

use std::path::{Path, PathBuf};

use super::errors::ConfigError;
use super::model::SettingsDocument;

/// Where the settings document is read from and written to.
pub trait SettingsStore {
    fn load(&self) -> Result<SettingsDocument, ConfigError>;
    fn save(&self, doc: &SettingsDocument) -> Result<(), ConfigError>;
}

/// The `audio-notifier.yaml` file shared with the hook scripts and the menu bar.
#[derive(Debug, Clone)]
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for YamlFileStore {
    fn load(&self) -> Result<SettingsDocument, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(self.path.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        parse_document(&content)
    }

    fn save(&self, doc: &SettingsDocument) -> Result<(), ConfigError> {
        write_document(&self.path, doc)
    }
}

/// Parse a settings document, filling any missing field with its default.
pub fn parse_document(content: &str) -> Result<SettingsDocument, ConfigError> {
    if content.trim().is_empty() {
        return Ok(SettingsDocument::default());
    }
    let mut doc: SettingsDocument = serde_yaml::from_str(content)?;
    doc.sanitize();
    Ok(doc)
}

/// Write the document atomically: temp file in the same directory, then rename.
///
/// No lock is taken; the menu bar and hook scripts may write the same file and
/// the last writer wins.
pub fn write_document(path: &Path, doc: &SettingsDocument) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let yaml = serde_yaml::to_string(doc)?;
    let tmp_path = path.with_extension("yaml.tmp");
    std::fs::write(&tmp_path, yaml.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load the document, substituting defaults on any failure.
///
/// Failures are logged, never returned: a missing or corrupt file must not
/// stop the editor from starting.
pub fn load_or_default(store: &dyn SettingsStore) -> SettingsDocument {
    match store.load() {
        Ok(doc) => doc,
        Err(ConfigError::Missing(path)) => {
            log::info!("No settings document at {:?}, using defaults", path);
            SettingsDocument::default()
        }
        Err(err) => {
            log::warn!("Failed to load settings, using defaults: {}", err);
            SettingsDocument::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{EventKind, SoundSelector, VOICE_FALLBACK_SOUND};

    #[test]
    fn test_partial_event_maps_are_filled() {
        let yaml = r#"
global_mode: false
global_settings:
  event_enabled:
    stop: false
  event_sounds:
    notification: /System/Library/Sounds/Glass.aiff
projects:
  - path: /tmp/proj
    event_sounds:
      stop: voice:project
min_interval: 5
"#;
        let doc = parse_document(yaml).expect("should parse");

        assert!(!doc.global_mode);
        assert!(!doc.global_settings.event_enabled.stop);
        assert!(doc.global_settings.event_enabled.notification);
        assert!(!doc.global_settings.event_enabled.pre_tool_use);
        assert_eq!(
            doc.global_settings.event_sounds.notification,
            SoundSelector::file("/System/Library/Sounds/Glass.aiff")
        );
        assert!(doc.global_settings.event_sounds.stop.is_voice());
        assert_eq!(doc.min_interval, 5);
        assert_eq!(doc.sound_library.len(), 12);

        let project = &doc.projects[0];
        assert!(project.enabled);
        assert_eq!(project.display_name, None);
        assert_eq!(project.label(), "proj");
        assert_eq!(project.event_sounds.get(EventKind::Stop).to_string(), "voice:project");
    }

    #[test]
    fn test_voice_tokens_are_dropped_from_library() {
        let yaml = "sound_library:\n  - voice:simple\n  - /tmp/a.wav\n";
        let doc = parse_document(yaml).expect("should parse");
        assert_eq!(doc.sound_library, vec!["/tmp/a.wav".to_string()]);
    }

    #[test]
    fn test_save_then_load_preserves_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = YamlFileStore::new(dir.path().join("nested/audio-notifier.yaml"));
        let mut doc = SettingsDocument::default();
        doc.global_settings
            .event_sounds
            .set(EventKind::Stop, SoundSelector::file(VOICE_FALLBACK_SOUND));
        doc.debug = true;

        store.save(&doc).expect("save");
        let loaded = store.load().expect("load");

        assert_eq!(loaded, doc);
        assert!(!dir.path().join("nested/audio-notifier.yaml.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("audio-notifier.yaml");
        std::fs::write(&path, "global_mode: [not, a, bool").expect("write");

        let store = YamlFileStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), SettingsDocument::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = YamlFileStore::new(dir.path().join("absent.yaml"));
        assert!(matches!(store.load(), Err(ConfigError::Missing(_))));
        assert_eq!(load_or_default(&store), SettingsDocument::default());
    }
}
