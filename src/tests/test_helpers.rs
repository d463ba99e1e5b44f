use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;

use tempfile::TempDir;

use crate::config::{ConfigError, SettingsDocument, SettingsStore};
use crate::install::{InstallationChanges, InstallationManifest};
use crate::lifecycle::Installer;
use crate::paths::ClaudePaths;
use crate::voice::{VoiceError, VoiceGenerator};

/// A Claude directory that is removed when the `TempDir` drops.
pub fn temp_claude_dir() -> (TempDir, ClaudePaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = ClaudePaths::new(dir.path().join(".claude"));
    fs::create_dir_all(paths.root()).unwrap();
    (dir, paths)
}

pub fn write_claude_settings(paths: &ClaudePaths, settings: &serde_json::Value) {
    fs::write(
        paths.claude_settings(),
        serde_json::to_string_pretty(settings).unwrap(),
    )
    .unwrap();
}

pub fn read_claude_settings(paths: &ClaudePaths) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(paths.claude_settings()).unwrap()).unwrap()
}

pub fn user_hook(command: &str) -> serde_json::Value {
    serde_json::json!({"matcher": "", "hooks": [{"type": "command", "command": command}]})
}

/// In-memory settings store with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    pub doc: RefCell<Option<SettingsDocument>>,
    pub fail_save: Cell<bool>,
    pub saves: Cell<usize>,
}

impl MemoryStore {
    pub fn with(doc: SettingsDocument) -> Self {
        let store = Self::default();
        *store.doc.borrow_mut() = Some(doc);
        store
    }

    pub fn stored(&self) -> Option<SettingsDocument> {
        self.doc.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<SettingsDocument, ConfigError> {
        self.doc
            .borrow()
            .clone()
            .ok_or_else(|| ConfigError::Missing("memory".into()))
    }

    fn save(&self, doc: &SettingsDocument) -> Result<(), ConfigError> {
        if self.fail_save.get() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.saves.set(self.saves.get() + 1);
        *self.doc.borrow_mut() = Some(doc.clone());
        Ok(())
    }
}

impl SettingsStore for Rc<MemoryStore> {
    fn load(&self) -> Result<SettingsDocument, ConfigError> {
        self.as_ref().load()
    }

    fn save(&self, doc: &SettingsDocument) -> Result<(), ConfigError> {
        self.as_ref().save(doc)
    }
}

/// Voice generator that counts calls and can be told to fail.
#[derive(Default)]
pub struct FakeVoices {
    pub fail: bool,
    pub calls: Cell<usize>,
}

impl VoiceGenerator for FakeVoices {
    fn generate(&self, _doc: &SettingsDocument) -> Result<usize, VoiceError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(VoiceError::FishAudio("HTTP 401".to_string()));
        }
        Ok(1)
    }
}

/// Installer backed by flags instead of files.
#[derive(Default)]
pub struct FakeInstaller {
    pub sounds_enabled: Cell<bool>,
    pub uninstalled: Cell<bool>,
    pub installed: Cell<bool>,
    pub fail_install: Cell<bool>,
    pub fail_uninstall: Cell<bool>,
    pub unreadable_markers: Cell<bool>,
    pub install_calls: Cell<usize>,
    pub uninstall_calls: Cell<usize>,
    /// Document an install seeds into the store, like a first install does.
    pub seed: RefCell<Option<(Rc<MemoryStore>, SettingsDocument)>>,
}

impl Installer for FakeInstaller {
    fn sounds_enabled(&self) -> Result<bool, String> {
        if self.unreadable_markers.get() {
            return Err("Failed to read .sounds-enabled: permission denied".to_string());
        }
        Ok(self.sounds_enabled.get())
    }

    fn was_uninstalled(&self) -> Result<bool, String> {
        if self.unreadable_markers.get() {
            return Err("Failed to read .uninstalled: permission denied".to_string());
        }
        Ok(self.uninstalled.get())
    }

    fn is_installed(&self) -> Result<bool, String> {
        Ok(self.installed.get())
    }

    fn install(&self) -> Result<String, String> {
        self.install_calls.set(self.install_calls.get() + 1);
        if self.fail_install.get() {
            return Err("Failed to write settings.json: permission denied".to_string());
        }
        if let Some((store, doc)) = self.seed.borrow().as_ref() {
            *store.doc.borrow_mut() = Some(doc.clone());
        }
        self.sounds_enabled.set(true);
        self.uninstalled.set(false);
        self.installed.set(true);
        Ok("Installation complete! Audio notifications are now active.".to_string())
    }

    fn uninstall(&self) -> Result<String, String> {
        self.uninstall_calls.set(self.uninstall_calls.get() + 1);
        if self.fail_uninstall.get() {
            return Err("Failed to write settings.json: read-only file system".to_string());
        }
        self.sounds_enabled.set(false);
        self.uninstalled.set(true);
        self.installed.set(false);
        Ok("Uninstallation complete!".to_string())
    }

    fn manifest(&self) -> Result<InstallationManifest, String> {
        Ok(InstallationManifest {
            installed_at: chrono::Utc::now(),
            app_version: "test".to_string(),
            backup_path: String::new(),
            changes: InstallationChanges {
                files_created: Vec::new(),
                hooks_added: Vec::new(),
                existing_hooks_preserved: vec!["PreCompact".to_string()],
            },
        })
    }
}
