//! Editable settings state: the draft document, the last-saved snapshot and
//! every mutation the settings editor can make.

use std::path::Path;

use crate::config::model::VOICE_PREFIX;
use crate::config::storage::load_or_default;
use crate::config::voice_select::{normalize_document, ui_selector};
use crate::config::{EventKind, ProjectEntry, SettingsDocument, SettingsStore, SoundSelector};
use crate::voice::VoiceGenerator;

/// Which preferences an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    /// A project, identified by its path.
    Project(String),
}

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The document was written but project voices could not be generated.
    /// The snapshot is not advanced, so the editor still reports unsaved changes.
    SavedVoiceFailed(String),
    /// Nothing was written; the draft is kept for a retry.
    Failed(String),
}

/// Whether the live document differs from the last loaded or saved one.
///
/// Structural and order-sensitive: reordering projects or sounds counts as a
/// change. Without a snapshot to compare against, report a change.
pub fn has_unsaved_changes(current: &SettingsDocument, saved: Option<&SettingsDocument>) -> bool {
    match saved {
        Some(saved) => current != saved,
        None => true,
    }
}

/// Draft settings plus the snapshot they were loaded or saved as.
#[derive(Debug, Clone)]
pub struct SettingsEditor {
    draft: SettingsDocument,
    saved: Option<SettingsDocument>,
    dirty: bool,
    /// Set when the last save wrote the document but voice rendering failed.
    voices_pending: bool,
}

impl SettingsEditor {
    /// Start editing a document that matches what is persisted.
    pub fn from_document(doc: SettingsDocument) -> Self {
        Self {
            saved: Some(doc.clone()),
            draft: doc,
            dirty: false,
            voices_pending: false,
        }
    }

    /// Start editing a document with no known persisted counterpart.
    pub fn unsaved(doc: SettingsDocument) -> Self {
        Self {
            draft: doc,
            saved: None,
            dirty: true,
            voices_pending: false,
        }
    }

    pub fn load(store: &dyn SettingsStore) -> Self {
        Self::from_document(load_or_default(store))
    }

    /// Replace draft and snapshot with freshly loaded settings.
    pub fn reload(&mut self, store: &dyn SettingsStore) {
        self.replace_with(load_or_default(store));
    }

    fn replace_with(&mut self, doc: SettingsDocument) {
        self.saved = Some(doc.clone());
        self.draft = doc;
        self.dirty = false;
        self.voices_pending = false;
    }

    pub fn draft(&self) -> &SettingsDocument {
        &self.draft
    }

    pub fn saved_snapshot(&self) -> Option<&SettingsDocument> {
        self.saved.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// The save action is offered only when there is something to save.
    pub fn can_save(&self) -> bool {
        self.dirty
    }

    /// Closing the editor asks for confirmation while edits are unsaved.
    pub fn should_confirm_close(&self) -> bool {
        self.dirty
    }

    fn update_dirty(&mut self) {
        self.dirty =
            self.voices_pending || has_unsaved_changes(&self.draft, self.saved.as_ref());
    }

    /// Discard edits and return to the snapshot.
    pub fn reset(&mut self) {
        if let Some(saved) = self.saved.clone() {
            let voices_pending = self.voices_pending;
            self.replace_with(saved);
            // Unrendered voices still need a save after the edits are gone
            self.voices_pending = voices_pending;
            self.dirty = voices_pending;
        }
    }

    /// Normalize and persist the draft, then render project voices if any are in use.
    pub fn save(
        &mut self,
        store: &dyn SettingsStore,
        voices: Option<&dyn VoiceGenerator>,
    ) -> SaveOutcome {
        let mut normalized = self.draft.clone();
        normalize_document(&mut normalized);

        if let Err(err) = store.save(&normalized) {
            log::warn!("Settings save failed: {}", err);
            return SaveOutcome::Failed(format!("Failed to save configuration: {}", err));
        }

        self.draft = normalized;

        if uses_project_voices(&self.draft) {
            if let Some(voices) = voices {
                if let Err(err) = voices.generate(&self.draft) {
                    log::warn!("Voice generation failed after save: {}", err);
                    self.voices_pending = true;
                    self.dirty = true;
                    return SaveOutcome::SavedVoiceFailed(format!(
                        "Configuration saved, but voice generation failed: {}",
                        err
                    ));
                }
            }
        }

        let saved = self.draft.clone();
        self.replace_with(saved);
        log::info!("Settings saved");
        SaveOutcome::Saved
    }

    pub fn set_global_mode(&mut self, global_mode: bool) {
        self.draft.global_mode = global_mode;
        self.update_dirty();
    }

    pub fn set_event_enabled(
        &mut self,
        scope: &Scope,
        kind: EventKind,
        enabled: bool,
    ) -> Result<(), String> {
        match scope {
            Scope::Global => self.draft.global_settings.event_enabled.set(kind, enabled),
            Scope::Project(path) => project_mut(&mut self.draft, path)?
                .event_enabled
                .set(kind, enabled),
        }
        self.update_dirty();
        Ok(())
    }

    /// Choose a sound file or a `voice:*` token for one event.
    ///
    /// Choosing a file turns voice off for that event right away; choosing a
    /// voice token only takes effect in the persisted flags at save.
    pub fn set_event_sound(
        &mut self,
        scope: &Scope,
        kind: EventKind,
        selector: SoundSelector,
    ) -> Result<(), String> {
        let (sounds, voice_enabled) = match scope {
            Scope::Global => {
                let global = &mut self.draft.global_settings;
                (&mut global.event_sounds, &mut global.voice_enabled)
            }
            Scope::Project(path) => {
                let project = project_mut(&mut self.draft, path)?;
                (&mut project.event_sounds, &mut project.voice_enabled)
            }
        };
        if !selector.is_voice() {
            voice_enabled.set(kind, false);
        }
        sounds.set(kind, selector);
        self.update_dirty();
        Ok(())
    }

    /// Selector to display for an event, as the editor's dropdown would show it.
    pub fn displayed_selector(&self, scope: &Scope, kind: EventKind) -> Option<SoundSelector> {
        let global = &self.draft.global_settings;
        let (sounds, voice_enabled, template) = match scope {
            Scope::Global => (
                &global.event_sounds,
                &global.voice_enabled,
                global.voice_template.as_str(),
            ),
            Scope::Project(path) => {
                let project = self.draft.project(path)?;
                (
                    &project.event_sounds,
                    &project.voice_enabled,
                    project.effective_template(global),
                )
            }
        };
        // A voice token chosen in this session is shown as chosen until saved
        if sounds.get(kind).is_voice() {
            return Some(sounds.get(kind).clone());
        }
        Some(ui_selector(sounds, voice_enabled, template, kind))
    }

    pub fn set_respect_do_not_disturb(&mut self, respect: bool) {
        self.draft.global_settings.respect_do_not_disturb = respect;
        self.update_dirty();
    }

    pub fn set_min_interval(&mut self, seconds: u32) {
        self.draft.min_interval = seconds;
        self.update_dirty();
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.draft.debug = debug;
        self.update_dirty();
    }

    pub fn set_voice_provider(&mut self, provider: &str) {
        self.draft.global_settings.voice_provider = provider.to_string();
        self.update_dirty();
    }

    pub fn set_voice_id(&mut self, voice_id: Option<String>) {
        self.draft.global_settings.voice_id = voice_id.filter(|id| !id.trim().is_empty());
        self.update_dirty();
    }

    pub fn set_fish_audio_api_key(&mut self, api_key: Option<String>) {
        self.draft.global_settings.fish_audio_api_key =
            api_key.filter(|key| !key.trim().is_empty());
        self.update_dirty();
    }

    /// Add a project with default preferences. A path can only be added once.
    pub fn add_project(&mut self, path: &str) -> Result<(), String> {
        let path = path.trim();
        if path.is_empty() {
            return Err("Project path is empty".to_string());
        }
        if self.draft.project(path).is_some() {
            return Err(format!("Project {} is already configured", path));
        }
        self.draft.projects.push(ProjectEntry::new(path));
        self.update_dirty();
        Ok(())
    }

    /// Add the directory a picker returned; a cancelled picker (`None`) changes nothing.
    pub fn add_picked_project(&mut self, picked: Option<&Path>) -> Result<bool, String> {
        match picked {
            Some(dir) => self.add_project(&dir.to_string_lossy()).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn remove_project(&mut self, path: &str) -> bool {
        let before = self.draft.projects.len();
        self.draft.projects.retain(|p| p.path != path);
        let removed = self.draft.projects.len() != before;
        self.update_dirty();
        removed
    }

    pub fn rename_project(&mut self, path: &str, display_name: &str) -> Result<(), String> {
        let name = display_name.trim();
        project_mut(&mut self.draft, path)?.display_name =
            (!name.is_empty()).then(|| name.to_string());
        self.update_dirty();
        Ok(())
    }

    pub fn set_project_enabled(&mut self, path: &str, enabled: bool) -> Result<(), String> {
        project_mut(&mut self.draft, path)?.enabled = enabled;
        self.update_dirty();
        Ok(())
    }

    /// Add a sound file to the library; duplicates are ignored.
    pub fn add_sound(&mut self, path: &str) -> Result<bool, String> {
        let path = path.trim();
        if path.is_empty() {
            return Err("Sound path is empty".to_string());
        }
        if path.starts_with(VOICE_PREFIX) {
            return Err(format!("'{}' is reserved and cannot be added as a sound", path));
        }
        if self.draft.sound_library.iter().any(|s| s == path) {
            return Ok(false);
        }
        self.draft.sound_library.push(path.to_string());
        self.update_dirty();
        Ok(true)
    }

    pub fn remove_sound(&mut self, path: &str) -> bool {
        let before = self.draft.sound_library.len();
        self.draft.sound_library.retain(|s| s != path);
        let removed = self.draft.sound_library.len() != before;
        self.update_dirty();
        removed
    }

    /// Library in display order: alphabetical by file name, case-insensitive.
    pub fn sorted_sound_library(&self) -> Vec<&str> {
        let mut sounds: Vec<&str> = self.draft.sound_library.iter().map(String::as_str).collect();
        sounds.sort_by_key(|path| sound_display_name(path).to_lowercase());
        sounds
    }
}

/// "Glass" for `/System/Library/Sounds/Glass.aiff`.
pub fn sound_display_name(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file)
}

fn uses_project_voices(doc: &SettingsDocument) -> bool {
    let global = &doc.global_settings;
    let global_project_voice = doc.global_mode
        && global.voice_template.contains("{project}")
        && global.voice_enabled.any();
    global_project_voice || doc.projects.iter().any(|p| p.voice_enabled.any())
}

fn project_mut<'a>(doc: &'a mut SettingsDocument, path: &str) -> Result<&'a mut ProjectEntry, String> {
    doc.project_mut(path)
        .ok_or_else(|| format!("No project configured for {}", path))
}
