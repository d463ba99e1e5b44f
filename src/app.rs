//! Application state: one settings editor, its store and the install lifecycle

use crate::config::SettingsStore;
use crate::editor::{SaveOutcome, SettingsEditor};
use crate::lifecycle::{InstallAffordance, Installer, Lifecycle, StartupOutcome, ToggleOutcome};
use crate::voice::VoiceGenerator;

pub struct App<I: Installer, S: SettingsStore> {
    editor: SettingsEditor,
    store: S,
    lifecycle: Lifecycle<I>,
    voices: Option<Box<dyn VoiceGenerator>>,
}

impl<I: Installer, S: SettingsStore> App<I, S> {
    pub fn new(installer: I, store: S, voices: Option<Box<dyn VoiceGenerator>>) -> Self {
        let editor = SettingsEditor::load(&store);
        Self {
            editor,
            store,
            lifecycle: Lifecycle::new(installer),
            voices,
        }
    }

    pub fn editor(&self) -> &SettingsEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut SettingsEditor {
        &mut self.editor
    }

    pub fn installer(&self) -> &I {
        self.lifecycle.installer()
    }

    /// Launch-time install check. A fresh install may have seeded the settings
    /// document, so the editor is reloaded afterwards.
    pub fn startup(&mut self) -> StartupOutcome {
        let outcome = self.lifecycle.check_and_install();
        match &outcome {
            StartupOutcome::Installed(_) => self.editor.reload(&self.store),
            StartupOutcome::InstallFailed(err) => log::warn!("Startup install failed: {}", err),
            StartupOutcome::MarkerUnreadable(err) => {
                log::warn!("Startup install check skipped: {}", err)
            }
            _ => {}
        }
        outcome
    }

    pub fn install_affordance(&self) -> InstallAffordance {
        self.lifecycle.affordance()
    }

    /// Install or uninstall after confirmation. Only an install reloads the
    /// editor; uninstall leaves the settings document alone.
    pub fn toggle_install(&mut self, confirm: &mut dyn FnMut(&str) -> bool) -> ToggleOutcome {
        let outcome = self.lifecycle.toggle(confirm);
        if let ToggleOutcome::Installed(_) = outcome {
            self.editor.reload(&self.store);
        }
        outcome
    }

    pub fn save(&mut self) -> SaveOutcome {
        self.editor.save(&self.store, self.voices.as_deref())
    }

    /// Whether the editor may close; asks first while edits are unsaved.
    pub fn request_close(&self, confirm: &mut dyn FnMut(&str) -> bool) -> bool {
        if !self.editor.should_confirm_close() {
            return true;
        }
        confirm("You have unsaved changes. Close without saving?")
    }
}
