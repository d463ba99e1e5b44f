//! Filesystem layout of the notification system under the Claude directory

use std::path::{Path, PathBuf};

/// Environment variable overriding the Claude directory (mainly for tests and sandboxes).
pub const CLAUDE_DIR_ENV: &str = "AUDIO_NOTIFIER_CLAUDE_DIR";

/// Name of the hook entry script; hook commands are recognized as ours by this name.
pub const NOTIFY_SCRIPT_NAME: &str = "smart-notify.sh";
pub const UNINSTALL_SCRIPT_NAME: &str = "audio-notifier-uninstall.sh";

/// Every file and directory the notifier reads or writes, rooted at one Claude directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudePaths {
    root: PathBuf,
}

impl ClaudePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the Claude directory: explicit override, then env var, then `~/.claude`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, String> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }
        if let Ok(root) = std::env::var(CLAUDE_DIR_ENV) {
            if !root.trim().is_empty() {
                return Ok(Self::new(root));
            }
        }
        let home = dirs::home_dir().ok_or("Could not get HOME directory")?;
        Ok(Self::new(home.join(".claude")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_document(&self) -> PathBuf {
        self.root.join("audio-notifier.yaml")
    }

    /// Claude Code's own settings file holding hook registrations.
    pub fn claude_settings(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn sounds_enabled_marker(&self) -> PathBuf {
        self.root.join(".sounds-enabled")
    }

    pub fn uninstalled_marker(&self) -> PathBuf {
        self.root.join(".uninstalled")
    }

    pub fn manifest(&self) -> PathBuf {
        self.root.join("audio-notifier-install.json")
    }

    /// Record of the most recent uninstall (manifest plus its backup path).
    pub fn last_uninstall(&self) -> PathBuf {
        self.root.join("audio-notifier-last-uninstall.json")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    pub fn notify_script(&self) -> PathBuf {
        self.scripts_dir().join(NOTIFY_SCRIPT_NAME)
    }

    pub fn uninstall_script(&self) -> PathBuf {
        self.scripts_dir().join(UNINSTALL_SCRIPT_NAME)
    }

    pub fn custom_sounds_dir(&self) -> PathBuf {
        self.root.join("sounds")
    }

    pub fn voices_dir(&self) -> PathBuf {
        self.root.join("voices")
    }

    pub fn global_voices_dir(&self) -> PathBuf {
        self.voices_dir().join("global")
    }

    pub fn project_voices_dir(&self, project_hash: &str) -> PathBuf {
        self.voices_dir().join("projects").join(project_hash)
    }

    pub fn preview_voices_dir(&self) -> PathBuf {
        self.voices_dir().join("previews")
    }

    pub fn activity_log(&self) -> PathBuf {
        self.root.join("activity-log.json")
    }

    pub fn hook_execution_log(&self) -> PathBuf {
        self.root.join("hook-execution.log")
    }

    pub fn claude_output_log(&self) -> PathBuf {
        self.root.join("claude-output.log")
    }

    /// Timestamp of the last played notification, used for `min_interval` throttling.
    pub fn last_notify_stamp(&self) -> PathBuf {
        self.root.join(".last-notify")
    }
}
