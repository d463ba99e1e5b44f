//! Installation of the Claude Code hook registrations
//!
//! - `hooks`: reading and rewriting hook entries in `settings.json`
//! - `hook_install` / `hook_uninstall`: the two operations
//! - `manifest`: record of what an install changed
//! - `markers`: `.sounds-enabled` / `.uninstalled` sentinel files
//! - `backup`: settings backups and install rollback
//! - `scripts`: hook scripts written to disk

mod backup;
pub mod hook_install;
pub mod hook_uninstall;
pub mod hooks;
pub mod manifest;
pub mod markers;
pub mod scripts;

use std::path::{Path, PathBuf};

pub use backup::create_backup;
pub use hook_install::install_hooks;
pub use hook_uninstall::uninstall_hooks;
pub use manifest::{installation_info, InstallationChanges, InstallationManifest};

use crate::lifecycle::Installer;
use crate::paths::ClaudePaths;

/// Installs hooks that call back into `notifier_bin`.
#[derive(Debug, Clone)]
pub struct HookInstaller {
    paths: ClaudePaths,
    notifier_bin: PathBuf,
}

impl HookInstaller {
    pub fn new(paths: ClaudePaths, notifier_bin: PathBuf) -> Self {
        Self {
            paths,
            notifier_bin,
        }
    }

    /// Hooks call the binary that is running now.
    pub fn for_current_exe(paths: ClaudePaths) -> Result<Self, String> {
        let exe = std::env::current_exe()
            .map_err(|e| format!("Failed to locate audio-notifier binary: {}", e))?;
        Ok(Self::new(paths, exe))
    }

    pub fn paths(&self) -> &ClaudePaths {
        &self.paths
    }

    pub fn notifier_bin(&self) -> &Path {
        &self.notifier_bin
    }
}

impl Installer for HookInstaller {
    fn sounds_enabled(&self) -> Result<bool, String> {
        Ok(markers::sounds_enabled(&self.paths))
    }

    fn was_uninstalled(&self) -> Result<bool, String> {
        Ok(markers::was_uninstalled(&self.paths))
    }

    fn is_installed(&self) -> Result<bool, String> {
        Ok(self.paths.manifest().exists())
    }

    fn install(&self) -> Result<String, String> {
        install_hooks(&self.paths, &self.notifier_bin)
    }

    fn uninstall(&self) -> Result<String, String> {
        uninstall_hooks(&self.paths)
    }

    fn manifest(&self) -> Result<InstallationManifest, String> {
        installation_info(&self.paths)
    }
}
