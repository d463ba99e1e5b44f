//! Install/uninstall lifecycle: the once-per-launch install check and the manual toggle

use crate::install::InstallationManifest;

/// The hook-registration surface the lifecycle drives.
pub trait Installer {
    /// `.sounds-enabled` marker present.
    fn sounds_enabled(&self) -> Result<bool, String>;
    /// The user removed the hooks on purpose.
    fn was_uninstalled(&self) -> Result<bool, String>;
    /// An installation manifest is present.
    fn is_installed(&self) -> Result<bool, String>;
    fn install(&self) -> Result<String, String>;
    fn uninstall(&self) -> Result<String, String>;
    fn manifest(&self) -> Result<InstallationManifest, String>;
}

/// Result of the launch-time install check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    /// The check already ran in this process.
    AlreadyChecked,
    /// Sounds are enabled; nothing to do.
    AlreadyEnabled,
    /// Not enabled because the user uninstalled; left that way.
    RespectedUninstall,
    /// A marker could not be read, so nothing was installed.
    MarkerUnreadable(String),
    /// Installed now. The settings document may have been seeded and must be reloaded.
    Installed(String),
    InstallFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The user declined the confirmation.
    Cancelled,
    /// Installed now; reload the settings document.
    Installed(String),
    /// Uninstalled; the settings document was left as it was.
    Uninstalled(String),
    Failed(String),
}

/// Which action the install control currently offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallAffordance {
    Install,
    Uninstall,
}

pub struct Lifecycle<I: Installer> {
    installer: I,
    startup_checked: bool,
}

impl<I: Installer> Lifecycle<I> {
    pub fn new(installer: I) -> Self {
        Self {
            installer,
            startup_checked: false,
        }
    }

    pub fn installer(&self) -> &I {
        &self.installer
    }

    /// Install the hooks at launch unless they are enabled or were removed by the user.
    ///
    /// Runs at most once per `Lifecycle`; later calls return `AlreadyChecked`.
    pub fn check_and_install(&mut self) -> StartupOutcome {
        if self.startup_checked {
            log::debug!("Startup install check already ran");
            return StartupOutcome::AlreadyChecked;
        }
        self.startup_checked = true;

        match self.installer.sounds_enabled() {
            Ok(true) => return StartupOutcome::AlreadyEnabled,
            Ok(false) => {}
            Err(err) => {
                log::warn!("Could not read sounds marker, skipping auto-install: {}", err);
                return StartupOutcome::MarkerUnreadable(err);
            }
        }

        match self.installer.was_uninstalled() {
            Ok(true) => {
                log::info!("Hooks were uninstalled by the user, not reinstalling");
                return StartupOutcome::RespectedUninstall;
            }
            Ok(false) => {}
            Err(err) => {
                log::warn!("Could not read uninstall marker, skipping auto-install: {}", err);
                return StartupOutcome::MarkerUnreadable(err);
            }
        }

        log::info!("Hooks not installed, installing");
        match self.installer.install() {
            Ok(message) => StartupOutcome::Installed(message),
            Err(err) => {
                log::warn!("Automatic install failed: {}", err);
                StartupOutcome::InstallFailed(err)
            }
        }
    }

    pub fn affordance(&self) -> InstallAffordance {
        match self.installer.is_installed() {
            Ok(true) => InstallAffordance::Uninstall,
            Ok(false) => InstallAffordance::Install,
            Err(err) => {
                log::warn!("Could not determine install state: {}", err);
                InstallAffordance::Install
            }
        }
    }

    /// Uninstall when installed, install otherwise, after the user confirms.
    pub fn toggle(&mut self, confirm: &mut dyn FnMut(&str) -> bool) -> ToggleOutcome {
        match self.affordance() {
            InstallAffordance::Uninstall => {
                let prompt = match self.installer.manifest() {
                    Ok(manifest) if !manifest.changes.existing_hooks_preserved.is_empty() => {
                        format!(
                            "Remove the audio notification hooks? Your other hooks ({}) will be kept.",
                            manifest.changes.existing_hooks_preserved.join(", ")
                        )
                    }
                    _ => "Remove the audio notification hooks? Your settings will be kept."
                        .to_string(),
                };
                if !confirm(&prompt) {
                    return ToggleOutcome::Cancelled;
                }
                match self.installer.uninstall() {
                    Ok(summary) => ToggleOutcome::Uninstalled(summary),
                    Err(err) => ToggleOutcome::Failed(err),
                }
            }
            InstallAffordance::Install => {
                if !confirm("Install the audio notification hooks into Claude Code?") {
                    return ToggleOutcome::Cancelled;
                }
                match self.installer.install() {
                    Ok(message) => ToggleOutcome::Installed(message),
                    Err(err) => ToggleOutcome::Failed(err),
                }
            }
        }
    }
}
