//! Notification hook uninstallation command

use crate::install::uninstall_hooks as uninstall_from;
use crate::paths::ClaudePaths;

/// Remove the notification hooks and return the change summary
pub fn uninstall_hooks(paths: &ClaudePaths) -> Result<String, String> {
    uninstall_from(paths)
}
