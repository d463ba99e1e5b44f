//! Log and diagnostics command handlers

use std::path::PathBuf;

use crate::activity::{activity_log, ActivityEvent};
use crate::diagnostics;
use crate::paths::ClaudePaths;
use crate::playback;

pub fn export_diagnostics(paths: &ClaudePaths) -> Result<String, String> {
    diagnostics::export_diagnostics(paths)
}

/// Activity log, most recent first
pub fn get_activity_log(paths: &ClaudePaths) -> Result<Vec<ActivityEvent>, String> {
    activity_log(paths)
}

pub fn get_recent_projects(paths: &ClaudePaths) -> Result<Vec<String>, String> {
    diagnostics::recent_projects(paths)
}

/// Hook execution log, written by `smart-notify.sh` and the `notify` runs it starts
pub fn hook_log_path(paths: &ClaudePaths) -> Result<PathBuf, String> {
    let log_path = paths.hook_execution_log();
    if !log_path.exists() {
        return Err(format!(
            "Log file not found: {} (no hook has run yet)",
            log_path.display()
        ));
    }
    Ok(log_path)
}

/// Open the hook execution log in the default viewer
pub fn open_log_file(paths: &ClaudePaths) -> Result<(), String> {
    playback::open_file(&hook_log_path(paths)?)
}
