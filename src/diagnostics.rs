//! Support bundle: a JSON snapshot of the install state with secrets redacted

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::process::Command;

use serde_json::{json, Value};

use crate::activity::activity_log;
use crate::install::manifest::APP_VERSION;
use crate::logging::log_file_path;
use crate::paths::ClaudePaths;

const RECENT_ACTIVITY: usize = 10;
const HOOK_LOG_LINES: usize = 50;
const MAX_RECENT_PROJECTS: usize = 10;

/// Replace the value of every API-key line in a YAML document.
pub fn redact_api_keys(yaml: &str) -> String {
    yaml.lines()
        .map(|line| match line.find(':') {
            Some(pos) if line[..pos].trim().ends_with("api_key") => {
                format!("{}: [REDACTED]", &line[..pos])
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

fn tail_lines(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

pub fn export_diagnostics(paths: &ClaudePaths) -> Result<String, String> {
    let mut diagnostics = json!({
        "app_version": APP_VERSION,
        "collected_at": chrono::Utc::now().to_rfc3339(),
        "claude_dir": paths.root().to_string_lossy(),
        "debug_log": log_file_path().to_string_lossy(),
    });

    if cfg!(target_os = "macos") {
        if let Ok(output) = Command::new("sw_vers").arg("-productVersion").output() {
            diagnostics["macos_version"] = json!(String::from_utf8_lossy(&output.stdout).trim());
        }
    }

    let notify_script = paths.notify_script();
    diagnostics["scripts_installed"] = json!({
        "smart_notify_exists": notify_script.exists(),
        "smart_notify_executable": is_executable(&notify_script),
    });
    diagnostics["sounds_enabled"] = json!(paths.sounds_enabled_marker().exists());
    diagnostics["uninstalled"] = json!(paths.uninstalled_marker().exists());

    if let Ok(contents) = fs::read_to_string(paths.claude_settings()) {
        if let Ok(settings) = serde_json::from_str::<Value>(&contents) {
            diagnostics["hooks_configured"] = settings.get("hooks").cloned().unwrap_or(json!({}));
        }
    }

    match activity_log(paths) {
        Ok(events) => {
            let recent: Vec<_> = events.into_iter().take(RECENT_ACTIVITY).collect();
            diagnostics["recent_activity"] = json!(recent);
        }
        Err(err) => log::warn!("Diagnostics: {}", err),
    }

    if let Ok(contents) = fs::read_to_string(paths.hook_execution_log()) {
        diagnostics["hook_execution_log"] = json!(tail_lines(&contents, HOOK_LOG_LINES));
    }

    if let Ok(contents) = fs::read_to_string(paths.settings_document()) {
        diagnostics["config_yaml"] = json!(redact_api_keys(&contents));
    }

    serde_json::to_string_pretty(&diagnostics)
        .map_err(|e| format!("Failed to serialize diagnostics: {}", e))
}

/// Recent working directories reported in `claude-output.log`.
pub fn recent_projects(paths: &ClaudePaths) -> Result<Vec<String>, String> {
    let log_path = paths.claude_output_log();
    if !log_path.exists() {
        return Ok(Vec::new());
    }

    let contents =
        fs::read_to_string(&log_path).map_err(|e| format!("Failed to read log file: {}", e))?;

    let mut projects: Vec<String> = contents
        .lines()
        .filter_map(|line| line.split("Working directory:").nth(1))
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty())
        .collect();
    projects.dedup();
    projects.truncate(MAX_RECENT_PROJECTS);

    Ok(projects)
}
