//! Activity log of fired notifications (`activity-log.json`)

use std::fs;

use serde::{Deserialize, Serialize};

use crate::paths::ClaudePaths;

/// Older entries are dropped once the log grows past this.
const MAX_ACTIVITY_EVENTS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub timestamp: String,
    pub event: String,
    pub audio: bool,
    pub visual: bool,
    pub message: Option<String>,
    pub full_message: Option<String>,
    pub project: Option<String>,
}

fn read_events(paths: &ClaudePaths) -> Result<Vec<ActivityEvent>, String> {
    let path = paths.activity_log();
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content =
        fs::read_to_string(&path).map_err(|e| format!("Failed to read activity log: {}", e))?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse activity log: {}", e))
}

/// Logged events, most recent first.
pub fn activity_log(paths: &ClaudePaths) -> Result<Vec<ActivityEvent>, String> {
    let mut events = read_events(paths)?;
    events.reverse();
    Ok(events)
}

/// Append one event. A corrupt log is replaced rather than blocking notifications.
pub fn append_event(paths: &ClaudePaths, event: ActivityEvent) -> Result<(), String> {
    let mut events = read_events(paths).unwrap_or_else(|err| {
        log::warn!("Starting a new activity log: {}", err);
        Vec::new()
    });
    events.push(event);
    if events.len() > MAX_ACTIVITY_EVENTS {
        let excess = events.len() - MAX_ACTIVITY_EVENTS;
        events.drain(..excess);
    }

    let content = serde_json::to_string_pretty(&events)
        .map_err(|e| format!("Failed to serialize activity log: {}", e))?;
    fs::create_dir_all(paths.root())
        .map_err(|e| format!("Failed to create Claude directory: {}", e))?;
    fs::write(paths.activity_log(), content)
        .map_err(|e| format!("Failed to write activity log: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str) -> ActivityEvent {
        ActivityEvent {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            event: name.to_string(),
            audio: true,
            visual: false,
            message: None,
            full_message: None,
            project: None,
        }
    }

    #[test]
    fn test_activity_log_is_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ClaudePaths::new(dir.path());

        append_event(&paths, event("stop")).unwrap();
        append_event(&paths, event("notification")).unwrap();

        let events = activity_log(&paths).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "notification");
        assert_eq!(events[1].event, "stop");
    }

    #[test]
    fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ClaudePaths::new(dir.path());
        assert!(activity_log(&paths).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_log_is_replaced_on_append() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ClaudePaths::new(dir.path());
        fs::write(paths.activity_log(), "not json").unwrap();

        assert!(activity_log(&paths).is_err());
        append_event(&paths, event("stop")).unwrap();
        assert_eq!(activity_log(&paths).unwrap().len(), 1);
    }
}
