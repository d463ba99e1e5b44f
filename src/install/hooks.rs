//! Hook registrations in Claude Code's `settings.json`

use serde_json::{json, Map, Value};

use crate::config::EventKind;
use crate::paths::{ClaudePaths, NOTIFY_SCRIPT_NAME};

/// Check if a hook entry runs the notification script
pub fn hook_contains_notification_script(entry: &Value) -> bool {
    entry
        .get("hooks")
        .and_then(|h| h.as_array())
        .map(|hooks| {
            hooks.iter().any(|hook| {
                hook.get("command")
                    .and_then(|c| c.as_str())
                    .map(|cmd| cmd.contains(NOTIFY_SCRIPT_NAME))
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

/// Hook command registered for one event.
pub fn notify_command(paths: &ClaudePaths, kind: EventKind) -> String {
    format!(
        "bash \"{}\" {}",
        paths.notify_script().to_string_lossy(),
        kind.key()
    )
}

/// Our hook entry for one event group.
pub fn notify_hook_entry(paths: &ClaudePaths, kind: EventKind) -> Value {
    json!({
        "matcher": "",
        "hooks": [
            {
                "type": "command",
                "command": notify_command(paths, kind)
            }
        ]
    })
}

/// Hook types that carry at least one entry not installed by us.
pub fn foreign_hook_types(hooks: &Value) -> Vec<String> {
    let Some(hooks) = hooks.as_object() else {
        return Vec::new();
    };
    hooks
        .iter()
        .filter(|(_, entries)| match entries.as_array() {
            Some(arr) => arr.iter().any(|entry| !hook_contains_notification_script(entry)),
            None => true,
        })
        .map(|(hook_type, _)| hook_type.clone())
        .collect()
}

/// Merge our hook entries into an existing `hooks` object.
///
/// Our entry comes first in each of the five groups; foreign entries follow in
/// their original order. Our previous entries are dropped, so repeated installs
/// never duplicate. Groups we do not register are kept untouched.
pub fn merge_hooks(existing: &Value, paths: &ClaudePaths) -> Result<Value, String> {
    let mut merged = match existing {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        _ => return Err("Hooks is not an object".to_string()),
    };

    for kind in EventKind::ALL {
        let mut entries = vec![notify_hook_entry(paths, kind)];
        if let Some(current) = merged.get(kind.hook_name()).and_then(|v| v.as_array()) {
            entries.extend(
                current
                    .iter()
                    .filter(|entry| !hook_contains_notification_script(entry))
                    .cloned(),
            );
        }
        merged.insert(kind.hook_name().to_string(), Value::Array(entries));
    }

    Ok(Value::Object(merged))
}

/// Remove our entries from every hook group, dropping groups left empty.
///
/// Returns how many entries were removed.
pub fn strip_notify_hooks(settings: &mut Value) -> usize {
    let Some(hooks) = settings.get_mut("hooks").and_then(|h| h.as_object_mut()) else {
        return 0;
    };

    let mut removed = 0;
    for (_hook_type, entries) in hooks.iter_mut() {
        if let Some(arr) = entries.as_array_mut() {
            let before = arr.len();
            arr.retain(|entry| !hook_contains_notification_script(entry));
            removed += before - arr.len();
        }
    }

    hooks.retain(|_hook_type, entries| {
        entries.as_array().map(|arr| !arr.is_empty()).unwrap_or(true)
    });

    removed
}

/// Check whether every event group has our hook registered.
pub fn all_notify_hooks_present(settings: &Value) -> bool {
    let Some(hooks) = settings.get("hooks") else {
        return false;
    };
    EventKind::ALL.iter().all(|kind| {
        hooks
            .get(kind.hook_name())
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().any(hook_contains_notification_script))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ClaudePaths {
        ClaudePaths::new("/Users/test/.claude")
    }

    fn user_hook(command: &str) -> Value {
        json!({"matcher": "Bash", "hooks": [{"type": "command", "command": command}]})
    }

    #[test]
    fn test_merge_keeps_foreign_entries_after_ours() {
        let existing = json!({
            "Stop": [user_hook("say done")],
            "PreCompact": [user_hook("echo compact")]
        });

        let merged = merge_hooks(&existing, &paths()).expect("merge");

        let stop = merged["Stop"].as_array().expect("array");
        assert_eq!(stop.len(), 2);
        assert!(hook_contains_notification_script(&stop[0]));
        assert_eq!(stop[1], user_hook("say done"));
        assert_eq!(merged["PreCompact"], json!([user_hook("echo compact")]));
        assert_eq!(
            stop[0]["hooks"][0]["command"],
            "bash \"/Users/test/.claude/scripts/smart-notify.sh\" stop"
        );
    }

    #[test]
    fn test_merge_twice_does_not_duplicate() {
        let once = merge_hooks(&Value::Null, &paths()).expect("merge");
        let twice = merge_hooks(&once, &paths()).expect("merge");
        assert_eq!(once, twice);
        for kind in EventKind::ALL {
            assert_eq!(twice[kind.hook_name()].as_array().map(Vec::len), Some(1));
        }
    }

    #[test]
    fn test_strip_removes_only_ours_and_empty_groups() {
        let mut settings = json!({
            "hooks": merge_hooks(&json!({"Stop": [user_hook("say done")]}), &paths())
                .expect("merge")
        });
        assert!(all_notify_hooks_present(&settings));

        let removed = strip_notify_hooks(&mut settings);

        assert_eq!(removed, 5);
        assert_eq!(settings["hooks"], json!({"Stop": [user_hook("say done")]}));
        assert!(!all_notify_hooks_present(&settings));
    }

    #[test]
    fn test_foreign_hook_types() {
        let hooks = merge_hooks(&json!({"Stop": [user_hook("say done")]}), &paths())
            .expect("merge");
        assert_eq!(foreign_hook_types(&hooks), vec!["Stop".to_string()]);
        assert!(foreign_hook_types(&Value::Null).is_empty());
    }
}
