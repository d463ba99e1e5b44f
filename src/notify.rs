//! Hook-side notification: decide what an event fired in a directory should play

use std::fs;
use std::path::{Path, PathBuf};

use crate::activity::{append_event, ActivityEvent};
use crate::config::voice_select::render_template;
use crate::config::{load_or_default, EventKind, ProjectEntry, SettingsDocument, YamlFileStore};
use crate::install::markers;
use crate::paths::ClaudePaths;
use crate::playback;
use crate::voice::voice_file_for;

/// What an event should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyPlan {
    /// The event is switched off for the resolved scope.
    Disabled,
    /// Speak the rendered text, from a cached rendering when one exists.
    Voice {
        file: Option<PathBuf>,
        text: String,
    },
    Sound(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// `.sounds-enabled` is absent.
    SoundsOff,
    Disabled,
    /// Another notification played less than `min_interval` seconds ago.
    Throttled,
    Played,
}

/// Project whose preferences apply in `cwd`, or `None` for the global ones.
///
/// Only consulted outside global mode. The deepest enabled project containing
/// `cwd` wins.
pub fn resolve_project<'a>(doc: &'a SettingsDocument, cwd: &str) -> Option<&'a ProjectEntry> {
    if doc.global_mode {
        return None;
    }
    let cwd = cwd.trim_end_matches('/');
    doc.projects
        .iter()
        .filter(|project| project.enabled)
        .filter(|project| {
            let root = project.path.trim_end_matches('/');
            !root.is_empty()
                && (cwd == root
                    || cwd
                        .strip_prefix(root)
                        .is_some_and(|rest| rest.starts_with('/')))
        })
        .max_by_key(|project| project.path.trim_end_matches('/').len())
}

pub fn plan_notification(
    doc: &SettingsDocument,
    paths: &ClaudePaths,
    kind: EventKind,
    cwd: &str,
) -> NotifyPlan {
    let global = &doc.global_settings;
    let project = resolve_project(doc, cwd);

    let (sounds, event_enabled, voice_enabled, template) = match project {
        Some(p) => (
            &p.event_sounds,
            &p.event_enabled,
            &p.voice_enabled,
            p.effective_template(global),
        ),
        None => (
            &global.event_sounds,
            &global.event_enabled,
            &global.voice_enabled,
            global.voice_template.as_str(),
        ),
    };

    if !*event_enabled.get(kind) {
        return NotifyPlan::Disabled;
    }

    if *voice_enabled.get(kind) || sounds.get(kind).is_voice() {
        let text = render_template(template, kind, project.map(|p| p.label()));
        let file = voice_file_for(paths, project.map(|p| p.path.as_str()), kind);
        return NotifyPlan::Voice { file, text };
    }

    match sounds.get(kind).as_file() {
        Some(path) => NotifyPlan::Sound(PathBuf::from(path)),
        None => NotifyPlan::Disabled,
    }
}

fn last_notify(paths: &ClaudePaths) -> Option<i64> {
    fs::read_to_string(paths.last_notify_stamp())
        .ok()
        .and_then(|content| content.trim().parse().ok())
}

/// True when the previous notification is less than `min_interval` seconds old.
pub fn is_throttled(paths: &ClaudePaths, min_interval: u32, now: i64) -> bool {
    if min_interval == 0 {
        return false;
    }
    match last_notify(paths) {
        Some(last) => now >= last && now - last < i64::from(min_interval),
        None => false,
    }
}

fn record_notify(paths: &ClaudePaths, now: i64) -> Result<(), String> {
    fs::write(paths.last_notify_stamp(), now.to_string())
        .map_err(|e| format!("Failed to write notify timestamp: {}", e))
}

fn play(plan: &NotifyPlan) -> Result<(), String> {
    match plan {
        NotifyPlan::Voice {
            file: Some(file), ..
        } => playback::play_file(file),
        NotifyPlan::Voice { file: None, text } => playback::speak(text),
        NotifyPlan::Sound(path) => playback::play_file(path),
        NotifyPlan::Disabled => Ok(()),
    }
}

/// Handle one hook invocation end to end.
pub fn notify(paths: &ClaudePaths, kind: EventKind, cwd: &Path) -> Result<NotifyOutcome, String> {
    // 1. Master switch
    if !markers::sounds_enabled(paths) {
        log::debug!("Sounds disabled, ignoring {}", kind);
        return Ok(NotifyOutcome::SoundsOff);
    }

    // 2. Resolve the plan
    let doc = load_or_default(&YamlFileStore::new(paths.settings_document()));
    let cwd = cwd.to_string_lossy();
    let plan = plan_notification(&doc, paths, kind, &cwd);
    if plan == NotifyPlan::Disabled {
        return Ok(NotifyOutcome::Disabled);
    }

    // 3. Throttle
    let now = chrono::Utc::now();
    if is_throttled(paths, doc.min_interval, now.timestamp()) {
        log::debug!("Throttled {} (min_interval {}s)", kind, doc.min_interval);
        return Ok(NotifyOutcome::Throttled);
    }
    record_notify(paths, now.timestamp())?;

    // 4. Play and record
    let played = play(&plan);
    if let Err(err) = &played {
        log::warn!("Failed to play {}: {}", kind, err);
    }

    let project = resolve_project(&doc, &cwd).map(|p| p.label().to_string());
    let message = match &plan {
        NotifyPlan::Voice { text, .. } => Some(text.clone()),
        _ => None,
    };
    let event = ActivityEvent {
        timestamp: now.to_rfc3339(),
        event: kind.key().to_string(),
        audio: played.is_ok(),
        visual: false,
        full_message: message.clone(),
        message,
        project,
    };
    if let Err(err) = append_event(paths, event) {
        log::warn!("{}", err);
    }

    played.map(|_| NotifyOutcome::Played)
}
