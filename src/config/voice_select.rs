//! Collapses UI-level `voice:*` selectors into the persisted voice flags.
//!
//! The settings file has no "this event speaks" sound value; a voice event is
//! stored as `voice_enabled = true` plus an inert fallback sound path, and the
//! phrasing lives in the scope's `voice_template`.

use super::model::{
    EventKind, EventMap, GlobalSettings, SettingsDocument, SoundSelector, VoiceStyle,
    PROJECT_VOICE_TEMPLATE, SIMPLE_VOICE_TEMPLATE, VOICE_FALLBACK_SOUND,
};

/// Normalize every scope of the document in place, ready for persistence.
pub fn normalize_document(doc: &mut SettingsDocument) {
    normalize_global(&mut doc.global_settings);

    for project in &mut doc.projects {
        if let Some(template) =
            collapse_voice_selectors(&mut project.event_sounds, &mut project.voice_enabled)
        {
            project.voice_template = Some(template.to_string());
        }
    }
}

fn normalize_global(global: &mut GlobalSettings) {
    if let Some(template) =
        collapse_voice_selectors(&mut global.event_sounds, &mut global.voice_enabled)
    {
        global.voice_template = template.to_string();
    }
    global.enabled = global.event_enabled.any();
}

/// Rewrite one scope's selectors and return the template the scope should use.
///
/// The template is one string per scope, so when events pick different voice
/// styles the last event in [`EventKind::ALL`] order decides it for all of them.
fn collapse_voice_selectors(
    sounds: &mut EventMap<SoundSelector>,
    voice_enabled: &mut EventMap<bool>,
) -> Option<&'static str> {
    let mut template = None;

    for kind in EventKind::ALL {
        match sounds.get(kind) {
            SoundSelector::Voice(style) => {
                match style {
                    VoiceStyle::Simple => template = Some(SIMPLE_VOICE_TEMPLATE),
                    VoiceStyle::Project => template = Some(PROJECT_VOICE_TEMPLATE),
                    VoiceStyle::Other(suffix) => {
                        log::warn!("Unknown voice selector 'voice:{}' for {}", suffix, kind);
                    }
                }
                voice_enabled.set(kind, true);
                sounds.set(kind, SoundSelector::file(VOICE_FALLBACK_SOUND));
            }
            SoundSelector::File(path) => {
                // Already collapsed on an earlier save; keep it a voice event.
                let collapsed_voice = *voice_enabled.get(kind) && path == VOICE_FALLBACK_SOUND;
                if !collapsed_voice {
                    voice_enabled.set(kind, false);
                }
            }
        }
    }

    template
}

/// Selector the editor shows for an event, derived from the persisted flags.
pub fn ui_selector(
    sounds: &EventMap<SoundSelector>,
    voice_enabled: &EventMap<bool>,
    template: &str,
    kind: EventKind,
) -> SoundSelector {
    if !*voice_enabled.get(kind) {
        return sounds.get(kind).clone();
    }
    if template.contains("{project}") {
        SoundSelector::Voice(VoiceStyle::Project)
    } else {
        SoundSelector::Voice(VoiceStyle::Simple)
    }
}

/// Fill a voice template for one event. Global scope passes no project.
pub fn render_template(template: &str, kind: EventKind, project: Option<&str>) -> String {
    let rendered = template
        .replace("{event}", kind.spoken_name())
        .replace("{project}", project.unwrap_or(""));
    rendered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{ProjectEntry, VOICE_SIMPLE};

    #[test]
    fn test_mixed_styles_last_event_wins_template() {
        let mut doc = SettingsDocument::default();
        let sounds = &mut doc.global_settings.event_sounds;
        sounds.set(EventKind::Notification, SoundSelector::Voice(VoiceStyle::Project));
        sounds.set(EventKind::SubagentStop, SoundSelector::Voice(VoiceStyle::Simple));

        normalize_document(&mut doc);

        assert_eq!(doc.global_settings.voice_template, SIMPLE_VOICE_TEMPLATE);
        assert!(doc.global_settings.voice_enabled.notification);
    }

    #[test]
    fn test_file_selector_turns_voice_off() {
        let mut doc = SettingsDocument::default();
        doc.global_settings
            .event_sounds
            .set(EventKind::Stop, SoundSelector::file("/tmp/custom.aiff"));

        normalize_document(&mut doc);

        assert!(!doc.global_settings.voice_enabled.stop);
        assert_eq!(
            doc.global_settings.event_sounds.stop,
            SoundSelector::file("/tmp/custom.aiff")
        );
    }

    #[test]
    fn test_project_scope_gets_its_own_template() {
        let mut doc = SettingsDocument::default();
        let mut project = ProjectEntry::new("/tmp/proj");
        project.event_sounds = EventMap::from_fn(|_| SoundSelector::Voice(VoiceStyle::Project));
        doc.projects.push(project);

        normalize_document(&mut doc);

        let project = &doc.projects[0];
        assert_eq!(project.voice_template.as_deref(), Some(PROJECT_VOICE_TEMPLATE));
        assert_eq!(doc.global_settings.voice_template, SIMPLE_VOICE_TEMPLATE);
        assert_eq!(
            ui_selector(
                &project.event_sounds,
                &project.voice_enabled,
                project.effective_template(&doc.global_settings),
                EventKind::Stop
            )
            .to_string(),
            "voice:project"
        );
    }

    #[test]
    fn test_render_template() {
        assert_eq!(
            render_template(PROJECT_VOICE_TEMPLATE, EventKind::PreToolUse, Some("api")),
            "The pre tool use event was run for the api project"
        );
        assert_eq!(
            render_template(SIMPLE_VOICE_TEMPLATE, EventKind::SubagentStop, None),
            "subagent stop event"
        );
        assert_eq!(
            render_template(PROJECT_VOICE_TEMPLATE, EventKind::Stop, None),
            "The stop event was run for the project"
        );
        assert_eq!(SoundSelector::parse(VOICE_SIMPLE).to_string(), VOICE_SIMPLE);
    }
}
