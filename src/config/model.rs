//! Settings document persisted in `audio-notifier.yaml`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub const VOICE_PREFIX: &str = "voice:";
pub const VOICE_SIMPLE: &str = "voice:simple";
pub const VOICE_PROJECT: &str = "voice:project";

pub const SIMPLE_VOICE_TEMPLATE: &str = "{event} event";
pub const PROJECT_VOICE_TEMPLATE: &str = "The {event} event was run for the {project} project";

/// Sound written in place of a `voice:*` selector at save time. Inert while voice is enabled.
pub const VOICE_FALLBACK_SOUND: &str = "/System/Library/Sounds/Ping.aiff";

pub const DEFAULT_MIN_INTERVAL: u32 = 2;
pub const DEFAULT_VOICE_PROVIDER: &str = "system";

/// Built-in macOS sounds seeded into the sound library.
pub const SYSTEM_SOUNDS: [&str; 12] = [
    "/System/Library/Sounds/Ping.aiff",
    "/System/Library/Sounds/Glass.aiff",
    "/System/Library/Sounds/Hero.aiff",
    "/System/Library/Sounds/Submarine.aiff",
    "/System/Library/Sounds/Tink.aiff",
    "/System/Library/Sounds/Pop.aiff",
    "/System/Library/Sounds/Funk.aiff",
    "/System/Library/Sounds/Purr.aiff",
    "/System/Library/Sounds/Blow.aiff",
    "/System/Library/Sounds/Bottle.aiff",
    "/System/Library/Sounds/Frog.aiff",
    "/System/Library/Sounds/Basso.aiff",
];

/// Lifecycle moments of Claude Code that can trigger a notification.
///
/// Serialized with Claude Code's hook names (`PreToolUse`, ...), which is how
/// the installation manifest records them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EventKind {
    Notification,
    Stop,
    PreToolUse,
    PostToolUse,
    SubagentStop,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Notification,
        EventKind::Stop,
        EventKind::PreToolUse,
        EventKind::PostToolUse,
        EventKind::SubagentStop,
    ];

    /// Key used in the settings document and on the hook script command line.
    pub fn key(self) -> &'static str {
        match self {
            EventKind::Notification => "notification",
            EventKind::Stop => "stop",
            EventKind::PreToolUse => "pre_tool_use",
            EventKind::PostToolUse => "post_tool_use",
            EventKind::SubagentStop => "subagent_stop",
        }
    }

    /// Hook group name in Claude Code's `settings.json`.
    pub fn hook_name(self) -> &'static str {
        match self {
            EventKind::Notification => "Notification",
            EventKind::Stop => "Stop",
            EventKind::PreToolUse => "PreToolUse",
            EventKind::PostToolUse => "PostToolUse",
            EventKind::SubagentStop => "SubagentStop",
        }
    }

    /// Name substituted for `{event}` in voice templates.
    pub fn spoken_name(self) -> &'static str {
        match self {
            EventKind::Notification => "notification",
            EventKind::Stop => "stop",
            EventKind::PreToolUse => "pre tool use",
            EventKind::PostToolUse => "post tool use",
            EventKind::SubagentStop => "subagent stop",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn from_hook_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.hook_name() == name)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
            .or_else(|| Self::from_hook_name(s))
            .ok_or_else(|| format!("Unknown event '{}'", s))
    }
}

/// Which voice phrasing a `voice:*` selector asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceStyle {
    Simple,
    Project,
    /// Any other `voice:` suffix. Still a voice event, but carries no template.
    Other(String),
}

/// A sound choice: an audio file path or a reserved `voice:*` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SoundSelector {
    File(String),
    Voice(VoiceStyle),
}

impl SoundSelector {
    pub fn file(path: impl Into<String>) -> Self {
        SoundSelector::File(path.into())
    }

    pub fn parse(value: &str) -> Self {
        match value.strip_prefix(VOICE_PREFIX) {
            Some("simple") => SoundSelector::Voice(VoiceStyle::Simple),
            Some("project") => SoundSelector::Voice(VoiceStyle::Project),
            Some(other) => SoundSelector::Voice(VoiceStyle::Other(other.to_string())),
            None => SoundSelector::File(value.to_string()),
        }
    }

    pub fn is_voice(&self) -> bool {
        matches!(self, SoundSelector::Voice(_))
    }

    /// File path, if this selector names one.
    pub fn as_file(&self) -> Option<&str> {
        match self {
            SoundSelector::File(path) => Some(path),
            SoundSelector::Voice(_) => None,
        }
    }
}

impl fmt::Display for SoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundSelector::File(path) => f.write_str(path),
            SoundSelector::Voice(VoiceStyle::Simple) => f.write_str(VOICE_SIMPLE),
            SoundSelector::Voice(VoiceStyle::Project) => f.write_str(VOICE_PROJECT),
            SoundSelector::Voice(VoiceStyle::Other(suffix)) => {
                write!(f, "{}{}", VOICE_PREFIX, suffix)
            }
        }
    }
}

impl From<String> for SoundSelector {
    fn from(value: String) -> Self {
        SoundSelector::parse(&value)
    }
}

impl From<SoundSelector> for String {
    fn from(selector: SoundSelector) -> Self {
        selector.to_string()
    }
}

/// Per-event default used to fill gaps in partially written event maps.
pub trait EventDefault: Sized {
    fn event_default(kind: EventKind) -> Self;
}

impl EventDefault for bool {
    fn event_default(kind: EventKind) -> Self {
        !matches!(kind, EventKind::PreToolUse | EventKind::PostToolUse)
    }
}

impl EventDefault for SoundSelector {
    fn event_default(_kind: EventKind) -> Self {
        SoundSelector::Voice(VoiceStyle::Simple)
    }
}

/// One value per [`EventKind`], stored under the event keys in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMap<T> {
    pub notification: T,
    pub stop: T,
    pub pre_tool_use: T,
    pub post_tool_use: T,
    pub subagent_stop: T,
}

impl<T> EventMap<T> {
    pub fn from_fn(mut f: impl FnMut(EventKind) -> T) -> Self {
        EventMap {
            notification: f(EventKind::Notification),
            stop: f(EventKind::Stop),
            pre_tool_use: f(EventKind::PreToolUse),
            post_tool_use: f(EventKind::PostToolUse),
            subagent_stop: f(EventKind::SubagentStop),
        }
    }

    pub fn get(&self, kind: EventKind) -> &T {
        match kind {
            EventKind::Notification => &self.notification,
            EventKind::Stop => &self.stop,
            EventKind::PreToolUse => &self.pre_tool_use,
            EventKind::PostToolUse => &self.post_tool_use,
            EventKind::SubagentStop => &self.subagent_stop,
        }
    }

    pub fn get_mut(&mut self, kind: EventKind) -> &mut T {
        match kind {
            EventKind::Notification => &mut self.notification,
            EventKind::Stop => &mut self.stop,
            EventKind::PreToolUse => &mut self.pre_tool_use,
            EventKind::PostToolUse => &mut self.post_tool_use,
            EventKind::SubagentStop => &mut self.subagent_stop,
        }
    }

    pub fn set(&mut self, kind: EventKind, value: T) {
        *self.get_mut(kind) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventKind, &T)> + '_ {
        EventKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl<T: EventDefault> EventMap<T> {
    pub fn defaults() -> Self {
        Self::from_fn(T::event_default)
    }
}

impl<T: EventDefault> Default for EventMap<T> {
    fn default() -> Self {
        Self::defaults()
    }
}

impl EventMap<bool> {
    pub fn any(&self) -> bool {
        self.iter().any(|(_, enabled)| *enabled)
    }
}

/// Missing `Option` fields deserialize as `None`; the gaps are filled per event below.
#[derive(Deserialize)]
struct PartialEventMap<T> {
    notification: Option<T>,
    stop: Option<T>,
    pre_tool_use: Option<T>,
    post_tool_use: Option<T>,
    subagent_stop: Option<T>,
}

impl<'de, T> Deserialize<'de> for EventMap<T>
where
    T: Deserialize<'de> + EventDefault,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let partial = PartialEventMap::<T>::deserialize(deserializer)?;
        let fill = |value: Option<T>, kind| value.unwrap_or_else(|| T::event_default(kind));
        Ok(EventMap {
            notification: fill(partial.notification, EventKind::Notification),
            stop: fill(partial.stop, EventKind::Stop),
            pre_tool_use: fill(partial.pre_tool_use, EventKind::PreToolUse),
            post_tool_use: fill(partial.post_tool_use, EventKind::PostToolUse),
            subagent_stop: fill(partial.subagent_stop, EventKind::SubagentStop),
        })
    }
}

/// Process-wide notification defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Derived at save time: true when any event is enabled.
    pub enabled: bool,
    pub event_sounds: EventMap<SoundSelector>,
    pub event_enabled: EventMap<bool>,
    pub voice_enabled: EventMap<bool>,
    pub voice_template: String,
    pub voice_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fish_audio_api_key: Option<String>,
    pub respect_do_not_disturb: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            enabled: true,
            event_sounds: EventMap::defaults(),
            event_enabled: EventMap::defaults(),
            voice_enabled: EventMap::defaults(),
            voice_template: SIMPLE_VOICE_TEMPLATE.to_string(),
            voice_provider: DEFAULT_VOICE_PROVIDER.to_string(),
            voice_id: None,
            fish_audio_api_key: None,
            respect_do_not_disturb: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-project override of the global event preferences, keyed by directory path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub path: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub event_sounds: EventMap<SoundSelector>,
    #[serde(default)]
    pub event_enabled: EventMap<bool>,
    #[serde(default)]
    pub voice_enabled: EventMap<bool>,
    /// Project-scoped template; the global template applies when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_template: Option<String>,
}

impl ProjectEntry {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let display_name = last_path_segment(&path).map(str::to_string);
        ProjectEntry {
            path,
            display_name,
            enabled: true,
            event_sounds: EventMap::defaults(),
            event_enabled: EventMap::defaults(),
            voice_enabled: EventMap::defaults(),
            voice_template: None,
        }
    }

    /// Label shown to the user and spoken for `{project}`.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| last_path_segment(&self.path))
            .unwrap_or(&self.path)
    }

    pub fn effective_template<'a>(&'a self, global: &'a GlobalSettings) -> &'a str {
        self.voice_template
            .as_deref()
            .unwrap_or(&global.voice_template)
    }
}

fn last_path_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Root aggregate of the notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    pub global_mode: bool,
    pub global_settings: GlobalSettings,
    pub projects: Vec<ProjectEntry>,
    pub sound_library: Vec<String>,
    /// Seconds between repeated notifications.
    pub min_interval: u32,
    pub debug: bool,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        SettingsDocument {
            global_mode: true,
            global_settings: GlobalSettings::default(),
            projects: Vec::new(),
            sound_library: SYSTEM_SOUNDS.iter().map(|s| s.to_string()).collect(),
            min_interval: DEFAULT_MIN_INTERVAL,
            debug: false,
        }
    }
}

impl SettingsDocument {
    pub fn project(&self, path: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|p| p.path == path)
    }

    pub fn project_mut(&mut self, path: &str) -> Option<&mut ProjectEntry> {
        self.projects.iter_mut().find(|p| p.path == path)
    }

    /// Drop entries that must never appear in the sound library.
    pub fn sanitize(&mut self) {
        let before = self.sound_library.len();
        self.sound_library
            .retain(|sound| !sound.starts_with(VOICE_PREFIX) && !sound.trim().is_empty());
        if self.sound_library.len() != before {
            log::warn!(
                "Removed {} invalid entries from the sound library",
                before - self.sound_library.len()
            );
        }
    }
}
