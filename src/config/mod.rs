//! Notification settings: document model, persistence and voice-selector normalization

mod errors;
pub mod model;
pub mod storage;
pub mod voice_select;

pub use errors::ConfigError;
pub use model::{
    EventKind, EventMap, GlobalSettings, ProjectEntry, SettingsDocument, SoundSelector,
    VoiceStyle,
};
pub use storage::{load_or_default, SettingsStore, YamlFileStore};
