//! Voice synthesis and the on-disk voice cache
//!
//! - `synth`: text-to-speech providers (macOS `say`, Fish Audio)
//! - `cache`: where rendered voice files live and how they are (re)generated

pub mod cache;
pub mod synth;

use thiserror::Error;

use crate::config::SettingsDocument;
use crate::paths::ClaudePaths;

pub use cache::{generate_voice_notifications, hash_string, voice_file_for};
pub use synth::{synth_for_settings, FishAudioSynth, SayCommand, VoiceSynth};

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("voice file IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("'say' command failed: {0}")]
    Say(String),
    #[error("Fish Audio API error: {0}")]
    FishAudio(String),
    #[error("{0}")]
    Unsupported(String),
}

/// Renders the voice files a saved document needs.
pub trait VoiceGenerator {
    fn generate(&self, doc: &SettingsDocument) -> Result<usize, VoiceError>;
}

/// Voice files under the Claude directory, rendered with the document's configured provider.
#[derive(Debug, Clone)]
pub struct VoiceCache {
    paths: ClaudePaths,
    api_key: Option<String>,
}

impl VoiceCache {
    pub fn new(paths: ClaudePaths, api_key: Option<String>) -> Self {
        Self { paths, api_key }
    }
}

impl VoiceGenerator for VoiceCache {
    fn generate(&self, doc: &SettingsDocument) -> Result<usize, VoiceError> {
        let synth = synth_for_settings(&doc.global_settings, self.api_key.as_deref());
        generate_voice_notifications(doc, &self.paths, synth.as_ref())
    }
}
