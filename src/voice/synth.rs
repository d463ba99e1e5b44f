use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::VoiceError;
use crate::config::GlobalSettings;

const FISH_AUDIO_TTS_URL: &str = "https://api.fish.audio/v1/tts";
const FISH_AUDIO_DEFAULT_VOICE: &str = "af_bella";

/// Renders text to an audio file.
pub trait VoiceSynth {
    /// File extension of the audio this provider writes.
    fn extension(&self) -> &'static str;

    fn synthesize(&self, text: &str, dest: &Path) -> Result<(), VoiceError>;
}

/// macOS `say -o <file> <text>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SayCommand;

impl VoiceSynth for SayCommand {
    fn extension(&self) -> &'static str {
        "aiff"
    }

    fn synthesize(&self, text: &str, dest: &Path) -> Result<(), VoiceError> {
        if !cfg!(target_os = "macos") {
            return Err(VoiceError::Unsupported(
                "System TTS is only supported on macOS".to_string(),
            ));
        }

        let output = Command::new("say")
            .arg("-o")
            .arg(dest)
            .arg(text)
            .output()
            .map_err(|e| VoiceError::Say(format!("failed to run: {}", e)))?;

        if !output.status.success() {
            return Err(VoiceError::Say(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Fish Audio cloud TTS, returning MP3.
#[derive(Debug, Clone)]
pub struct FishAudioSynth {
    api_key: String,
    voice_id: Option<String>,
}

impl FishAudioSynth {
    pub fn new(api_key: impl Into<String>, voice_id: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            voice_id,
        }
    }
}

impl VoiceSynth for FishAudioSynth {
    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn synthesize(&self, text: &str, dest: &Path) -> Result<(), VoiceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VoiceError::FishAudio(format!("failed to build client: {}", e)))?;

        let voice = self.voice_id.as_deref().unwrap_or(FISH_AUDIO_DEFAULT_VOICE);
        let response = client
            .post(FISH_AUDIO_TTS_URL)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "text": text,
                "reference_id": voice,
                "format": "mp3",
                "latency": "normal"
            }))
            .send()
            .map_err(|e| VoiceError::FishAudio(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VoiceError::FishAudio(format!("{}: {}", status, body)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| VoiceError::FishAudio(format!("failed to read response: {}", e)))?;
        std::fs::write(dest, &bytes)?;
        Ok(())
    }
}

fn is_fish_audio(provider: &str) -> bool {
    matches!(provider, "fish_audio" | "fish-audio")
}

/// Pick the provider configured in the global settings.
///
/// `api_key_override` (e.g. typed into the editor but not yet saved) wins over
/// the stored key. Fish Audio without any key falls back to `say`.
pub fn synth_for_settings(
    settings: &GlobalSettings,
    api_key_override: Option<&str>,
) -> Box<dyn VoiceSynth> {
    let api_key = api_key_override
        .or(settings.fish_audio_api_key.as_deref())
        .filter(|key| !key.trim().is_empty());

    match api_key {
        Some(key) if is_fish_audio(&settings.voice_provider) || api_key_override.is_some() => {
            Box::new(FishAudioSynth::new(key, settings.voice_id.clone()))
        }
        _ => {
            if is_fish_audio(&settings.voice_provider) {
                log::warn!("Fish Audio selected without an API key, using system voice");
            }
            Box::new(SayCommand)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_selection() {
        let mut settings = GlobalSettings::default();
        assert_eq!(synth_for_settings(&settings, None).extension(), "aiff");

        settings.voice_provider = "fish_audio".to_string();
        assert_eq!(synth_for_settings(&settings, None).extension(), "aiff");

        settings.fish_audio_api_key = Some("key".to_string());
        assert_eq!(synth_for_settings(&settings, None).extension(), "mp3");

        settings.voice_provider = "system".to_string();
        assert_eq!(synth_for_settings(&settings, None).extension(), "aiff");
        assert_eq!(synth_for_settings(&settings, Some("typed")).extension(), "mp3");
    }
}
