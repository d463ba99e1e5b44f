//! Sound and voice preview commands

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::SIMPLE_VOICE_TEMPLATE;
use crate::config::voice_select::render_template;
use crate::config::EventKind;
use crate::paths::ClaudePaths;
use crate::playback;
use crate::voice::cache::{self, preview_file, preview_file_target};
use crate::voice::{voice_file_for, FishAudioSynth, SayCommand, VoiceSynth};

pub fn preview_sound(sound_path: &Path) -> Result<(), String> {
    playback::play_file(sound_path)
}

fn preview_synth(api_key: Option<String>) -> Box<dyn VoiceSynth> {
    match api_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => Box::new(FishAudioSynth::new(key, None)),
        None => Box::new(SayCommand),
    }
}

/// Where a preview of `text` can be played from without synthesizing, if anywhere.
pub fn cached_voice_preview(paths: &ClaudePaths, text: &str) -> Option<PathBuf> {
    // Basic "<event> event" phrases match the installed global voices
    let basic_event = EventKind::ALL
        .into_iter()
        .find(|kind| render_template(SIMPLE_VOICE_TEMPLATE, *kind, None) == text);
    if let Some(kind) = basic_event {
        if let Some(file) = voice_file_for(paths, None, kind) {
            return Some(file);
        }
    }

    preview_file(paths, text)
}

/// Speak `text`: from the voice cache when possible, otherwise synthesize and cache it first
pub fn preview_voice(
    paths: &ClaudePaths,
    text: &str,
    api_key: Option<String>,
) -> Result<(), String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Nothing to preview".to_string());
    }

    if let Some(file) = cached_voice_preview(paths, text) {
        log::debug!("Playing cached voice preview {:?}", file);
        return playback::play_file(&file);
    }

    let synth = preview_synth(api_key);
    let target = preview_file_target(paths, text, synth.as_ref());
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(|e| format!("Failed to create cache directory: {}", e))?;
    }
    synth
        .synthesize(text, &target)
        .map_err(|e| format!("Failed to generate voice: {}", e))?;

    playback::play_file(&target)
}

/// Cache the five basic "<event> event" previews so they play without a delay
pub fn pregenerate_basic_voices(
    paths: &ClaudePaths,
    api_key: Option<String>,
) -> Result<String, String> {
    let synth = preview_synth(api_key);
    let generated = cache::pregenerate_basic_voices(paths, synth.as_ref())
        .map_err(|e| format!("Failed to pre-generate voices: {}", e))?;
    Ok(format!("Pre-generated {} basic voice files", generated))
}
