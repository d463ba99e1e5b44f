//! Fire-and-forget audio playback through `afplay`

use std::path::Path;
use std::process::Command;

/// Start playing an audio file and return without waiting for it to finish.
pub fn play_file(path: &Path) -> Result<(), String> {
    if !cfg!(target_os = "macos") {
        return Err("Sound playback is only supported on macOS".to_string());
    }
    if !path.exists() {
        return Err(format!("Sound file not found: {}", path.display()));
    }

    Command::new("afplay")
        .arg(path)
        .spawn()
        .map_err(|e| format!("Failed to play sound: {}", e))?;
    log::debug!("Playing {:?}", path);
    Ok(())
}

/// Speak text directly with the system voice, without caching a file.
pub fn speak(text: &str) -> Result<(), String> {
    if !cfg!(target_os = "macos") {
        return Err("Speech is only supported on macOS".to_string());
    }

    Command::new("say")
        .arg(text)
        .spawn()
        .map_err(|e| format!("Failed to speak: {}", e))?;
    Ok(())
}

/// Open a file with its default application.
pub fn open_file(path: &Path) -> Result<(), String> {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    Command::new(opener)
        .arg(path)
        .spawn()
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    Ok(())
}
