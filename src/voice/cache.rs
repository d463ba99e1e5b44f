use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{VoiceError, VoiceSynth};
use crate::config::model::SIMPLE_VOICE_TEMPLATE;
use crate::config::voice_select::render_template;
use crate::config::{EventKind, EventMap, SettingsDocument};
use crate::paths::ClaudePaths;

const VOICE_EXTENSIONS: [&str; 2] = ["mp3", "aiff"];

/// Hex SHA-256, used to name per-project and preview cache entries.
pub fn hash_string(s: &str) -> String {
    format!("{:x}", Sha256::digest(s.as_bytes()))
}

fn existing_voice_file(dir: &Path, kind: EventKind) -> Option<PathBuf> {
    VOICE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", kind.key(), ext)))
        .find(|path| path.exists())
}

/// Rendered voice file for an event, global when `project_path` is `None`.
pub fn voice_file_for(
    paths: &ClaudePaths,
    project_path: Option<&str>,
    kind: EventKind,
) -> Option<PathBuf> {
    match project_path {
        Some(path) => existing_voice_file(&paths.project_voices_dir(&hash_string(path)), kind),
        None => existing_voice_file(&paths.global_voices_dir(), kind),
    }
}

/// Cached preview rendering of arbitrary text.
pub fn preview_file(paths: &ClaudePaths, text: &str) -> Option<PathBuf> {
    let hash = hash_string(text);
    VOICE_EXTENSIONS
        .iter()
        .map(|ext| paths.preview_voices_dir().join(format!("{}.{}", hash, ext)))
        .find(|path| path.exists())
}

pub fn preview_file_target(paths: &ClaudePaths, text: &str, synth: &dyn VoiceSynth) -> PathBuf {
    paths
        .preview_voices_dir()
        .join(format!("{}.{}", hash_string(text), synth.extension()))
}

fn render_scope(
    dir: &Path,
    voice_enabled: &EventMap<bool>,
    template: &str,
    project: Option<&str>,
    synth: &dyn VoiceSynth,
) -> Result<usize, VoiceError> {
    fs::create_dir_all(dir)?;
    let mut generated = 0;

    for (kind, enabled) in voice_enabled.iter() {
        if !*enabled {
            continue;
        }
        let text = render_template(template, kind, project);
        let dest = dir.join(format!("{}.{}", kind.key(), synth.extension()));
        synth.synthesize(&text, &dest)?;

        // A file from another provider would shadow the new one on lookup.
        for ext in VOICE_EXTENSIONS.iter().filter(|ext| **ext != synth.extension()) {
            let stale = dir.join(format!("{}.{}", kind.key(), ext));
            if stale.exists() {
                fs::remove_file(&stale)?;
            }
        }
        generated += 1;
    }

    Ok(generated)
}

/// Render every voice-enabled event of the (normalized) document to disk.
///
/// Returns the number of files written.
pub fn generate_voice_notifications(
    doc: &SettingsDocument,
    paths: &ClaudePaths,
    synth: &dyn VoiceSynth,
) -> Result<usize, VoiceError> {
    let global = &doc.global_settings;
    let mut generated = 0;

    if doc.global_mode {
        generated += render_scope(
            &paths.global_voices_dir(),
            &global.voice_enabled,
            &global.voice_template,
            None,
            synth,
        )?;
    }

    for project in &doc.projects {
        generated += render_scope(
            &paths.project_voices_dir(&hash_string(&project.path)),
            &project.voice_enabled,
            project.effective_template(global),
            Some(project.label()),
            synth,
        )?;
    }

    log::info!("Generated {} voice notifications", generated);
    Ok(generated)
}

/// Render the basic "<event> event" phrases into the preview cache.
///
/// Phrases already cached (by any provider) are skipped. Returns the number of
/// files written.
pub fn pregenerate_basic_voices(
    paths: &ClaudePaths,
    synth: &dyn VoiceSynth,
) -> Result<usize, VoiceError> {
    fs::create_dir_all(paths.preview_voices_dir())?;
    let mut generated = 0;

    for kind in EventKind::ALL {
        let text = render_template(SIMPLE_VOICE_TEMPLATE, kind, None);
        if preview_file(paths, &text).is_some() {
            log::debug!("Skipping '{}', already cached", text);
            continue;
        }
        synth.synthesize(&text, &preview_file_target(paths, &text, synth))?;
        generated += 1;
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectEntry;
    use std::cell::RefCell;

    struct RecordingSynth {
        spoken: RefCell<Vec<String>>,
    }

    impl VoiceSynth for RecordingSynth {
        fn extension(&self) -> &'static str {
            "aiff"
        }

        fn synthesize(&self, text: &str, dest: &Path) -> Result<(), VoiceError> {
            self.spoken.borrow_mut().push(text.to_string());
            fs::write(dest, text)?;
            Ok(())
        }
    }

    #[test]
    fn test_hash_string_is_sha256_hex() {
        assert_eq!(
            hash_string("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generates_global_and_project_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ClaudePaths::new(dir.path());
        let synth = RecordingSynth {
            spoken: RefCell::new(Vec::new()),
        };
        let mut doc = SettingsDocument::default();
        let mut project = ProjectEntry::new("/work/api");
        project.voice_template = Some("{event} in {project}".to_string());
        project.voice_enabled = EventMap::from_fn(|kind| kind == EventKind::Stop);
        doc.projects.push(project);

        let count = generate_voice_notifications(&doc, &paths, &synth).expect("generate");

        // Defaults voice three global events; the project voices one.
        assert_eq!(count, 4);
        assert!(voice_file_for(&paths, None, EventKind::Notification).is_some());
        assert!(voice_file_for(&paths, None, EventKind::PreToolUse).is_none());
        assert!(voice_file_for(&paths, Some("/work/api"), EventKind::Stop).is_some());
        assert!(synth.spoken.borrow().contains(&"stop in api".to_string()));
    }

    #[test]
    fn test_pregenerate_basic_voices_skips_cached_phrases() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = ClaudePaths::new(dir.path());
        let synth = RecordingSynth {
            spoken: RefCell::new(Vec::new()),
        };
        fs::create_dir_all(paths.preview_voices_dir()).expect("mkdir");
        fs::write(
            paths.preview_voices_dir().join(format!("{}.mp3", hash_string("stop event"))),
            b"cached",
        )
        .expect("write");

        assert_eq!(pregenerate_basic_voices(&paths, &synth).expect("pregenerate"), 4);
        assert!(!synth.spoken.borrow().contains(&"stop event".to_string()));
        assert!(preview_file(&paths, "pre tool use event").is_some());

        assert_eq!(pregenerate_basic_voices(&paths, &synth).expect("pregenerate"), 0);
    }
}
