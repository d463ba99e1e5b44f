use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use serde_json::json;

use super::test_helpers::{read_claude_settings, temp_claude_dir, user_hook, write_claude_settings};
use crate::commands;
use crate::config::{load_or_default, EventKind, YamlFileStore};
use crate::install::hooks::{all_notify_hooks_present, hook_contains_notification_script};
use crate::install::{installation_info, HookInstaller};
use crate::lifecycle::{Installer, Lifecycle, StartupOutcome};
use crate::paths::ClaudePaths;

fn installer(paths: &ClaudePaths) -> HookInstaller {
    HookInstaller::new(paths.clone(), PathBuf::from("/opt/audio-notifier/bin/audio-notifier"))
}

#[test]
fn test_install_then_query() {
    let (_dir, paths) = temp_claude_dir();
    let installer = installer(&paths);

    let message = installer.install().unwrap();

    assert!(message.starts_with("Installation complete!"));
    assert!(installer.sounds_enabled().unwrap());
    assert!(!installer.was_uninstalled().unwrap());
    assert!(installer.is_installed().unwrap());
    assert!(all_notify_hooks_present(&read_claude_settings(&paths)));

    let script = paths.notify_script();
    #[cfg(unix)]
    {
        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
    let content = fs::read_to_string(&script).unwrap();
    assert!(content.contains("/opt/audio-notifier/bin/audio-notifier"));

    let manifest = installation_info(&paths).unwrap();
    assert_eq!(manifest.changes.hooks_added, EventKind::ALL.to_vec());
    assert!(manifest.changes.existing_hooks_preserved.is_empty());
    assert!(paths.settings_document().exists());
}

#[test]
fn test_install_is_idempotent() {
    let (_dir, paths) = temp_claude_dir();
    let installer = installer(&paths);

    installer.install().unwrap();
    let first = read_claude_settings(&paths);
    installer.install().unwrap();
    let second = read_claude_settings(&paths);

    assert_eq!(first, second);
    for kind in EventKind::ALL {
        let entries = second["hooks"][kind.hook_name()].as_array().unwrap();
        assert_eq!(entries.len(), 1);
    }
}

#[test]
fn test_install_preserves_foreign_hooks_and_settings() {
    let (_dir, paths) = temp_claude_dir();
    write_claude_settings(
        &paths,
        &json!({
            "model": "opus",
            "hooks": {
                "Stop": [user_hook("say finished")],
                "PreCompact": [user_hook("echo compacting")]
            }
        }),
    );

    let message = installer(&paths).install().unwrap();

    assert!(message.contains("Existing hooks preserved"));
    let settings = read_claude_settings(&paths);
    assert_eq!(settings["model"], "opus");
    assert_eq!(settings["hooks"]["PreCompact"], json!([user_hook("echo compacting")]));
    let stop = settings["hooks"]["Stop"].as_array().unwrap();
    assert_eq!(stop.len(), 2);
    assert!(stop.contains(&user_hook("say finished")));

    let manifest = installation_info(&paths).unwrap();
    let mut preserved = manifest.changes.existing_hooks_preserved.clone();
    preserved.sort();
    assert_eq!(preserved, vec!["PreCompact".to_string(), "Stop".to_string()]);
    assert!(PathBuf::from(&manifest.backup_path).exists());
}

#[test]
fn test_install_keeps_existing_settings_document() {
    let (_dir, paths) = temp_claude_dir();
    fs::write(paths.settings_document(), "min_interval: 9\n").unwrap();

    installer(&paths).install().unwrap();

    assert_eq!(
        fs::read_to_string(paths.settings_document()).unwrap(),
        "min_interval: 9\n"
    );
}

#[test]
fn test_failed_install_rolls_back() {
    let (_dir, paths) = temp_claude_dir();
    let original = json!({"hooks": {"Stop": [user_hook("say finished")]}});
    write_claude_settings(&paths, &original);
    fs::write(paths.uninstalled_marker(), "").unwrap();
    // A directory where the manifest should go makes the last step fail
    fs::create_dir_all(paths.manifest()).unwrap();

    let err = installer(&paths).install().unwrap_err();

    assert!(err.contains("manifest"));
    assert_eq!(read_claude_settings(&paths), original);
    assert!(!paths.notify_script().exists());
    assert!(!paths.uninstall_script().exists());
    assert!(!paths.sounds_enabled_marker().exists());
    assert!(!paths.settings_document().exists());
    assert!(paths.uninstalled_marker().exists());
}

#[test]
fn test_install_rejects_unparseable_settings() {
    let (_dir, paths) = temp_claude_dir();
    fs::write(paths.claude_settings(), "{ not json").unwrap();

    let err = installer(&paths).install().unwrap_err();

    assert!(err.contains("Failed to parse settings.json"));
    assert_eq!(fs::read_to_string(paths.claude_settings()).unwrap(), "{ not json");
    assert!(!paths.sounds_enabled_marker().exists());
}

#[test]
fn test_uninstall_then_query() {
    let (_dir, paths) = temp_claude_dir();
    write_claude_settings(&paths, &json!({"hooks": {"Stop": [user_hook("say finished")]}}));
    let installer = installer(&paths);
    installer.install().unwrap();
    fs::create_dir_all(paths.global_voices_dir()).unwrap();
    fs::write(paths.global_voices_dir().join("stop.aiff"), b"x").unwrap();
    fs::write(paths.settings_document(), "debug: true\n").unwrap();

    let summary = installer.uninstall().unwrap();

    assert!(summary.contains("Removed 5 hooks and deleted 4 files."));
    assert!(summary.contains("Backup created at:"));
    assert!(summary.contains("Stop"));
    assert!(!installer.sounds_enabled().unwrap());
    assert!(installer.was_uninstalled().unwrap());
    assert!(!installer.is_installed().unwrap());

    let settings = read_claude_settings(&paths);
    assert_eq!(settings["hooks"], json!({"Stop": [user_hook("say finished")]}));
    assert!(!paths.notify_script().exists());
    assert!(!paths.global_voices_dir().exists());
    assert_eq!(
        fs::read_to_string(paths.settings_document()).unwrap(),
        "debug: true\n"
    );

    // The manifest stays queryable through the uninstall record
    let manifest = installation_info(&paths).unwrap();
    assert_eq!(manifest.changes.existing_hooks_preserved, vec!["Stop".to_string()]);
    let backup = commands::get_backup_path(&paths).unwrap();
    assert!(PathBuf::from(&backup).exists());

    // Relaunch does not reinstall
    let mut lifecycle = Lifecycle::new(installer);
    assert_eq!(lifecycle.check_and_install(), StartupOutcome::RespectedUninstall);
    assert!(!paths.sounds_enabled_marker().exists());
}

#[test]
fn test_uninstall_without_manifest_fails() {
    let (_dir, paths) = temp_claude_dir();
    let err = installer(&paths).uninstall().unwrap_err();
    assert!(err.contains("Installation manifest not found"));
    assert!(!paths.uninstalled_marker().exists());
}

#[test]
fn test_reinstall_after_uninstall_clears_marker() {
    let (_dir, paths) = temp_claude_dir();
    let installer = installer(&paths);
    installer.install().unwrap();
    installer.uninstall().unwrap();

    installer.install().unwrap();

    assert!(installer.sounds_enabled().unwrap());
    assert!(!installer.was_uninstalled().unwrap());
}

#[test]
fn test_startup_installs_into_fresh_directory() {
    let (_dir, paths) = temp_claude_dir();
    let mut lifecycle = Lifecycle::new(installer(&paths));

    assert!(matches!(lifecycle.check_and_install(), StartupOutcome::Installed(_)));
    let doc = load_or_default(&YamlFileStore::new(paths.settings_document()));
    assert_eq!(doc.min_interval, 2);
    assert_eq!(lifecycle.check_and_install(), StartupOutcome::AlreadyChecked);
}

#[test]
fn test_dev_reset_removes_only_our_traces() {
    let (_dir, paths) = temp_claude_dir();
    write_claude_settings(&paths, &json!({"hooks": {"Stop": [user_hook("say finished")]}}));
    installer(&paths).install().unwrap();

    commands::dev_reset_install(&paths).unwrap();

    assert!(!paths.sounds_enabled_marker().exists());
    assert!(!paths.settings_document().exists());
    assert!(!paths.manifest().exists());
    assert!(!paths.notify_script().exists());
    let settings = read_claude_settings(&paths);
    let stop = settings["hooks"]["Stop"].as_array().unwrap();
    assert_eq!(stop.len(), 1);
    assert!(!hook_contains_notification_script(&stop[0]));
}

#[test]
fn test_sound_switch_and_custom_sounds() {
    let (dir, paths) = temp_claude_dir();

    assert!(commands::toggle_sounds(&paths).unwrap());
    assert!(commands::get_sounds_enabled(&paths).unwrap());
    assert!(!commands::toggle_sounds(&paths).unwrap());

    let source = dir.path().join("Airhorn.mp3");
    fs::write(&source, b"mp3").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let dest = commands::upload_sound(&paths, &source).unwrap();
    assert!(dest.ends_with("sounds/Airhorn.mp3"));
    assert!(commands::upload_sound(&paths, &dir.path().join("notes.txt")).is_err());
    assert_eq!(commands::list_custom_sounds(&paths).unwrap(), vec![dest]);
}

#[test]
fn test_log_file_is_the_one_hooks_write() {
    let (_dir, paths) = temp_claude_dir();
    installer(&paths).install().unwrap();
    assert!(commands::hook_log_path(&paths).is_err());

    // smart-notify.sh appends one line per hook run
    let script = fs::read_to_string(paths.notify_script()).unwrap();
    assert!(script.contains("hook-execution.log"));
    fs::write(paths.hook_execution_log(), "[2026-01-01 10:00:00] stop cwd=/work\n").unwrap();

    assert_eq!(
        commands::hook_log_path(&paths).unwrap(),
        paths.hook_execution_log()
    );
}
