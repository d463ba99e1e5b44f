//! Command-line front end

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::app::App;
use crate::commands;
use crate::config::storage::parse_document;
use crate::config::{EventKind, SoundSelector, YamlFileStore};
use crate::editor::{sound_display_name, SaveOutcome, Scope, SettingsEditor};
use crate::install::HookInstaller;
use crate::lifecycle::{InstallAffordance, StartupOutcome, ToggleOutcome};
use crate::logging;
use crate::notify::{notify, NotifyOutcome};
use crate::paths::{ClaudePaths, CLAUDE_DIR_ENV};
use crate::voice::{VoiceCache, VoiceGenerator};

#[derive(Debug, Parser)]
#[command(
    name = "audio-notifier",
    about = "Audio and voice notifications for Claude Code hook events",
    author,
    version
)]
pub struct Cli {
    /// Claude configuration directory (default: ~/.claude)
    #[arg(long = "claude-dir", env = CLAUDE_DIR_ENV, global = true, value_name = "DIR")]
    pub claude_dir: Option<PathBuf>,

    /// Write a debug log to the cache directory
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the launch-time install check, then show status
    Start,
    /// Show installation and settings status
    Status,
    /// Install the notification hooks
    Install,
    /// Remove the notification hooks (settings are kept)
    Uninstall {
        /// Do not ask for confirmation
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Install when not installed, uninstall otherwise
    Toggle {
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Turn sounds on
    Enable,
    /// Turn sounds off without removing the hooks
    Disable,
    /// Flip the sound switch
    ToggleSounds,
    /// Settings document
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Configure one event, globally or for a project
    Event {
        event: EventKind,
        /// Project path; global settings when omitted
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        enabled: Option<bool>,
        /// Sound file path, `voice:simple` or `voice:project`
        #[arg(long)]
        sound: Option<SoundSelector>,
    },
    /// Per-project overrides
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Sound library
    #[command(subcommand)]
    Sound(SoundCommand),
    /// Play the notification for a hook event (called by the hook script)
    Notify {
        event: EventKind,
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
    /// Preview a sound file or a spoken phrase
    #[command(subcommand)]
    Preview(PreviewCommand),
    /// Render voice files for every voice-enabled event
    GenerateVoices {
        #[arg(long = "api-key", env = "FISH_AUDIO_API_KEY")]
        api_key: Option<String>,
    },
    /// Cache the basic "<event> event" voice previews
    PregenerateVoices {
        #[arg(long = "api-key", env = "FISH_AUDIO_API_KEY")]
        api_key: Option<String>,
    },
    /// Installation manifest
    Info {
        /// Print the raw manifest JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Path of the settings.json backup from the last install or uninstall
    BackupPath,
    /// Print a diagnostics report (API keys redacted)
    Diagnostics,
    /// Recent notifications, newest first
    Activity {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Working directories recently seen in claude-output.log
    RecentProjects,
    /// Open the hook execution log
    OpenLog,
    /// Remove every trace of an install (development aid)
    DevReset {
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the settings document
    Show,
    /// Print the settings document path
    Path,
    /// Change one setting
    Set { key: SettingKey, value: String },
    /// Replace the settings document with a YAML file
    Import { file: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettingKey {
    GlobalMode,
    MinInterval,
    Debug,
    RespectDnd,
    VoiceProvider,
    VoiceId,
    ApiKey,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    List,
    Add { path: String },
    Remove { path: String },
    Rename { path: String, name: String },
    Enable { path: String },
    Disable { path: String },
}

#[derive(Debug, Subcommand)]
pub enum SoundCommand {
    /// Library, sorted by name
    List,
    Add { path: String },
    Remove { path: String },
    /// Copy a file into the custom sounds directory and add it to the library
    Upload { file: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum PreviewCommand {
    Sound { path: PathBuf },
    Voice {
        text: String,
        #[arg(long = "api-key", env = "FISH_AUDIO_API_KEY")]
        api_key: Option<String>,
    },
}

type CliApp = App<HookInstaller, YamlFileStore>;

fn build_app(paths: &ClaudePaths) -> Result<CliApp, String> {
    let installer = HookInstaller::for_current_exe(paths.clone())?;
    let store = YamlFileStore::new(paths.settings_document());
    let voices: Box<dyn VoiceGenerator> = Box::new(VoiceCache::new(paths.clone(), None));
    Ok(App::new(installer, store, Some(voices)))
}

fn confirm_stdin(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(format!("Expected true or false, got '{}'", other)),
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && value != "none").then(|| value.to_string())
}

/// Save the editor and report the outcome; partial success still exits non-zero.
fn save(app: &mut CliApp) -> Result<(), String> {
    match app.save() {
        SaveOutcome::Saved => {
            println!("Saved {}", app.installer().paths().settings_document().display());
            Ok(())
        }
        SaveOutcome::SavedVoiceFailed(message) | SaveOutcome::Failed(message) => Err(message),
    }
}

fn apply_setting(editor: &mut SettingsEditor, key: SettingKey, value: &str) -> Result<(), String> {
    match key {
        SettingKey::GlobalMode => editor.set_global_mode(parse_bool(value)?),
        SettingKey::MinInterval => editor.set_min_interval(
            value
                .trim()
                .parse()
                .map_err(|e| format!("Invalid interval '{}': {}", value, e))?,
        ),
        SettingKey::Debug => editor.set_debug(parse_bool(value)?),
        SettingKey::RespectDnd => editor.set_respect_do_not_disturb(parse_bool(value)?),
        SettingKey::VoiceProvider => editor.set_voice_provider(value.trim()),
        SettingKey::VoiceId => editor.set_voice_id(optional(value)),
        SettingKey::ApiKey => editor.set_fish_audio_api_key(optional(value)),
    }
    Ok(())
}

fn print_status(paths: &ClaudePaths, app: &CliApp) -> Result<(), String> {
    let doc = app.editor().draft();
    let installed = app.install_affordance() == InstallAffordance::Uninstall;
    println!("Claude directory:  {}", paths.root().display());
    println!("Installed:         {}", installed);
    println!("Hooks registered:  {}", commands::check_notification_system(paths)?);
    println!("Sounds enabled:    {}", commands::get_sounds_enabled(paths)?);
    println!("Uninstalled:       {}", commands::was_uninstalled(paths)?);
    println!("Global mode:       {}", doc.global_mode);
    println!("Projects:          {}", doc.projects.len());
    println!();
    println!("{:<15} {:<8} {}", "EVENT", "ENABLED", "SOUND");
    for kind in EventKind::ALL {
        let enabled = doc.global_settings.event_enabled.get(kind);
        let sound = app
            .editor()
            .displayed_selector(&Scope::Global, kind)
            .map(|s| s.to_string())
            .unwrap_or_default();
        println!("{:<15} {:<8} {}", kind.key(), enabled, sound);
    }
    Ok(())
}

fn print_startup(outcome: &StartupOutcome) {
    match outcome {
        StartupOutcome::AlreadyChecked | StartupOutcome::AlreadyEnabled => {}
        StartupOutcome::RespectedUninstall => {
            println!("Hooks were removed earlier; run `audio-notifier install` to reinstall.")
        }
        StartupOutcome::Installed(message) => println!("{}\n", message),
        StartupOutcome::InstallFailed(err) => eprintln!("Installation failed: {}\n", err),
        StartupOutcome::MarkerUnreadable(err) => {
            eprintln!("Could not check the install state: {}\n", err)
        }
    }
}

/// The document's `debug` flag, read before logging exists. Load problems are
/// reported later, once the editor loads the document with logging set up.
fn document_requests_debug(paths: &ClaudePaths) -> bool {
    std::fs::read_to_string(paths.settings_document())
        .ok()
        .and_then(|content| parse_document(&content).ok())
        .is_some_and(|doc| doc.debug)
}

/// Parse-independent entry point, used by `run()`.
pub fn execute(cli: Cli) -> Result<(), String> {
    let paths = ClaudePaths::resolve(cli.claude_dir)?;
    logging::init(cli.debug || document_requests_debug(&paths));
    log::debug!("Using Claude directory {:?}", paths.root());

    let command = cli.command.unwrap_or(Command::Status);
    match command {
        Command::Start => {
            let mut app = build_app(&paths)?;
            let outcome = app.startup();
            print_startup(&outcome);
            print_status(&paths, &app)
        }
        Command::Status => print_status(&paths, &build_app(&paths)?),
        Command::Install => {
            println!("{}", commands::install_hooks(&paths)?);
            Ok(())
        }
        Command::Uninstall { yes } => {
            if !yes && !confirm_stdin("Remove the audio notification hooks? Your settings will be kept.") {
                println!("Cancelled");
                return Ok(());
            }
            println!("{}", commands::uninstall_hooks(&paths)?);
            Ok(())
        }
        Command::Toggle { yes } => {
            let mut app = build_app(&paths)?;
            let mut confirm = |prompt: &str| yes || confirm_stdin(prompt);
            match app.toggle_install(&mut confirm) {
                ToggleOutcome::Cancelled => println!("Cancelled"),
                ToggleOutcome::Installed(message) | ToggleOutcome::Uninstalled(message) => {
                    println!("{}", message)
                }
                ToggleOutcome::Failed(err) => return Err(err),
            }
            Ok(())
        }
        Command::Enable => commands::set_sounds_enabled(&paths, true),
        Command::Disable => commands::set_sounds_enabled(&paths, false),
        Command::ToggleSounds => {
            let enabled = commands::toggle_sounds(&paths)?;
            println!("Sounds {}", if enabled { "enabled" } else { "disabled" });
            Ok(())
        }
        Command::Config(cmd) => run_config(&paths, cmd),
        Command::Event {
            event,
            project,
            enabled,
            sound,
        } => {
            let mut app = build_app(&paths)?;
            let scope = project.map_or(Scope::Global, Scope::Project);
            if let Some(enabled) = enabled {
                app.editor_mut().set_event_enabled(&scope, event, enabled)?;
            }
            if let Some(sound) = sound {
                app.editor_mut().set_event_sound(&scope, event, sound)?;
            }
            if !app.editor().can_save() {
                println!("No changes");
                return Ok(());
            }
            save(&mut app)
        }
        Command::Project(cmd) => run_project(&paths, cmd),
        Command::Sound(cmd) => run_sound(&paths, cmd),
        Command::Notify { event, cwd } => {
            let cwd = match cwd {
                Some(cwd) => cwd,
                None => std::env::current_dir()
                    .map_err(|e| format!("Failed to read working directory: {}", e))?,
            };
            let outcome = notify(&paths, event, &cwd)?;
            log::debug!("notify {} in {:?}: {:?}", event, cwd, outcome);
            if outcome == NotifyOutcome::Played {
                log::info!("Played {} notification", event);
            }
            Ok(())
        }
        Command::Preview(PreviewCommand::Sound { path }) => commands::preview_sound(&path),
        Command::Preview(PreviewCommand::Voice { text, api_key }) => {
            let api_key = api_key.or_else(|| {
                commands::load_config(&paths)
                    .ok()
                    .and_then(|doc| doc.global_settings.fish_audio_api_key)
            });
            commands::preview_voice(&paths, &text, api_key)
        }
        Command::GenerateVoices { api_key } => {
            let doc = commands::load_config(&paths)?;
            let generated = VoiceCache::new(paths.clone(), api_key)
                .generate(&doc)
                .map_err(|e| format!("Failed to generate voices: {}", e))?;
            println!("Generated {} voice files", generated);
            Ok(())
        }
        Command::PregenerateVoices { api_key } => {
            println!("{}", commands::pregenerate_basic_voices(&paths, api_key)?);
            Ok(())
        }
        Command::Info { json } => {
            if json {
                println!("{}", commands::export_installation_log(&paths)?);
                return Ok(());
            }
            let manifest = commands::get_installation_info(&paths)?;
            println!("Installed at:  {}", manifest.installed_at.to_rfc3339());
            println!("Version:       {}", manifest.app_version);
            println!("Backup:        {}", manifest.backup_path);
            let hooks: Vec<&str> = manifest
                .changes
                .hooks_added
                .iter()
                .map(|kind| kind.hook_name())
                .collect();
            println!("Hooks added:   {}", hooks.join(", "));
            if !manifest.changes.existing_hooks_preserved.is_empty() {
                println!(
                    "Preserved:     {}",
                    manifest.changes.existing_hooks_preserved.join(", ")
                );
            }
            for file in &manifest.changes.files_created {
                println!("Created:       {}", file);
            }
            Ok(())
        }
        Command::BackupPath => {
            println!("{}", commands::get_backup_path(&paths)?);
            Ok(())
        }
        Command::Diagnostics => {
            println!("{}", commands::export_diagnostics(&paths)?);
            Ok(())
        }
        Command::Activity { limit } => {
            for event in commands::get_activity_log(&paths)?.into_iter().take(limit) {
                println!(
                    "{}  {:<14} {}{}",
                    event.timestamp,
                    event.event,
                    event.project.as_deref().unwrap_or("-"),
                    event
                        .message
                        .as_deref()
                        .map(|m| format!("  \"{}\"", m))
                        .unwrap_or_default()
                );
            }
            Ok(())
        }
        Command::RecentProjects => {
            for project in commands::get_recent_projects(&paths)? {
                println!("{}", project);
            }
            Ok(())
        }
        Command::OpenLog => {
            println!("{}", commands::hook_log_path(&paths)?.display());
            commands::open_log_file(&paths)
        }
        Command::DevReset { yes } => {
            if !yes && !confirm_stdin("Reset the notification install to a clean state?") {
                println!("Cancelled");
                return Ok(());
            }
            commands::dev_reset_install(&paths)
        }
    }
}

fn run_config(paths: &ClaudePaths, cmd: ConfigCommand) -> Result<(), String> {
    match cmd {
        ConfigCommand::Show => {
            print!("{}", commands::show_config(paths)?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", paths.settings_document().display());
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            let mut app = build_app(paths)?;
            apply_setting(app.editor_mut(), key, &value)?;
            save(&mut app)
        }
        ConfigCommand::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            let doc = parse_document(&content)
                .map_err(|e| format!("Failed to parse {}: {}", file.display(), e))?;
            commands::save_config(paths, doc)
        }
    }
}

fn run_project(paths: &ClaudePaths, cmd: ProjectCommand) -> Result<(), String> {
    let mut app = build_app(paths)?;
    let editor = app.editor_mut();
    match cmd {
        ProjectCommand::List => {
            for project in &editor.draft().projects {
                println!(
                    "{:<20} {:<8} {}",
                    project.label(),
                    if project.enabled { "enabled" } else { "disabled" },
                    project.path
                );
            }
            return Ok(());
        }
        ProjectCommand::Add { path } => editor.add_project(&path)?,
        ProjectCommand::Remove { path } => {
            if !editor.remove_project(&path) {
                return Err(format!("No project configured for {}", path));
            }
        }
        ProjectCommand::Rename { path, name } => editor.rename_project(&path, &name)?,
        ProjectCommand::Enable { path } => editor.set_project_enabled(&path, true)?,
        ProjectCommand::Disable { path } => editor.set_project_enabled(&path, false)?,
    }
    save(&mut app)
}

fn run_sound(paths: &ClaudePaths, cmd: SoundCommand) -> Result<(), String> {
    let mut app = build_app(paths)?;
    match cmd {
        SoundCommand::List => {
            for sound in app.editor().sorted_sound_library() {
                println!("{:<12} {}", sound_display_name(sound), sound);
            }
            return Ok(());
        }
        SoundCommand::Add { path } => {
            if !app.editor_mut().add_sound(&path)? {
                println!("Already in the library");
                return Ok(());
            }
        }
        SoundCommand::Remove { path } => {
            if !app.editor_mut().remove_sound(&path) {
                return Err(format!("{} is not in the library", path));
            }
        }
        SoundCommand::Upload { file } => {
            let dest = commands::upload_sound(paths, &file)?;
            println!("Copied to {}", dest);
            if !app.editor_mut().add_sound(&dest)? {
                return Ok(());
            }
        }
    }
    save(&mut app)
}
