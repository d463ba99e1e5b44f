//! Command handlers
//!
//! The operations a front end can invoke, organized into submodules:
//! - `config`: settings document load/save
//! - `sounds`: sound switch and custom sounds
//! - `preview`: sound and voice previews
//! - `notification_*`: hook installation state, install and uninstall
//! - `debug`: diagnostics, activity log and log files
//!
//! Every handler returns `Result<_, String>`; the error text is shown to the user as is.

mod config;
mod debug;
mod notification_check;
mod notification_install;
mod notification_uninstall;
mod preview;
mod sounds;

pub use config::{load_config, save_config, show_config};
pub use debug::{
    export_diagnostics, get_activity_log, get_recent_projects, hook_log_path, open_log_file,
};
pub use notification_check::{
    check_notification_system, export_installation_log, get_backup_path, get_installation_info,
};
pub use notification_install::{dev_reset_install, install_hooks};
pub use notification_uninstall::uninstall_hooks;
pub use preview::{cached_voice_preview, pregenerate_basic_voices, preview_sound, preview_voice};
pub use sounds::{
    get_sounds_enabled, list_custom_sounds, set_sounds_enabled, toggle_sounds, upload_sound,
    was_uninstalled,
};
