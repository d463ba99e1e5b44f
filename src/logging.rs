//! Debug log file and stderr logging
//!
//! Hook scripts start a fresh process for every event, so the debug log is
//! appended to rather than recreated, and rotated once it grows past
//! [`MAX_LOG_BYTES`].

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use log::{LevelFilter, Metadata, Record};

pub const DEBUG_LOG_ENV: &str = "AUDIO_NOTIFIER_DEBUG_LOG";

const MAX_LOG_BYTES: u64 = 1024 * 1024;

struct DebugFileLogger {
    file: Mutex<Option<File>>,
    path: PathBuf,
}

impl log::Log for DebugFileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LevelFilter::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "[{}] [{:5}] [{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );

        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.write_all(line.as_bytes());
            }
        }

        #[cfg(debug_assertions)]
        eprint!("{}", line);
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

static LOGGER: OnceLock<DebugFileLogger> = OnceLock::new();

/// Location of the debug log: `<cache dir>/audio-notifier/debug.log`.
pub fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audio-notifier")
        .join("debug.log")
}

/// Move an oversized log to `<name>.1`, replacing any earlier rotation.
fn rotate_if_large(path: &Path, max_bytes: u64) -> std::io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            let mut rotated = path.as_os_str().to_owned();
            rotated.push(".1");
            fs::rename(path, PathBuf::from(rotated))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    if let Err(e) = rotate_if_large(path, MAX_LOG_BYTES) {
        eprintln!("audio-notifier: could not rotate {}: {}", path.display(), e);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize logging.
///
/// With `force_file` or `AUDIO_NOTIFIER_DEBUG_LOG` set, everything down to
/// debug goes to the debug log file. Otherwise warnings go to stderr through
/// `env_logger` (`RUST_LOG` still applies).
pub fn init(force_file: bool) {
    if force_file || env_logging_enabled() {
        if let Err(err) = init_file_logger() {
            eprintln!("audio-notifier: failed to start debug log: {}", err);
        }
        return;
    }

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .try_init();
}

fn init_file_logger() -> Result<(), String> {
    let path = log_file_path();
    let file = open_log(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let logger = LOGGER.get_or_init(|| DebugFileLogger {
        file: Mutex::new(Some(file)),
        path,
    });

    log::set_logger(logger).map_err(|e| e.to_string())?;
    log::set_max_level(LevelFilter::Debug);
    log::debug!(
        "audio-notifier {} (pid {}) logging to {:?}",
        env!("CARGO_PKG_VERSION"),
        std::process::id(),
        logger.path
    );
    Ok(())
}

fn env_logging_enabled() -> bool {
    std::env::var(DEBUG_LOG_ENV)
        .map(|value| {
            let trimmed = value.trim();
            !trimmed.is_empty() && trimmed != "0"
        })
        .unwrap_or(false)
}
