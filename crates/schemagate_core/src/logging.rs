//! Process-wide logging bootstrap.
//!
//! # Responsibility
//! - Validate a `LogConfig` and start rotating file logs once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Re-initializing with an identical config is a no-op.
//! - Re-initializing with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "schemagate";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    UnsupportedLevel(String),
    #[error("log directory cannot be empty")]
    EmptyDir,
    #[error("log directory must be an absolute path, got `{}`", .0.display())]
    RelativeDir(PathBuf),
    #[error("failed to create log directory `{}`: {source}", .dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Backend(String),
    #[error("logging already active at level `{active}`; refusing to switch to `{requested}`")]
    LevelConflict {
        active: &'static str,
        requested: &'static str,
    },
    #[error("logging already active in `{}`; refusing to switch to `{}`", .active.display(), .requested.display())]
    DirConflict { active: PathBuf, requested: PathBuf },
}

/// Validated logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    level: &'static str,
    dir: PathBuf,
}

impl LogConfig {
    /// Normalizes `level` and checks that `dir` is a non-empty absolute path.
    pub fn new(level: &str, dir: impl AsRef<Path>) -> Result<Self, LoggingError> {
        Ok(Self {
            level: normalize_level(level)?,
            dir: normalize_dir(dir.as_ref())?,
        })
    }

    pub fn level(&self) -> &'static str {
        self.level
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Starts file logging for the process.
///
/// # Errors
/// - Config errors from [`LogConfig::new`].
/// - `CreateDir` / `Backend` when the log sink cannot be set up.
/// - `LevelConflict` / `DirConflict` when already active with other settings.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let config = LogConfig::new(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start_logger(config.clone()))?;
    ensure_same_config(&active.config, &config)
}

/// `(level, dir)` of the active logger, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.config.level, active.config.dir.clone()))
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: LogConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.dir).map_err(|source| LoggingError::CreateDir {
        dir: config.dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();

    info!(
        "event=logging_init module=core status=ok level={} log_dir={} version={}",
        config.level,
        config.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        config,
        _handle: handle,
    })
}

fn ensure_same_config(active: &LogConfig, requested: &LogConfig) -> Result<(), LoggingError> {
    if active.dir != requested.dir {
        return Err(LoggingError::DirConflict {
            active: active.dir.clone(),
            requested: requested.dir.clone(),
        });
    }
    if active.level != requested.level {
        return Err(LoggingError::LevelConflict {
            active: active.level,
            requested: requested.level,
        });
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_dir(dir: &Path) -> Result<PathBuf, LoggingError> {
    let text = dir.to_string_lossy();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LoggingError::EmptyDir);
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(LoggingError::RelativeDir(path));
    }
    Ok(path)
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location,
            panic_payload_summary(panic_info)
        );
        previous_hook(panic_info);
    }));
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

// Payloads may carry entity text; keep them single-line and bounded.
fn sanitize_message(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    let mut truncated: String = single_line.chars().take(max_chars).collect();
    if single_line.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
