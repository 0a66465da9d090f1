//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes plain-text records to
//! size-capped, rotated files and keeps the most recent lines in memory.
//! `log` records are bridged into the same subscriber.

mod buffer;
mod writer;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

pub use buffer::LineBuffer;
pub use writer::{log_file_path, RollingFileWriter};

static RECENT: OnceLock<Arc<LineBuffer>> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file: {0}")]
    Open(#[source] std::io::Error),
    #[error("failed to install logger: {0}")]
    Install(String),
    #[error("logger not initialized")]
    NotInitialized,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Rotate once the live file would exceed this size
    pub max_file_bytes: u64,
    /// Live file plus rotated files kept on disk
    pub max_files: usize,
    /// Lines kept in memory for `recent_lines`
    pub buffer_lines: usize,
    pub level: log::LevelFilter,
}

impl LoggerConfig {
    pub fn new(log_dir: PathBuf, app_name: &str) -> Self {
        Self {
            log_dir,
            app_name: app_name.to_string(),
            max_file_bytes: 1024 * 1024,
            max_files: 5,
            buffer_lines: 500,
            level: log::LevelFilter::Info,
        }
    }
}

/// Local wall-clock timestamps with millisecond precision
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn to_level_filter(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

/// Initialize with default rotation settings
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    init_with_config(LoggerConfig::new(log_dir, app_name))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_with_config(config: LoggerConfig) -> Result<(), LoggerError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggerError::CreateDir {
        path: config.log_dir.clone(),
        source,
    })?;

    let recent = Arc::new(LineBuffer::new(config.buffer_lines));
    let writer = RollingFileWriter::open(
        &config.log_dir,
        &config.app_name,
        config.max_file_bytes,
        config.max_files,
        recent.clone(),
    )
    .map_err(LoggerError::Open)?;

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_max_level(to_level_filter(config.level))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    if RECENT.set(recent).is_err() {
        return Err(LoggerError::Install("recent-line buffer already set".to_string()));
    }

    tracing::info!("{} logging to {}", config.app_name, config.log_dir.display());
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    RECENT.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Most recent lines, oldest first; empty before initialization
pub fn recent_lines() -> Vec<String> {
    RECENT.get().map(|buffer| buffer.snapshot()).unwrap_or_default()
}
