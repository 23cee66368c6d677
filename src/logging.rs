//! Tracing setup shared by the dashboard and the CLI.
//!
//! Every launch writes to its own `clvdash_<local time>.log` under
//! `.clvdash/logs`, mirrored to a console stream. Only the newest launches are
//! kept. `RUST_LOG` replaces the default filter.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppDirError};

const KEEP_LAUNCH_LOGS: usize = 10;
const LOG_FILE_PREFIX: &str = "clvdash_";
/// Used when `RUST_LOG` is unset. The HTTP stack is noisy at `info`.
const DEFAULT_FILTER: &str = "info,ureq=warn,rustls=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error(transparent)]
    Dir(#[from] AppDirError),
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    #[error("Failed to format log filename time: {0}")]
    FormatTime(#[from] time::error::Format),
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Console stream mirrored alongside the log file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Used by the desktop app.
    Stdout,
    /// Used by the CLI so that printed results stay clean on stdout.
    Stderr,
}

/// Log to stdout and this launch's file. Returns the file path.
///
/// Later calls return the same path without reinstalling anything.
pub fn init() -> Result<PathBuf, LoggingError> {
    init_with(ConsoleTarget::Stdout)
}

/// Like [`init`], with an explicit console stream.
pub fn init_with(console: ConsoleTarget) -> Result<PathBuf, LoggingError> {
    if let Some(path) = LOG_PATH.get() {
        return Ok(path.clone());
    }

    let dir = app_dirs::logs_dir()?;
    let path = dir.join(log_file_name(now_local_or_utc())?);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| io_error("create", &path, source))?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);
    let removed = prune_launch_logs(&dir, KEEP_LAUNCH_LOGS)?;

    let timer = console_timer();
    let console_layer = match console {
        ConsoleTarget::Stdout => fmt::layer()
            .with_timer(timer.clone())
            .with_writer(io::stdout)
            .boxed(),
        ConsoleTarget::Stderr => fmt::layer()
            .with_timer(timer.clone())
            .with_writer(io::stderr)
            .boxed(),
    };
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(file_writer);

    let subscriber = Registry::default()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);
    let _ = LOG_PATH.set(path.clone());

    tracing::info!(
        "clvdash {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        path.display()
    );
    if !removed.is_empty() {
        tracing::debug!("Removed {} old launch logs", removed.len());
    }
    Ok(path)
}

/// Delete all but the newest `keep` launch logs in `dir`.
///
/// Timestamps in the names sort chronologically. Files without the
/// `clvdash_` prefix are left alone.
fn prune_launch_logs(dir: &Path, keep: usize) -> Result<Vec<PathBuf>, LoggingError> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| io_error("read", dir, source))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_launch_log(path))
        .collect();
    logs.sort();
    let excess = logs.len().saturating_sub(keep);
    let removed: Vec<PathBuf> = logs.drain(..excess).collect();
    for path in &removed {
        fs::remove_file(path).map_err(|source| io_error("remove", path, source))?;
    }
    Ok(removed)
}

fn is_launch_log(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log"))
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{LOG_FILE_PREFIX}{}.log", now.format(NAME_FORMAT)?))
}

fn console_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>>
{
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn io_error(action: &'static str, path: &Path, source: io::Error) -> LoggingError {
    LoggingError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}
