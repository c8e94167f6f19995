use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log size past which the previous run's log is set aside (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

pub const LOG_FILE_NAME: &str = "scatterstat.log";

/// Where an oversized log is moved; one generation is kept
fn previous_log_path(log_path: &Path) -> PathBuf {
    log_path.with_extension("log.old")
}

/// Move `log_path` to `<name>.log.old` when it is larger than `max_len` bytes.
///
/// Returns whether the log was moved. Each sweep writes into the output directory, so a
/// rerun into the same directory starts a fresh log and keeps one older one.
fn set_aside_oversized_log(log_path: &Path, max_len: u64) -> std::io::Result<bool> {
    let len = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= max_len {
        return Ok(false);
    }
    fs::rename(log_path, previous_log_path(log_path))?;
    Ok(true)
}

/// Initialize logging to stderr and to `{log_dir}/scatterstat.log`.
///
/// File output goes through a non-blocking writer; keep the returned guard alive until the
/// program exits or buffered lines are lost. The level applies to both crates and can be
/// overridden with `RUST_LOG`.
pub fn init_logging(log_dir: &Path, level: &str) -> color_eyre::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE_NAME);

    if let Err(e) = set_aside_oversized_log(&log_path, MAX_LOG_SIZE) {
        eprintln!("Warning: could not move aside {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let default_filter = format!("scatterstat={level},scatterstat_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "scatterstat logging initialized");
    Ok(guard)
}
