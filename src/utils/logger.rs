use crate::utils::error::{CareError, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the background log writer alive. Drop it only on shutdown.
#[must_use = "dropping the guard stops the log writer"]
pub struct LoggerGuard {
    _guard: WorkerGuard,
}

/// Routes all logs to a file so they never interleave with the prompt.
pub fn init_cli_logger(
    verbose: bool,
    level: &str,
    directory: &Path,
    file_name: &str,
    json: bool,
) -> Result<LoggerGuard> {
    let default_directive = if verbose {
        "cuddlecare=debug".to_string()
    } else {
        format!("cuddlecare={}", level)
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    std::fs::create_dir_all(directory).map_err(|e| CareError::LoggerError {
        message: format!("cannot create {}: {}", directory.display(), e),
    })?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let base = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);
    let layer = if json {
        base.json().boxed()
    } else {
        base.compact().boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| CareError::LoggerError {
            message: e.to_string(),
        })?;

    Ok(LoggerGuard { _guard: guard })
}
