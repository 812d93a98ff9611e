//! Log setup: daily-rotated files under the config directory.
//!
//! Console output stays reserved for the conversation, so logs go to files
//! only. `FRIGO_LOG` controls the filter (default `info`).

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use frigo_infrastructure::FrigoPaths;

/// Initializes tracing. The returned guard must be kept alive for the
/// lifetime of the process so buffered log lines are flushed.
pub fn init(paths: &FrigoPaths) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(paths.logs_dir(), "frigo.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("FRIGO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
