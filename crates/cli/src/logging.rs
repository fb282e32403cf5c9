//! Tracing setup for the `dpr` binary.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::CliConfig;
use crate::dirs;

/// Install the global subscriber: stderr always, a log file when enabled.
///
/// The returned guard flushes the file writer on drop and must outlive the
/// command.
pub fn setup_logging(config: &CliConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = if config.log_to_file {
        let log_dir = config.log_dir.clone().unwrap_or_else(dirs::log_dir);
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let file_name = log_file_name();
        let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_file)
            .with_ansi(false);

        (Some((layer, log_dir.join(file_name))), Some(guard))
    } else {
        (None, None)
    };

    let log_path = file_layer.as_ref().map(|(_, path)| path.clone());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer.map(|(layer, _)| layer))
        .init();

    if let Some(path) = log_path {
        tracing::info!("Log file: {}", path.display());
    }

    Ok(guard)
}

fn log_file_name() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("dpr_{timestamp}.log")
}
