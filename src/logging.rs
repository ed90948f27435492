use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive; drop it last.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Log to `<data dir>/logs/wordtrainer.log`. The terminal belongs to the UI,
/// so nothing is written to stdout. `RUST_LOG` overrides `level`.
pub fn init(data_dir: &Path, level: &str) -> Option<LogGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let log_dir = data_dir.join("logs");
    if let Err(err) = fs::create_dir_all(&log_dir) {
        eprintln!("failed to create log directory {}: {err}", log_dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, "wordtrainer.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .ok()?;

    Some(LogGuard { _guard: guard })
}
