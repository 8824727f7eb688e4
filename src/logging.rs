use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Directory for rotated log files; stdout is used when unset.
pub const LOG_DIR_ENV: &str = "RM_LOG_DIR";

static ROTATION_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the process-wide tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). When `RM_LOG_DIR` is set,
/// output goes to `<dir>/<app>.log` with daily rotation; otherwise stdout.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing_subscriber(app_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match daily_log_writer(app_name) {
        Some(writer) => {
            let _ = builder.with_writer(writer).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}

fn daily_log_writer(app_name: &str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os(LOG_DIR_ENV)?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("failed to create {LOG_DIR_ENV} directory ({err}); logging to stdout");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = ROTATION_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}
