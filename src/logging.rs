//! Structured JSONL logging to a file plus human-readable stderr output.
//!
//! - **JSONL to file** (`<data_dir>/logs/virtual-explorer.jsonl`) for later inspection
//! - **Compact to stderr** for whoever is driving the CLI
//!
//! Spoken announcements do not go through here; they are the host's business.
//!
//! # Usage
//!
//! ```rust,ignore
//! use virtual_explorer::logging;
//!
//! // MUST keep guard alive for duration of program
//! let _guard = logging::init(&config.log_dir());
//! tracing::info!(identifier = "Docs", "Path added");
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_NAME: &str = "virtual-explorer.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Compact human-readable output on stderr.
fn stderr_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact()
}

/// Initialize the dual-output logging system.
///
/// Falls back to stderr-only logging if the log file cannot be opened.
pub fn init(log_dir: &Path) -> LoggingGuard {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path(log_dir);

    // Default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    let file_guard = match file {
        Ok(file) => {
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

            let json_layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .with(stderr_layer())
                .init();
            Some(file_guard)
        }
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer())
                .init();
            None
        }
    };

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Path of the JSONL log file inside `log_dir`.
pub fn log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_uses_jsonl_file() {
        let path = log_path(Path::new("/tmp/ve/logs"));
        assert_eq!(path, PathBuf::from("/tmp/ve/logs/virtual-explorer.jsonl"));
    }

    #[test]
    fn test_stderr_layer_stacks_with_and_without_file_layer() {
        let file_dir = tempfile::tempdir().unwrap();
        let file = std::fs::File::create(log_path(file_dir.path())).unwrap();
        let (writer, _guard) = tracing_appender::non_blocking(file);

        let with_file = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(fmt::layer().json().with_writer(writer))
            .with(stderr_layer());
        tracing::subscriber::with_default(with_file, || tracing::info!("with file"));

        let stderr_only = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(stderr_layer());
        tracing::subscriber::with_default(stderr_only, || tracing::info!("stderr only"));
    }
}
