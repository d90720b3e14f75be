//! Structured JSONL logging plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (`<state dir>/appmenu-runner/logs/appmenu-runner.jsonl`)
//! - **Pretty to stderr** for whoever launched the runner
//!
//! # Usage
//!
//! ```rust,ignore
//! use appmenu_runner::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "runner_start", "Runner started");
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const APP_DIR: &str = "appmenu-runner";
const LOG_FILE_NAME: &str = "appmenu-runner.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// If the log file cannot be opened, only the stderr layer is installed.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eprintln!("[LOGGING] Failed to open log file: {}", e))
        .ok();

    // Environment filter - default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .compact();

    let (json_layer, file_guard) = match file {
        Some(file) => {
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_timer(fmt::time::UtcTime::new(Rfc3339))
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init();

    if let Err(e) = installed {
        eprintln!("[LOGGING] Subscriber already installed: {}", e);
    }

    tracing::info!(
        event_type = "runner_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Runner logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|d| d.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("appmenu-runner-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

/// Category-tagged info line.
///
/// Prefer tracing macros directly when there are structured fields to record.
pub fn log(category: &str, message: &str) {
    tracing::info!(category = category, "{}", message);
}

/// Log a performance metric with structured fields
pub fn log_perf(operation: &str, duration_ms: u64, threshold_ms: u64) {
    if duration_ms > threshold_ms {
        tracing::warn!(
            event_type = "performance",
            operation = operation,
            duration_ms = duration_ms,
            threshold_ms = threshold_ms,
            is_slow = true,
            "Slow operation: {} took {}ms (threshold: {}ms)",
            operation,
            duration_ms,
            threshold_ms
        );
    } else {
        tracing::debug!(
            event_type = "performance",
            operation = operation,
            duration_ms = duration_ms,
            threshold_ms = threshold_ms,
            is_slow = false,
            "Operation {} completed in {}ms",
            operation,
            duration_ms
        );
    }
}

/// Log an error with structured fields and context
pub fn log_error(category: &str, error: &str, context: Option<&str>) {
    let msg = match context {
        Some(ctx) => format!("{}: {} (context: {})", category, error, ctx),
        None => format!("{}: {}", category, error),
    };

    tracing::error!(
        event_type = "error",
        category = category,
        error_message = error,
        context = context,
        "{}",
        msg
    );
}
