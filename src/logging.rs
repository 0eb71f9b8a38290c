// ===============================
// src/logging.rs
// ===============================
//
// Dua tujuan log:
// - console : level dari --log-level (default info)
// - file    : <log_dir>/trading.log, DEBUG, termasuk target "audit"
//             (semua request/response exchange)
//
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{BotError, Result};

pub const LOG_FILE: &str = "trading.log";

// Library HTTP internals stay out of the audit file.
const FILE_FILTER: &str = "debug,hyper=info,reqwest=info,rustls=info,h2=info";

/// Keep the returned guard alive until exit, otherwise buffered lines are lost.
pub fn init(log_dir: &Path, console_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let console_filter =
        EnvFilter::try_new(console_level).map_err(|e| BotError::Config(format!("invalid log level {console_level:?}: {e}")))?;
    let file_filter = EnvFilter::try_new(FILE_FILTER).map_err(|e| BotError::Config(e.to_string()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer).with_filter(file_filter))
        .try_init()
        .map_err(|e| BotError::Config(format!("initialize tracing subscriber: {e}")))?;

    Ok(guard)
}
