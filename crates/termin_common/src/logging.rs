//! Logging utilities for the Termin services.
//!
//! Installs a `tracing` subscriber with an env filter, a console layer and,
//! when configured, a daily rolling log file and a journald layer.

use std::str::FromStr;

use termin_config::LoggingConfig;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix used by the rolling file appender.
const LOG_FILE_PREFIX: &str = "termin.log";

/// Initialize the tracing subscriber from the `logging` config section.
///
/// The returned guard flushes the file appender on drop and must be held for
/// the lifetime of the process. It is `None` when file logging is disabled.
/// Calling this twice is harmless; the second call keeps the first subscriber.
pub fn init_with_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let level = config
        .level
        .as_deref()
        .and_then(|raw| Level::from_str(raw).ok())
        .unwrap_or(Level::INFO);

    let (file_layer, guard) = match config.dir.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(file_layer);

    #[cfg(target_os = "linux")]
    let result = {
        let journald_layer = if config.journald {
            tracing_journald::layer().ok()
        } else {
            None
        };
        registry.with(journald_layer).try_init()
    };
    #[cfg(not(target_os = "linux"))]
    let result = registry.try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    guard
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("termin={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
