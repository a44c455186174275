//! Log sink setup
//!
//! Every event goes to standard output and to the configured log file. Each
//! line carries the timestamp, level, message, target, source file and line.
//! `RUST_LOG` overrides the default `info` filter.

use crate::config::LoggingConfig;
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// The log file is truncated on startup. If it cannot be created, logging
/// continues on standard output alone and the failure is logged once.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let env_filter = || {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy()
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter());

    let (file_layer, file_error) = match File::create(&config.log_file) {
        Ok(file) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter());
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    let _ = tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!(
            path = %config.log_file.display(),
            error = %e,
            "cannot open log file, logging to stdout only"
        );
    }
}
