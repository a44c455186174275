//! # homework-status-bot
//!
//! Polls the homework review API and relays status changes of the most recent
//! submission to a single Telegram chat.
//!
//! A cycle fetches everything changed since the watermark timestamp, validates
//! the response shape, formats the newest homework's status into a message and
//! delivers it. Cycles repeat on a fixed interval; per-cycle failures are
//! reported to the chat (once per distinct failure) and never stop the loop.
//!
//! ## Quick Start
//!
//! ```no_run
//! use homework_status_bot::{Config, build_poller, run_with_shutdown};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let poller = build_poller(&config, chrono::Utc::now().timestamp())?;
//!
//!     run_with_shutdown(poller).await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Review API client
pub mod api_client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Notification text
pub mod formatter;
/// Log sink setup
pub mod logging;
/// Outbound chat notifications
pub mod notifier;
/// Poll loop
pub mod poller;
/// Status catalog
pub mod status;
/// Core types
pub mod types;
/// Response shape validation
pub mod validator;

// Re-export commonly used types
pub use api_client::{HomeworkSource, PracticumClient};
pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use notifier::{Notifier, TelegramNotifier};
pub use poller::{CycleOutcome, Poller};
pub use status::HomeworkStatus;
pub use types::{ApiResponse, HomeworkRecord, Timestamp};

use std::sync::Arc;

/// Build a poller wired to the review API and Telegram from `config`
///
/// # Errors
///
/// Returns an error if either HTTP client cannot be created.
pub fn build_poller(config: &Config, watermark: Timestamp) -> Result<Poller> {
    let source = PracticumClient::new(
        config.poll.endpoint.clone(),
        &config.credentials.practicum_token,
        config.poll.request_timeout,
    )?;
    let notifier = TelegramNotifier::new(
        &config.poll.telegram_api_url,
        &config.credentials.telegram_token,
        config.credentials.telegram_chat_id.clone(),
        config.poll.request_timeout,
    )?;

    Ok(Poller::new(
        Arc::new(source),
        Arc::new(notifier),
        config.poll.retry_time,
        watermark,
    ))
}

/// Run the poll loop until a termination signal arrives
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// A cycle in flight when the signal arrives is dropped at its next await point.
pub async fn run_with_shutdown(poller: Poller) {
    tokio::select! {
        _ = poller.run() => {}
        _ = wait_for_signal() => {
            tracing::info!("poll loop stopped");
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGTERM handler, waiting for SIGINT only"
            );
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                ctrl_c_or_never().await;
            }
        }
        (_, Err(e)) => {
            tracing::warn!(
                error = %e,
                "Could not register SIGINT handler, waiting for SIGTERM only"
            );
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                ctrl_c_or_never().await;
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c_or_never().await;
}

/// Wait for Ctrl+C; if it cannot be listened for, keep the loop running
async fn ctrl_c_or_never() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    }
}
