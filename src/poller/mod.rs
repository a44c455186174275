//! Poll loop: fetch, validate, notify, sleep, repeat
//!
//! The [`Poller`] owns the only mutable state in the bot: the watermark
//! timestamp passed to the review API, and the text of the last failure alert
//! it delivered. A cycle moves through
//! `Fetching → Validating → (NoChange | Notifying)` and then the loop sleeps
//! for the retry interval.
//!
//! # Failure containment
//!
//! No per-cycle error ends the loop. A fetch, validation or formatting error
//! is a *cycle failure*: it is logged, summarized into an alert for the chat,
//! and the watermark stays where it was so the next cycle asks again. The
//! same alert is never delivered twice in a row.
//!
//! The watermark only moves forward. If the server reports a `current_date`
//! older than the watermark, the watermark is kept.
//!
//! A delivery error on a genuine status change is not a cycle failure. The
//! change was detected, so the watermark still advances; re-announcing the
//! same status every cycle because of a transient delivery problem would be
//! worse than losing one message.

use crate::api_client::HomeworkSource;
use crate::error::{Error, Result};
use crate::formatter::{format_failure, format_status};
use crate::notifier::Notifier;
use crate::types::Timestamp;
use crate::validator;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// What a single poll cycle ended with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response listed no homework changes
    NoChange,
    /// A status change was found and announced
    Notified {
        /// Whether the announcement reached the chat
        delivered: bool,
    },
    /// The cycle failed; the watermark did not move
    Failed {
        /// Whether a failure alert reached the chat
        alerted: bool,
    },
}

/// Periodic homework status checker
pub struct Poller {
    source: Arc<dyn HomeworkSource>,
    notifier: Arc<dyn Notifier>,

    /// Pause between cycles
    retry_time: Duration,

    /// Everything before this timestamp has already been checked
    watermark: Timestamp,

    /// Last failure alert delivered, used to suppress identical repeats
    last_failure: Option<String>,
}

impl Poller {
    /// Create a poller starting from `watermark`
    pub fn new(
        source: Arc<dyn HomeworkSource>,
        notifier: Arc<dyn Notifier>,
        retry_time: Duration,
        watermark: Timestamp,
    ) -> Self {
        Self {
            source,
            notifier,
            retry_time,
            watermark,
            last_failure: None,
        }
    }

    /// Current watermark
    pub fn watermark(&self) -> Timestamp {
        self.watermark
    }

    /// Run cycles forever, sleeping `retry_time` after each one
    pub async fn run(mut self) {
        info!(
            watermark = self.watermark,
            interval = ?self.retry_time,
            "poll loop started"
        );

        loop {
            let outcome = self.run_cycle().await;
            debug!(?outcome, "poll cycle finished");
            sleep(self.retry_time).await;
        }
    }

    /// Run exactly one cycle without sleeping
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(outcome) => {
                self.last_failure = None;
                outcome
            }
            Err(e) => self.handle_failure(e).await,
        }
    }

    async fn poll_once(&mut self) -> Result<CycleOutcome> {
        let since = if self.watermark > 0 {
            self.watermark
        } else {
            chrono::Utc::now().timestamp()
        };

        let raw = self.source.fetch(since).await?;
        let response = validator::validate(&raw)?;

        let Some(record) = response.latest() else {
            info!("no homework status changes");
            self.advance(response.current_date);
            return Ok(CycleOutcome::NoChange);
        };

        let message = format_status(record)?;
        info!(
            homework = record.name.as_deref().unwrap_or_default(),
            status = record.status.as_deref().unwrap_or_default(),
            "new homework status"
        );

        let delivered = match self.notifier.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to deliver status notification");
                false
            }
        };

        self.advance(response.current_date);
        Ok(CycleOutcome::Notified { delivered })
    }

    /// Move the watermark forward; it never moves back
    fn advance(&mut self, current_date: Timestamp) {
        if current_date < self.watermark {
            warn!(
                watermark = self.watermark,
                current_date, "server time went backwards, keeping watermark"
            );
            return;
        }
        self.watermark = current_date;
        info!(watermark = current_date, "watermark updated");
    }

    async fn handle_failure(&mut self, error: Error) -> CycleOutcome {
        if error.is_critical() {
            error!(critical = true, error = %error, "poll cycle failed");
        } else {
            error!(error = %error, "poll cycle failed");
        }

        let alert = format_failure(&error);
        if self.last_failure.as_deref() == Some(alert.as_str()) {
            debug!("same failure as last cycle, alert suppressed");
            return CycleOutcome::Failed { alerted: false };
        }

        match self.notifier.send(&alert).await {
            Ok(()) => {
                self.last_failure = Some(alert);
                CycleOutcome::Failed { alerted: true }
            }
            Err(e) => {
                error!(error = %e, "failed to deliver failure alert");
                CycleOutcome::Failed { alerted: false }
            }
        }
    }
}
