//! Error types for homework-status-bot
//!
//! Every failure the bot can hit is one variant of [`Error`]. The variants
//! double as the classification the poll loop uses to decide how loudly to
//! log.

use thiserror::Error;

/// Result type alias for homework-status-bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for homework-status-bot
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure reaching the review API (timeout, refused, DNS)
    #[error("request to the review API failed: {0}")]
    Transport(String),

    /// The review API answered, but not with a usable response
    #[error("review API protocol error: {0}")]
    Protocol(String),

    /// The response body decoded, but does not have the expected shape
    #[error("malformed review API response: {0}")]
    MalformedResponse(String),

    /// A homework carries a status code missing from the status catalog
    #[error("undocumented homework status: {status}")]
    UnknownStatus {
        /// The status code as received
        status: String,
    },

    /// A homework record lacks a field required to build a notification
    #[error("homework record is missing field \"{field}\"")]
    MissingField {
        /// Name of the absent field as it appears on the wire
        field: &'static str,
    },

    /// The bot API rejected the message or could not be reached
    #[error("failed to deliver message: {0}")]
    Delivery(String),

    /// Configuration error with context about which settings are invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The environment keys that caused the error
        keys: Vec<String>,
    },
}

impl Error {
    /// Whether this error is logged at critical severity
    ///
    /// Data-contract violations (the upstream answered with something we do
    /// not understand) and configuration problems are critical. Transport and
    /// delivery failures are ordinary errors.
    pub fn is_critical(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Delivery(_) => false,
            Error::Protocol(_)
            | Error::MalformedResponse(_)
            | Error::UnknownStatus { .. }
            | Error::MissingField { .. }
            | Error::Config { .. } => true,
        }
    }

    /// Build a configuration error for a single key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            keys: vec![key.into()],
        }
    }
}

/// Map a reqwest failure from the review API call into the taxonomy
///
/// Timeouts and connection failures are transport errors. Body decoding
/// problems mean the server did answer, so they are protocol errors.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            Error::Transport(e.to_string())
        } else if e.is_decode() || e.is_body() {
            Error::Protocol(format!("failed to decode response body: {}", e))
        } else if let Some(status) = e.status() {
            Error::Protocol(format!("unexpected HTTP status {}", status.as_u16()))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_error_variants() -> Vec<(Error, bool)> {
        vec![
            (Error::Transport("connection refused".into()), false),
            (Error::Protocol("unexpected HTTP status 500".into()), true),
            (Error::MalformedResponse("homeworks is absent".into()), true),
            (
                Error::UnknownStatus {
                    status: "graded".into(),
                },
                true,
            ),
            (Error::MissingField { field: "status" }, true),
            (Error::Delivery("chat not found".into()), false),
            (Error::config("TELEGRAM_TOKEN is not set", "TELEGRAM_TOKEN"), true),
        ]
    }

    #[test]
    fn every_variant_maps_to_expected_severity() {
        for (error, critical) in all_error_variants() {
            assert_eq!(
                error.is_critical(),
                critical,
                "unexpected severity for {:?}",
                error
            );
        }
    }

    #[test]
    fn unknown_status_display_names_the_status() {
        let error = Error::UnknownStatus {
            status: "graded".into(),
        };
        assert_eq!(error.to_string(), "undocumented homework status: graded");
    }

    #[test]
    fn missing_field_display_names_the_field() {
        let error = Error::MissingField {
            field: "homework_name",
        };
        assert_eq!(
            error.to_string(),
            "homework record is missing field \"homework_name\""
        );
    }

    #[test]
    fn config_helper_records_single_key() {
        match Error::config("bad value", "RETRY_TIME_SECS") {
            Error::Config { message, keys } => {
                assert_eq!(message, "bad value");
                assert_eq!(keys, vec!["RETRY_TIME_SECS".to_string()]);
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
