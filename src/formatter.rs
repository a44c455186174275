//! Notification text for homework status changes

use crate::error::{Error, Result};
use crate::status::HomeworkStatus;
use crate::types::HomeworkRecord;

/// Build the chat message announcing a homework's new status
///
/// A record without a name (absent or blank) is rejected with
/// [`Error::MissingField`] rather than announced with an empty title. Missing
/// fields are checked before the status code is looked up in the catalog.
pub fn format_status(record: &HomeworkRecord) -> Result<String> {
    let name = record
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or(Error::MissingField {
            field: "homework_name",
        })?;

    let code = record
        .status
        .as_deref()
        .ok_or(Error::MissingField { field: "status" })?;

    let status: HomeworkStatus = code.parse()?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

/// Build the alert sent to the chat when a poll cycle fails
pub fn format_failure(error: &Error) -> String {
    format!("Сбой в работе программы: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_every_known_status() {
        for status in HomeworkStatus::ALL {
            let record = HomeworkRecord::new("hw_api_final", status.code());
            assert_eq!(
                format_status(&record).unwrap(),
                format!(
                    "Изменился статус проверки работы \"hw_api_final\". {}",
                    status.verdict()
                )
            );
        }
    }

    #[test]
    fn approved_message_is_exact() {
        let record = HomeworkRecord::new("username__hw_python_oop.zip", "approved");
        assert_eq!(
            format_status(&record).unwrap(),
            "Изменился статус проверки работы \"username__hw_python_oop.zip\". \
             Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn unknown_status_is_reported() {
        let record = HomeworkRecord::new("hw", "on_hold");
        match format_status(&record) {
            Err(Error::UnknownStatus { status }) => assert_eq!(status, "on_hold"),
            other => panic!("expected UnknownStatus, got {:?}", other),
        }
    }

    #[test]
    fn missing_status_is_distinct_from_unknown_status() {
        let record = HomeworkRecord {
            name: Some("hw".into()),
            status: None,
        };
        assert!(matches!(
            format_status(&record),
            Err(Error::MissingField { field: "status" })
        ));
    }

    #[test]
    fn missing_name_is_rejected() {
        let record = HomeworkRecord {
            name: None,
            status: Some("approved".into()),
        };
        assert!(matches!(
            format_status(&record),
            Err(Error::MissingField {
                field: "homework_name"
            })
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let record = HomeworkRecord::new("   ", "approved");
        assert!(matches!(
            format_status(&record),
            Err(Error::MissingField {
                field: "homework_name"
            })
        ));
    }

    #[test]
    fn failure_alert_wraps_error_text() {
        let error = Error::Transport("connection refused".into());
        assert_eq!(
            format_failure(&error),
            "Сбой в работе программы: request to the review API failed: connection refused"
        );
    }
}
