//! Core types for homework-status-bot

use serde::Deserialize;

/// Unix timestamp in seconds, as used by the review API
pub type Timestamp = i64;

/// One homework entry from the review API
///
/// Both fields are optional on the wire. Whether their absence is acceptable
/// is decided when the record is formatted, not when it is decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct HomeworkRecord {
    /// Homework title
    #[serde(rename = "homework_name", default)]
    pub name: Option<String>,

    /// Raw status code
    #[serde(default)]
    pub status: Option<String>,
}

impl HomeworkRecord {
    /// Create a record with both fields present
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
        }
    }
}

/// A review API response that passed shape validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    /// Homeworks changed since the requested timestamp, most recent first
    pub homeworks: Vec<HomeworkRecord>,

    /// Server time the response was produced at; the next watermark
    pub current_date: Timestamp,
}

impl ApiResponse {
    /// Most recent homework in the response, if any
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_reads_wire_field_names() {
        let record: HomeworkRecord = serde_json::from_value(json!({
            "id": 124,
            "homework_name": "username__hw_python_oop.zip",
            "status": "approved",
            "reviewer_comment": "Всё нравится",
            "lesson_name": "Итоговый проект"
        }))
        .unwrap();

        assert_eq!(
            record,
            HomeworkRecord::new("username__hw_python_oop.zip", "approved")
        );
    }

    #[test]
    fn record_tolerates_missing_fields() {
        let record: HomeworkRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record.name, None);
        assert_eq!(record.status, None);
    }

    #[test]
    fn latest_is_first_homework() {
        let response = ApiResponse {
            homeworks: vec![
                HomeworkRecord::new("second", "reviewing"),
                HomeworkRecord::new("first", "approved"),
            ],
            current_date: 1_700_000_000,
        };
        assert_eq!(response.latest().and_then(|r| r.name.as_deref()), Some("second"));
    }

    #[test]
    fn latest_of_empty_response_is_none() {
        let response = ApiResponse {
            homeworks: vec![],
            current_date: 0,
        };
        assert!(response.latest().is_none());
    }
}
