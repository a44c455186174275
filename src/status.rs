//! Homework review status catalog
//!
//! The review API reports one of a closed set of status codes. Each maps to a
//! fixed verdict sentence that ends up in the chat verbatim, so the wording is
//! part of the bot's user-facing contract.

use crate::error::Error;
use std::str::FromStr;

/// Review status of a homework submission
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// Reviewed and accepted
    Approved,
    /// Picked up by a reviewer
    Reviewing,
    /// Reviewed, the reviewer left remarks
    Rejected,
}

impl HomeworkStatus {
    /// Every status in the catalog
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Wire code of this status
    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Verdict sentence shown to the user
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| Error::UnknownStatus {
                status: s.to_string(),
            })
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
