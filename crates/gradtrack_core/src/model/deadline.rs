//! Deadline domain model.

use crate::model::university::UniversityId;
use crate::model::user::UserId;
use crate::model::validation::{ValidationError, Violations};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a deadline row.
pub type DeadlineId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    Application,
    Lor,
    Transcript,
    Interview,
    Decision,
    Other,
}

impl DeadlineType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::Lor => "LOR",
            Self::Transcript => "TRANSCRIPT",
            Self::Interview => "INTERVIEW",
            Self::Decision => "DECISION",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "APPLICATION" => Some(Self::Application),
            "LOR" => Some(Self::Lor),
            "TRANSCRIPT" => Some(Self::Transcript),
            "INTERVIEW" => Some(Self::Interview),
            "DECISION" => Some(Self::Decision),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Canonical deadline record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    pub id: DeadlineId,
    pub user_id: UserId,
    pub title: String,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    pub completed: bool,
    pub university_id: Option<UniversityId>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Create input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeadline {
    pub title: String,
    #[serde(rename = "type")]
    pub deadline_type: DeadlineType,
    pub date: NaiveDate,
    #[serde(default)]
    pub university_id: Option<UniversityId>,
}

impl NewDeadline {
    pub fn new(title: impl Into<String>, deadline_type: DeadlineType, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            deadline_type,
            date,
            university_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.require_len("title", self.title.trim(), 1, 200);
        violations.finish()
    }
}

/// Partial update. Outer `None` leaves the field untouched; an inner `None`
/// on `university_id` clears the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadlinePatch {
    pub title: Option<String>,
    pub deadline_type: Option<DeadlineType>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
    pub university_id: Option<Option<UniversityId>>,
}

impl DeadlinePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if let Some(title) = self.title.as_deref() {
            violations.require_len("title", title.trim(), 1, 200);
        }
        violations.finish()
    }
}
