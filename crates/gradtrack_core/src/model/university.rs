//! University domain model.
//!
//! # Responsibility
//! - Define the university record, its application-pipeline status and risk
//!   category, and the create/patch inputs.
//!
//! # Invariants
//! - `user_id` never changes after creation.
//! - `status`/`category` are persisted as their uppercase wire names.

use crate::model::user::UserId;
use crate::model::validation::{ValidationError, Violations};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a university row.
pub type UniversityId = Uuid;

/// Application pipeline state for one university.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UniversityStatus {
    Researching,
    PlanningToApply,
    Applied,
    Admitted,
    Rejected,
    Waitlisted,
}

impl UniversityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Researching => "RESEARCHING",
            Self::PlanningToApply => "PLANNING_TO_APPLY",
            Self::Applied => "APPLIED",
            Self::Admitted => "ADMITTED",
            Self::Rejected => "REJECTED",
            Self::Waitlisted => "WAITLISTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RESEARCHING" => Some(Self::Researching),
            "PLANNING_TO_APPLY" => Some(Self::PlanningToApply),
            "APPLIED" => Some(Self::Applied),
            "ADMITTED" => Some(Self::Admitted),
            "REJECTED" => Some(Self::Rejected),
            "WAITLISTED" => Some(Self::Waitlisted),
            _ => None,
        }
    }
}

impl Default for UniversityStatus {
    fn default() -> Self {
        Self::Researching
    }
}

/// Risk classification of a school relative to the applicant's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UniversityCategory {
    Reach,
    Target,
    Safety,
}

impl UniversityCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reach => "REACH",
            Self::Target => "TARGET",
            Self::Safety => "SAFETY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REACH" => Some(Self::Reach),
            "TARGET" => Some(Self::Target),
            "SAFETY" => Some(Self::Safety),
            _ => None,
        }
    }
}

/// Canonical university record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: UniversityId,
    pub user_id: UserId,
    pub name: String,
    pub url: Option<String>,
    pub status: UniversityStatus,
    pub category: UniversityCategory,
    /// Application deadline date.
    pub deadline: Option<NaiveDate>,
    /// Letter-of-recommendation deadline date.
    pub lor_deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Create input. Omitted optionals stay empty; `status` defaults to
/// `Researching`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUniversity {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: UniversityStatus,
    pub category: UniversityCategory,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub lor_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewUniversity {
    /// Minimal constructor with defaulted optionals.
    pub fn new(name: impl Into<String>, category: UniversityCategory) -> Self {
        Self {
            name: name.into(),
            url: None,
            status: UniversityStatus::default(),
            category,
            deadline: None,
            lor_deadline: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.require_len("name", self.name.trim(), 1, 200);
        violations.check_url("url", self.url.as_deref());
        violations.check_max_len("notes", self.notes.as_deref(), 1000);
        violations.finish()
    }
}

/// Partial update. Outer `None` leaves the field untouched; for nullable
/// fields an inner `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityPatch {
    pub name: Option<String>,
    pub url: Option<Option<String>>,
    pub status: Option<UniversityStatus>,
    pub category: Option<UniversityCategory>,
    pub deadline: Option<Option<NaiveDate>>,
    pub lor_deadline: Option<Option<NaiveDate>>,
    pub notes: Option<Option<String>>,
}

impl UniversityPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if let Some(name) = self.name.as_deref() {
            violations.require_len("name", name.trim(), 1, 200);
        }
        if let Some(url) = &self.url {
            violations.check_url("url", url.as_deref());
        }
        if let Some(notes) = &self.notes {
            violations.check_max_len("notes", notes.as_deref(), 1000);
        }
        violations.finish()
    }
}
