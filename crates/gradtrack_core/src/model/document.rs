//! Document domain model.
//!
//! Versioning is a free-text label; the literal `"auto"` requests
//! derive-next-version semantics handled by the document service.

use crate::model::user::UserId;
use crate::model::validation::{ValidationError, Violations};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a document row.
pub type DocumentId = Uuid;

/// Default version label for a fresh document.
pub const DEFAULT_VERSION: &str = "1";

/// Version label requesting automatic next-version resolution on create.
pub const AUTO_VERSION: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Sop,
    Cv,
    Resume,
    Lor,
    Transcript,
    Other,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sop => "SOP",
            Self::Cv => "CV",
            Self::Resume => "RESUME",
            Self::Lor => "LOR",
            Self::Transcript => "TRANSCRIPT",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SOP" => Some(Self::Sop),
            "CV" => Some(Self::Cv),
            "RESUME" => Some(Self::Resume),
            "LOR" => Some(Self::Lor),
            "TRANSCRIPT" => Some(Self::Transcript),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Canonical document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub version: String,
    pub file_url: Option<String>,
    /// Inline text body, bounded to 50k characters.
    pub content: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Create input. `version` defaults to [`DEFAULT_VERSION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

impl NewDocument {
    pub fn new(name: impl Into<String>, doc_type: DocumentType) -> Self {
        Self {
            name: name.into(),
            doc_type,
            version: default_version(),
            file_url: None,
            content: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.require_len("name", self.name.trim(), 1, 200);
        violations.require_len("version", self.version.trim(), 1, 20);
        violations.check_url("fileUrl", self.file_url.as_deref());
        violations.check_max_len("content", self.content.as_deref(), 50_000);
        violations.finish()
    }
}

/// Partial update. Outer `None` leaves the field untouched; for nullable
/// fields an inner `None` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub version: Option<String>,
    pub file_url: Option<Option<String>>,
    pub content: Option<Option<String>>,
}

impl DocumentPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        if let Some(name) = self.name.as_deref() {
            violations.require_len("name", name.trim(), 1, 200);
        }
        if let Some(version) = self.version.as_deref() {
            violations.require_len("version", version.trim(), 1, 20);
        }
        if let Some(file_url) = &self.file_url {
            violations.check_url("fileUrl", file_url.as_deref());
        }
        if let Some(content) = &self.content {
            violations.check_max_len("content", content.as_deref(), 50_000);
        }
        violations.finish()
    }
}
