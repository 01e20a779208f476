//! Owning-user record.
//!
//! Authentication itself is an external collaborator; this model exists only
//! to anchor per-user data scoping and foreign keys.

use crate::model::validation::{ValidationError, Violations};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a registered user.
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Input for registering a user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new();
        violations.require_len("email", &self.email, 3, 200);
        if !self.email.contains('@') {
            violations.push("email", "must be an email address");
        }
        violations.check_max_len("name", self.name.as_deref(), 100);
        violations.finish()
    }
}
