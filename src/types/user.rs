//! User accounts

use serde::{Deserialize, Serialize};

use super::{is_zero, PersonId, UserId};

/// Account role; together with the linked person it drives every visibility decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    ValidatedUser,
    PendingUser,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "SUPER_ADMIN"),
            Role::ValidatedUser => write!(f, "VALIDATED_USER"),
            Role::PendingUser => write!(f, "PENDING_USER"),
        }
    }
}

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "givenName", default)]
    pub given_name: String,
    #[serde(rename = "familyName", default)]
    pub family_name: String,
    pub role: Role,
    /// At most one person per user
    #[serde(rename = "linkedPersonId", default)]
    pub linked_person_id: Option<PersonId>,
    /// Stored for password login; no API response carries a `User`
    #[serde(rename = "passwordHash", default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
}

impl User {
    /// Create a new user with a fresh id
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new_v4(),
            email: email.into(),
            given_name: String::new(),
            family_name: String::new(),
            role,
            linked_person_id: None,
            password_hash: None,
            created_at: 0,
        }
    }

    /// Link the user to a person record
    pub fn linked_to(mut self, person_id: PersonId) -> Self {
        self.linked_person_id = Some(person_id);
        self
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// "Given Family", falling back to the email when no name is set
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.given_name, self.family_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}
