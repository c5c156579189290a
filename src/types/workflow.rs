//! Validation requests and profile claims

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_zero, PersonId, UserId};

/// Lifecycle of a validation request or a profile claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Request to promote a private person to public
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAddition {
    pub id: Uuid,
    #[serde(rename = "personId")]
    pub person_id: PersonId,
    #[serde(rename = "requestedBy")]
    pub requested_by: UserId,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(rename = "processedBy", default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<UserId>,
    #[serde(rename = "processedAt", default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<u64>,
    #[serde(rename = "rejectionReason", default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
}

impl PendingAddition {
    pub fn new(person_id: PersonId, requested_by: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            requested_by,
            status: WorkflowStatus::Pending,
            processed_by: None,
            processed_at: None,
            rejection_reason: None,
            created_at: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == WorkflowStatus::Pending
    }
}

/// Fields a user submits when claiming a person as their own profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDraft {
    #[serde(rename = "personId")]
    pub person_id: PersonId,
    pub email: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
}

/// A user's claim that a person record is themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileClaim {
    pub id: Uuid,
    #[serde(rename = "personId")]
    pub person_id: PersonId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub email: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(rename = "processedBy", default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<UserId>,
    #[serde(rename = "processedAt", default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<u64>,
    #[serde(rename = "rejectionReason", default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "is_zero")]
    pub created_at: u64,
}

impl ProfileClaim {
    pub fn from_draft(draft: ClaimDraft, user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id: draft.person_id,
            user_id,
            email: draft.email,
            given_name: draft.given_name,
            family_name: draft.family_name,
            birth_date: draft.birth_date,
            status: WorkflowStatus::Pending,
            processed_by: None,
            processed_at: None,
            rejection_reason: None,
            created_at: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == WorkflowStatus::Pending
    }

    pub fn claimant_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}
