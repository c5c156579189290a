//! Data types for the family graph
//!
//! This module contains all the core records exchanged between the store,
//! the engine and the HTTP layer.

mod person;
mod relationship;
mod tree;
mod user;
mod workflow;

pub use person::{Person, PersonDraft, PersonPatch};
pub use relationship::{Relationship, RelationshipType, Side};
pub use tree::FamilyTree;
pub use user::{Role, User};
pub use workflow::{ClaimDraft, PendingAddition, ProfileClaim, WorkflowStatus};

/// Opaque person identity
pub type PersonId = uuid::Uuid;

/// Opaque user identity
pub type UserId = uuid::Uuid;

/// Opaque relationship identity
pub type RelationshipId = uuid::Uuid;

/// Check if value is zero (for skip_serializing_if)
pub fn is_zero(val: &u64) -> bool {
    *val == 0
}
