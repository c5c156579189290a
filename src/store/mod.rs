//! Record store gateway
//!
//! The engine never owns persistence. It reaches people, edges, users and
//! workflow records through [`RecordStore`], which any backend can implement.
//! [`MemoryStore`] is the bundled implementation.

mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::error::GraphResult;
use crate::types::{
    PendingAddition, Person, PersonId, ProfileClaim, Relationship, RelationshipType, User, UserId,
};

/// Point and predicate lookups over the family records
///
/// Implementations must be safe to call from many threads. Edge lookups
/// return edges in a stable order (insertion order for [`MemoryStore`]).
pub trait RecordStore: Send + Sync {
    // Persons

    fn person(&self, id: PersonId) -> GraphResult<Option<Person>>;

    /// Batch fetch; unknown ids are skipped, result order is unspecified
    fn persons_by_ids(&self, ids: &[PersonId]) -> GraphResult<Vec<Person>>;

    /// Insert or replace by id
    fn save_person(&self, person: Person) -> GraphResult<Person>;

    // Relationships

    /// Every edge with `id` in either position
    fn edges_touching(&self, id: PersonId) -> GraphResult<Vec<Relationship>>;

    /// Edges of type `relationship_type` where `id` is person1
    fn edges_from(
        &self,
        id: PersonId,
        relationship_type: RelationshipType,
    ) -> GraphResult<Vec<Relationship>>;

    /// The edge with exactly this ordered (person1, person2, type) triple
    fn find_edge(
        &self,
        person1_id: PersonId,
        person2_id: PersonId,
        relationship_type: RelationshipType,
    ) -> GraphResult<Option<Relationship>>;

    /// Insert all edges in one store operation
    ///
    /// Fails with `InvalidRelationship` and writes nothing when any edge's
    /// `(person1, person2, type)` triple is already stored or repeats within
    /// `edges`. The check and the write happen atomically.
    fn insert_relationships(&self, edges: Vec<Relationship>) -> GraphResult<Vec<Relationship>>;

    // Users

    fn user(&self, id: UserId) -> GraphResult<Option<User>>;

    /// Case-insensitive email lookup
    fn user_by_email(&self, email: &str) -> GraphResult<Option<User>>;

    fn users(&self) -> GraphResult<Vec<User>>;

    /// Insert or replace by id
    fn save_user(&self, user: User) -> GraphResult<User>;

    // Validation workflow

    fn pending_addition(&self, id: Uuid) -> GraphResult<Option<PendingAddition>>;

    fn pending_additions(&self) -> GraphResult<Vec<PendingAddition>>;

    fn save_pending_addition(&self, addition: PendingAddition) -> GraphResult<PendingAddition>;

    /// Insert a new request unless one is already pending for the same
    /// person and requester (`Validation` error); checked atomically
    fn insert_pending_addition(
        &self,
        addition: PendingAddition,
    ) -> GraphResult<PendingAddition>;

    // Profile claims

    fn profile_claim(&self, id: Uuid) -> GraphResult<Option<ProfileClaim>>;

    fn profile_claims(&self) -> GraphResult<Vec<ProfileClaim>>;

    fn save_profile_claim(&self, claim: ProfileClaim) -> GraphResult<ProfileClaim>;

    /// Insert a new claim unless one is already pending for the same person
    /// and user (`Validation` error); checked atomically
    fn insert_profile_claim(&self, claim: ProfileClaim) -> GraphResult<ProfileClaim>;
}
