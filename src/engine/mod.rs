//! Family graph engine
//!
//! Relationship-graph traversal and visibility filtering over records fetched
//! from a [`RecordStore`]. The engine holds no graph state of its own; every
//! call works on fresh lookups and returns plain records for the caller to
//! serialize.

mod claims;
mod mutation;
pub mod permission;
mod traversal;
mod tree;
mod validation;

use std::sync::Arc;

use log::warn;
use uuid::Uuid;

use crate::error::{GraphError, GraphResult};
use crate::export::{TreeExport, TreeRenderer};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::store::RecordStore;
use crate::types::{
    ClaimDraft, FamilyTree, PendingAddition, Person, PersonDraft, PersonId, PersonPatch,
    ProfileClaim, Relationship, RelationshipType, User, UserId, WorkflowStatus,
};

pub use traversal::Direction;

/// Depth used when the caller gives none
pub const DEFAULT_DEPTH: i32 = 5;

/// Hard ceiling on traversal depth, whatever the caller asks for
pub const MAX_DEPTH: i32 = 20;

/// Tunables for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub default_depth: i32,
    pub max_depth: i32,
    /// Insert the reciprocal edge together with every new edge
    pub reciprocal_edges: bool,
}

impl EngineSettings {
    /// Resolve a caller-supplied depth against the default and the ceiling
    pub fn effective_depth(&self, requested: Option<i32>) -> i32 {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_DEPTH,
            max_depth: MAX_DEPTH,
            reciprocal_edges: false,
        }
    }
}

/// Entry point for every family graph operation
pub struct FamilyGraph {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) settings: EngineSettings,
}

impl FamilyGraph {
    /// Create an engine over `store` with default settings and a logging notifier
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            notifier: Arc::new(LogNotifier),
            settings: EngineSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Resolve the acting user or fail with `UserNotFound`
    pub(crate) fn acting_user(&self, user_id: UserId) -> GraphResult<User> {
        self.store
            .user(user_id)?
            .ok_or_else(|| GraphError::UserNotFound(user_id.to_string()))
    }

    /// Resolve a person or fail with `PersonNotFound`
    pub(crate) fn require_person(&self, person_id: PersonId) -> GraphResult<Person> {
        self.store
            .person(person_id)?
            .ok_or_else(|| GraphError::PersonNotFound(person_id.to_string()))
    }

    /// Send a notification; delivery failures never fail the caller
    pub(crate) fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.send(&notification) {
            warn!("Failed to notify {}: {}", notification.to, e);
        }
    }

    /// Emails of every super admin
    pub(crate) fn admin_emails(&self) -> GraphResult<Vec<String>> {
        Ok(self
            .store
            .users()?
            .into_iter()
            .filter(|u| u.is_super_admin())
            .map(|u| u.email)
            .collect())
    }
}

impl FamilyGraph {
    // Visibility (from permission.rs)

    /// Whether `user_id` may see `person_id`
    pub fn can_view(&self, user_id: UserId, person_id: PersonId) -> GraphResult<bool> {
        let user = self.acting_user(user_id)?;
        let person = self.require_person(person_id)?;
        permission::can_view(self.store(), &user, &person)
    }

    pub fn can_edit(&self, user_id: UserId, person_id: PersonId) -> GraphResult<bool> {
        let user = self.acting_user(user_id)?;
        Ok(permission::can_edit(&user, person_id))
    }

    pub fn can_add_person(&self, user_id: UserId) -> GraphResult<bool> {
        let user = self.acting_user(user_id)?;
        Ok(permission::can_add_person(&user))
    }

    /// Drop every person `user_id` may not see, keeping input order
    pub fn filter_visible(
        &self,
        user_id: UserId,
        persons: Vec<Person>,
    ) -> GraphResult<Vec<Person>> {
        let user = self.acting_user(user_id)?;
        permission::filter_visible(self.store(), &user, persons)
    }

    // Persons and edges (from mutation.rs)

    pub fn get_person(&self, person_id: PersonId, user_id: UserId) -> GraphResult<Person> {
        mutation::get_person(self, person_id, user_id)
    }

    pub fn create_person(&self, draft: PersonDraft, user_id: UserId) -> GraphResult<Person> {
        mutation::create_person(self, draft, user_id)
    }

    pub fn update_person(
        &self,
        person_id: PersonId,
        patch: PersonPatch,
        user_id: UserId,
    ) -> GraphResult<Person> {
        mutation::update_person(self, person_id, patch, user_id)
    }

    pub fn add_relationship(
        &self,
        person1_id: PersonId,
        person2_id: PersonId,
        relationship_type: RelationshipType,
        user_id: UserId,
    ) -> GraphResult<Relationship> {
        mutation::add_relationship(self, person1_id, person2_id, relationship_type, user_id)
    }

    // Tree assembly (from tree.rs)

    pub fn family_tree(&self, person_id: PersonId, user_id: UserId) -> GraphResult<FamilyTree> {
        tree::family_tree(self, person_id, user_id)
    }

    /// Assemble the tree of `person_id` and render it with `renderer`
    pub fn export_tree(
        &self,
        person_id: PersonId,
        user_id: UserId,
        renderer: &dyn TreeRenderer,
    ) -> GraphResult<TreeExport> {
        let tree = self.family_tree(person_id, user_id)?;
        TreeExport::render(&tree, renderer)
    }

    // Bounded traversal (from traversal.rs)

    pub fn ancestors(
        &self,
        person_id: PersonId,
        user_id: UserId,
        max_depth: Option<i32>,
    ) -> GraphResult<Vec<Person>> {
        traversal::walk(self, person_id, user_id, max_depth, Direction::Ancestors)
    }

    pub fn descendants(
        &self,
        person_id: PersonId,
        user_id: UserId,
        max_depth: Option<i32>,
    ) -> GraphResult<Vec<Person>> {
        traversal::walk(self, person_id, user_id, max_depth, Direction::Descendants)
    }

    // Validation workflow (from validation.rs)

    pub fn request_validation(
        &self,
        person_id: PersonId,
        user_id: UserId,
    ) -> GraphResult<PendingAddition> {
        validation::request_validation(self, person_id, user_id)
    }

    pub fn approve_addition(
        &self,
        addition_id: Uuid,
        admin_id: UserId,
    ) -> GraphResult<PendingAddition> {
        validation::approve_addition(self, addition_id, admin_id)
    }

    pub fn reject_addition(
        &self,
        addition_id: Uuid,
        admin_id: UserId,
        reason: Option<String>,
    ) -> GraphResult<PendingAddition> {
        validation::reject_addition(self, addition_id, admin_id, reason)
    }

    pub fn pending_validations(&self, user_id: UserId) -> GraphResult<Vec<PendingAddition>> {
        validation::pending_validations(self, user_id)
    }

    pub fn pending_addition(
        &self,
        addition_id: Uuid,
        user_id: UserId,
    ) -> GraphResult<PendingAddition> {
        validation::pending_addition(self, addition_id, user_id)
    }

    // Profile claims (from claims.rs)

    pub fn create_claim(&self, draft: ClaimDraft, user_id: UserId) -> GraphResult<ProfileClaim> {
        claims::create_claim(self, draft, user_id)
    }

    pub fn approve_claim(&self, claim_id: Uuid, admin_id: UserId) -> GraphResult<ProfileClaim> {
        claims::approve_claim(self, claim_id, admin_id)
    }

    pub fn reject_claim(
        &self,
        claim_id: Uuid,
        admin_id: UserId,
        reason: Option<String>,
    ) -> GraphResult<ProfileClaim> {
        claims::reject_claim(self, claim_id, admin_id, reason)
    }

    pub fn claims(
        &self,
        status: Option<WorkflowStatus>,
        user_id: UserId,
    ) -> GraphResult<Vec<ProfileClaim>> {
        claims::claims(self, status, user_id)
    }

    pub fn claim(&self, claim_id: Uuid, user_id: UserId) -> GraphResult<ProfileClaim> {
        claims::claim(self, claim_id, user_id)
    }
}
