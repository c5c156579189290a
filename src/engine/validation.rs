//! Requests to promote a private person to the public tree

use log::info;
use uuid::Uuid;

use super::{permission, FamilyGraph};
use crate::error::{GraphError, GraphResult};
use crate::notify::Notification;
use crate::types::{PendingAddition, PersonId, Role, UserId, WorkflowStatus};
use crate::utils::current_timestamp;

/// Ask the admins to make a person the requester created public
pub fn request_validation(
    graph: &FamilyGraph,
    person_id: PersonId,
    user_id: UserId,
) -> GraphResult<PendingAddition> {
    let user = graph.acting_user(user_id)?;
    if user.role != Role::ValidatedUser {
        return Err(GraphError::Validation(
            "only validated users can request a validation".to_string(),
        ));
    }

    let person = graph.require_person(person_id)?;
    if person.is_public {
        return Err(GraphError::Validation("person is already public".to_string()));
    }
    if person.created_by != Some(user.id) {
        return Err(GraphError::Validation(
            "you can only request validation for persons you created".to_string(),
        ));
    }

    let mut addition = PendingAddition::new(person_id, user.id);
    addition.created_at = current_timestamp();
    let addition = graph.store().insert_pending_addition(addition)?;
    info!("Validation {} requested by {} for {}", addition.id, user.email, person_id);

    let requester = user.display_name();
    let person_name = person.full_name();
    for email in graph.admin_emails()? {
        graph.notify(Notification::validation_request(&email, &requester, &person_name));
    }

    Ok(addition)
}

/// Approve a pending request and make the person public
pub fn approve_addition(
    graph: &FamilyGraph,
    addition_id: Uuid,
    admin_id: UserId,
) -> GraphResult<PendingAddition> {
    let admin = graph.acting_user(admin_id)?;
    permission::authorize_admin(&admin)?;
    let mut addition = pending(graph, addition_id)?;

    let mut person = graph.require_person(addition.person_id)?;
    let now = current_timestamp();
    person.is_public = true;
    person.validated_by = Some(admin.id);
    person.updated_at = now;
    let person = graph.store().save_person(person)?;

    addition.status = WorkflowStatus::Approved;
    addition.processed_by = Some(admin.id);
    addition.processed_at = Some(now);
    let addition = graph.store().save_pending_addition(addition)?;
    info!("Validation {} approved by {}", addition.id, admin.email);

    if let Some(requester) = graph.store().user(addition.requested_by)? {
        graph.notify(Notification::approval(&requester.email, &person.full_name(), false));
    }

    Ok(addition)
}

/// Reject a pending request; the person stays private
pub fn reject_addition(
    graph: &FamilyGraph,
    addition_id: Uuid,
    admin_id: UserId,
    reason: Option<String>,
) -> GraphResult<PendingAddition> {
    let admin = graph.acting_user(admin_id)?;
    permission::authorize_admin(&admin)?;
    let mut addition = pending(graph, addition_id)?;

    addition.status = WorkflowStatus::Rejected;
    addition.processed_by = Some(admin.id);
    addition.processed_at = Some(current_timestamp());
    addition.rejection_reason = reason;
    let addition = graph.store().save_pending_addition(addition)?;
    info!("Validation {} rejected by {}", addition.id, admin.email);

    let requester = graph.store().user(addition.requested_by)?;
    let person = graph.store().person(addition.person_id)?;
    if let (Some(requester), Some(person)) = (requester, person) {
        graph.notify(Notification::rejection(
            &requester.email,
            &person.full_name(),
            addition.rejection_reason.as_deref().unwrap_or_default(),
            false,
        ));
    }

    Ok(addition)
}

/// Pending requests: all of them for admins, the user's own otherwise
pub fn pending_validations(
    graph: &FamilyGraph,
    user_id: UserId,
) -> GraphResult<Vec<PendingAddition>> {
    let user = graph.acting_user(user_id)?;
    let admin = permission::is_super_admin(&user);
    Ok(graph
        .store()
        .pending_additions()?
        .into_iter()
        .filter(|a| a.is_pending() && (admin || a.requested_by == user.id))
        .collect())
}

/// One request, visible to admins and its requester
pub fn pending_addition(
    graph: &FamilyGraph,
    addition_id: Uuid,
    user_id: UserId,
) -> GraphResult<PendingAddition> {
    let user = graph.acting_user(user_id)?;
    let addition = graph
        .store()
        .pending_addition(addition_id)?
        .ok_or_else(|| GraphError::NotFound(format!("validation request {}", addition_id)))?;

    if permission::is_super_admin(&user) || addition.requested_by == user.id {
        Ok(addition)
    } else {
        Err(GraphError::PermissionDenied(
            "you do not have permission to view this request".to_string(),
        ))
    }
}

fn pending(graph: &FamilyGraph, addition_id: Uuid) -> GraphResult<PendingAddition> {
    let addition = graph
        .store()
        .pending_addition(addition_id)?
        .ok_or_else(|| GraphError::NotFound(format!("validation request {}", addition_id)))?;
    if !addition.is_pending() {
        return Err(GraphError::Validation(
            "validation request was already processed".to_string(),
        ));
    }
    Ok(addition)
}
