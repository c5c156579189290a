//! Profile claims: a user asks to be linked to an existing person

use log::info;
use uuid::Uuid;

use super::{permission, FamilyGraph};
use crate::error::{GraphError, GraphResult};
use crate::notify::Notification;
use crate::types::{ClaimDraft, ProfileClaim, Role, UserId, WorkflowStatus};
use crate::utils::current_timestamp;

pub fn create_claim(
    graph: &FamilyGraph,
    draft: ClaimDraft,
    user_id: UserId,
) -> GraphResult<ProfileClaim> {
    let user = graph.acting_user(user_id)?;
    if user.linked_person_id.is_some() {
        return Err(GraphError::Validation(
            "your account is already linked to a person".to_string(),
        ));
    }

    let person = graph.require_person(draft.person_id)?;
    let mut claim = ProfileClaim::from_draft(draft, user.id);
    claim.created_at = current_timestamp();
    let claim = graph.store().insert_profile_claim(claim)?;
    info!("Claim {} on {} created by {}", claim.id, person.id, user.email);

    let claimant = claim.claimant_name();
    let person_name = person.full_name();
    for email in graph.admin_emails()? {
        graph.notify(Notification::claim_request(&email, &claimant, &person_name));
    }

    Ok(claim)
}

/// Link the claimant to the person and promote them to validated user
pub fn approve_claim(
    graph: &FamilyGraph,
    claim_id: Uuid,
    admin_id: UserId,
) -> GraphResult<ProfileClaim> {
    let admin = graph.acting_user(admin_id)?;
    permission::authorize_admin(&admin)?;
    let mut claim = pending(graph, claim_id)?;

    let person = graph.require_person(claim.person_id)?;
    let mut claimant = graph.acting_user(claim.user_id)?;
    claimant.linked_person_id = Some(person.id);
    if claimant.role == Role::PendingUser {
        claimant.role = Role::ValidatedUser;
    }
    let claimant = graph.store().save_user(claimant)?;

    claim.status = WorkflowStatus::Approved;
    claim.processed_by = Some(admin.id);
    claim.processed_at = Some(current_timestamp());
    let claim = graph.store().save_profile_claim(claim)?;
    info!(
        "Claim {} approved by {}; {} linked to {}",
        claim.id, admin.email, claimant.email, person.id
    );

    graph.notify(Notification::approval(&claimant.email, &person.full_name(), true));
    Ok(claim)
}

pub fn reject_claim(
    graph: &FamilyGraph,
    claim_id: Uuid,
    admin_id: UserId,
    reason: Option<String>,
) -> GraphResult<ProfileClaim> {
    let admin = graph.acting_user(admin_id)?;
    permission::authorize_admin(&admin)?;
    let mut claim = pending(graph, claim_id)?;

    claim.status = WorkflowStatus::Rejected;
    claim.processed_by = Some(admin.id);
    claim.processed_at = Some(current_timestamp());
    claim.rejection_reason = reason;
    let claim = graph.store().save_profile_claim(claim)?;
    info!("Claim {} rejected by {}", claim.id, admin.email);

    // the claimant's account address, never the one typed into the claim
    if let Some(claimant) = graph.store().user(claim.user_id)? {
        let person_name = match graph.store().person(claim.person_id)? {
            Some(person) => person.full_name(),
            None => claim.person_id.to_string(),
        };
        graph.notify(Notification::rejection(
            &claimant.email,
            &person_name,
            claim.rejection_reason.as_deref().unwrap_or_default(),
            true,
        ));
    }

    Ok(claim)
}

/// Claims, optionally by status: all of them for admins, the user's own otherwise
pub fn claims(
    graph: &FamilyGraph,
    status: Option<WorkflowStatus>,
    user_id: UserId,
) -> GraphResult<Vec<ProfileClaim>> {
    let user = graph.acting_user(user_id)?;
    let admin = permission::is_super_admin(&user);
    Ok(graph
        .store()
        .profile_claims()?
        .into_iter()
        .filter(|c| admin || c.user_id == user.id)
        .filter(|c| status.map_or(true, |s| c.status == s))
        .collect())
}

pub fn claim(graph: &FamilyGraph, claim_id: Uuid, user_id: UserId) -> GraphResult<ProfileClaim> {
    let user = graph.acting_user(user_id)?;
    let claim = find(graph, claim_id)?;
    if permission::is_super_admin(&user) || claim.user_id == user.id {
        Ok(claim)
    } else {
        Err(GraphError::PermissionDenied(
            "you do not have permission to view this claim".to_string(),
        ))
    }
}

fn find(graph: &FamilyGraph, claim_id: Uuid) -> GraphResult<ProfileClaim> {
    graph
        .store()
        .profile_claim(claim_id)?
        .ok_or_else(|| GraphError::NotFound(format!("profile claim {}", claim_id)))
}

fn pending(graph: &FamilyGraph, claim_id: Uuid) -> GraphResult<ProfileClaim> {
    let claim = find(graph, claim_id)?;
    if !claim.is_pending() {
        return Err(GraphError::Validation("claim was already processed".to_string()));
    }
    Ok(claim)
}
