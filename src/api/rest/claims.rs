//! Profile claim endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::validations::RejectBody;
use super::{created, ok};
use crate::api::auth::CurrentUser;
use crate::api::AppState;
use crate::error::GraphResult;
use crate::types::{ClaimDraft, WorkflowStatus};

/// Query parameters for listing claims
#[derive(Debug, Deserialize)]
pub struct ClaimFilter {
    pub status: Option<WorkflowStatus>,
}

/// POST /api/claims
pub async fn create_claim(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(draft): Json<ClaimDraft>,
) -> GraphResult<Response> {
    Ok(created(state.graph.create_claim(draft, user.id)?))
}

/// GET /api/claims?status=PENDING
pub async fn list_claims(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(filter): Query<ClaimFilter>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.claims(filter.status, user.id)?))
}

/// GET /api/claims/:id
pub async fn get_claim(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.claim(id, user.id)?))
}

/// POST /api/claims/:id/approve
pub async fn approve(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.approve_claim(id, user.id)?))
}

/// POST /api/claims/:id/reject
pub async fn reject(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectBody>>,
) -> GraphResult<Response> {
    let reason = body.and_then(|Json(b)| b.reason);
    Ok(ok(state.graph.reject_claim(id, user.id, reason)?))
}
