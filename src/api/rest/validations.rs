//! Validation request endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{created, ok};
use crate::api::auth::CurrentUser;
use crate::api::AppState;
use crate::error::GraphResult;
use crate::types::PersonId;

#[derive(Debug, Deserialize)]
pub struct ValidationRequestBody {
    #[serde(rename = "personId")]
    pub person_id: PersonId,
}

/// Optional reason given when rejecting a request or a claim
#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/validations
pub async fn request_validation(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(body): Json<ValidationRequestBody>,
) -> GraphResult<Response> {
    Ok(created(state.graph.request_validation(body.person_id, user.id)?))
}

/// GET /api/validations - pending requests visible to the caller
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> GraphResult<Response> {
    Ok(ok(state.graph.pending_validations(user.id)?))
}

/// GET /api/validations/:id
pub async fn get_validation(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.pending_addition(id, user.id)?))
}

/// POST /api/validations/:id/approve
pub async fn approve(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.approve_addition(id, user.id)?))
}

/// POST /api/validations/:id/reject
pub async fn reject(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectBody>>,
) -> GraphResult<Response> {
    let reason = body.and_then(|Json(b)| b.reason);
    Ok(ok(state.graph.reject_addition(id, user.id, reason)?))
}
