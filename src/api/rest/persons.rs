//! Person endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::{created, ok};
use crate::api::auth::CurrentUser;
use crate::api::AppState;
use crate::error::{GraphError, GraphResult};
use crate::export::TextRenderer;
use crate::types::{PersonDraft, PersonId, PersonPatch, RelationshipType};

/// Query parameters for ancestor and descendant walks
#[derive(Debug, Deserialize)]
pub struct DepthParams {
    #[serde(rename = "maxDepth")]
    pub max_depth: Option<i32>,
}

impl DepthParams {
    /// Depth must be at least 1 when given
    pub fn validated(&self) -> GraphResult<Option<i32>> {
        match self.max_depth {
            Some(depth) if depth < 1 => Err(GraphError::Validation(
                "maxDepth must be at least 1".to_string(),
            )),
            other => Ok(other),
        }
    }
}

/// Body of POST /api/persons/:id/relationships
#[derive(Debug, Deserialize)]
pub struct AddRelationshipBody {
    #[serde(rename = "relatedPersonId")]
    pub related_person_id: PersonId,
    #[serde(rename = "relationshipType")]
    pub relationship_type: RelationshipType,
}

/// POST /api/persons
pub async fn create_person(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(draft): Json<PersonDraft>,
) -> GraphResult<Response> {
    let person = state.graph.create_person(draft, user.id)?;
    Ok(created(person))
}

/// GET /api/persons/:id
pub async fn get_person(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.get_person(id, user.id)?))
}

/// PUT /api/persons/:id
pub async fn update_person(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
    Json(patch): Json<PersonPatch>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.update_person(id, patch, user.id)?))
}

/// GET /api/persons/:id/family-tree
pub async fn family_tree(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
) -> GraphResult<Response> {
    Ok(ok(state.graph.family_tree(id, user.id)?))
}

/// GET /api/persons/:id/family-tree/export - plain-text tree as a download
pub async fn export_tree(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
) -> GraphResult<Response> {
    let export = state.graph.export_tree(id, user.id, &TextRenderer)?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [(CONTENT_TYPE, export.content_type.to_string()), (CONTENT_DISPOSITION, disposition)],
        export.bytes,
    )
        .into_response())
}

/// POST /api/persons/:id/relationships - the path person is person1
pub async fn add_relationship(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
    Json(body): Json<AddRelationshipBody>,
) -> GraphResult<Response> {
    let edge = state.graph.add_relationship(
        id,
        body.related_person_id,
        body.relationship_type,
        user.id,
    )?;
    Ok(created(edge))
}

/// GET /api/persons/:id/ancestors?maxDepth=
pub async fn ancestors(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
    Query(params): Query<DepthParams>,
) -> GraphResult<Response> {
    let depth = params.validated()?;
    Ok(ok(state.graph.ancestors(id, user.id, depth)?))
}

/// GET /api/persons/:id/descendants?maxDepth=
pub async fn descendants(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<PersonId>,
    Query(params): Query<DepthParams>,
) -> GraphResult<Response> {
    let depth = params.validated()?;
    Ok(ok(state.graph.descendants(id, user.id, depth)?))
}
