//! Token endpoints

use std::sync::Arc;

use axum::{extract::State, response::Response, Json};
use log::info;
use serde::Deserialize;

use super::ok;
use crate::api::AppState;
use crate::error::GraphResult;

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// POST /auth/token - email and password for a token pair
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginBody>,
) -> GraphResult<Response> {
    let user = state
        .auth
        .authenticate(state.graph.store(), &body.email, &body.password)?;
    let tokens = state.auth.generate_tokens(&user)?;
    info!("User {} logged in", user.email);
    Ok(ok(tokens))
}

/// POST /auth/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshBody>,
) -> GraphResult<Response> {
    let tokens = state
        .auth
        .refresh_access_token(state.graph.store(), &body.refresh_token)?;
    Ok(ok(tokens))
}
