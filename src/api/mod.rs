//! HTTP API for the family graph
//!
//! Thin axum layer: handlers authenticate the caller, call one engine
//! operation and wrap the result in the JSON envelope.

pub mod auth;
pub mod http;
pub mod rest;

use std::sync::Arc;

use crate::engine::FamilyGraph;
use auth::JwtAuth;

pub use http::create_router;

/// Shared state handed to every handler
pub struct AppState {
    pub graph: Arc<FamilyGraph>,
    pub auth: Arc<JwtAuth>,
}

impl AppState {
    pub fn new(graph: Arc<FamilyGraph>, auth: Arc<JwtAuth>) -> Self {
        Self { graph, auth }
    }
}
