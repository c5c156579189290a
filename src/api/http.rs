//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{claims, persons, tokens, validations};
use super::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Token endpoints
        .route("/auth/token", post(tokens::login))
        .route("/auth/refresh", post(tokens::refresh))
        // Persons and the graph around them
        .route("/api/persons", post(persons::create_person))
        .route(
            "/api/persons/:id",
            get(persons::get_person).put(persons::update_person),
        )
        .route("/api/persons/:id/family-tree", get(persons::family_tree))
        .route(
            "/api/persons/:id/family-tree/export",
            get(persons::export_tree),
        )
        .route(
            "/api/persons/:id/relationships",
            post(persons::add_relationship),
        )
        .route("/api/persons/:id/ancestors", get(persons::ancestors))
        .route("/api/persons/:id/descendants", get(persons::descendants))
        // Validation workflow
        .route(
            "/api/validations",
            get(validations::list_pending).post(validations::request_validation),
        )
        .route("/api/validations/:id", get(validations::get_validation))
        .route("/api/validations/:id/approve", post(validations::approve))
        .route("/api/validations/:id/reject", post(validations::reject))
        // Profile claims
        .route(
            "/api/claims",
            get(claims::list_claims).post(claims::create_claim),
        )
        .route("/api/claims/:id", get(claims::get_claim))
        .route("/api/claims/:id/approve", post(claims::approve))
        .route("/api/claims/:id/reject", post(claims::reject))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::JwtAuth;
    use crate::engine::FamilyGraph;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let graph = Arc::new(FamilyGraph::new(Arc::new(MemoryStore::new())));
        let auth = Arc::new(
            JwtAuth::new("test-secret-key-that-is-at-least-32-characters-long").unwrap(),
        );
        Arc::new(AppState::new(graph, auth))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/persons/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 401);
    }
}
