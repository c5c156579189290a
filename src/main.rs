//! Family Graph Server - Binary Entry Point
//!
//! This is the main entry point for the family-server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use family_graph::api::auth::{hash_password, JwtAuth};
use family_graph::api::{create_router, AppState};
use family_graph::config::{AdminBootstrap, Config};
use family_graph::utils::current_timestamp;
use family_graph::{FamilyGraph, MemoryStore, RecordStore, Role, User};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.log_level.as_str()),
    )
    .init();

    let store = Arc::new(
        MemoryStore::open(&config.data_path)
            .with_context(|| format!("failed to open {}", config.data_path.display()))?,
    );

    if let Some(admin) = &config.admin {
        bootstrap_admin(store.as_ref(), admin)?;
    }

    let graph = Arc::new(FamilyGraph::new(store).with_settings(config.engine_settings()));
    let auth = Arc::new(JwtAuth::from_config(&config)?);
    let app = create_router(Arc::new(AppState::new(graph, auth)));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!("Family graph server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Create the configured super admin unless that email already exists
fn bootstrap_admin(store: &dyn RecordStore, admin: &AdminBootstrap) -> Result<()> {
    if let Some(existing) = store.user_by_email(&admin.email)? {
        if !existing.is_super_admin() {
            warn!(
                "Bootstrap admin {} exists with role {}; leaving it unchanged",
                existing.email, existing.role
            );
        }
        return Ok(());
    }

    let mut user = User::new(admin.email.clone(), Role::SuperAdmin);
    user.given_name = "Admin".to_string();
    user.password_hash = Some(hash_password(&admin.password)?);
    user.created_at = current_timestamp();
    store.save_user(user)?;
    info!("Created super admin {}", admin.email);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down...");
}
