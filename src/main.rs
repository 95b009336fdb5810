//! Campus Hub Backend
//!
//! Serves the learning resources and team builder pages on top of the hosted datastore.

mod api;
mod auth;
mod config;
mod db;
mod effects;
mod errors;
mod models;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing datastore credentials stop startup here
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Hub Backend");
    tracing::info!("Datastore: {}", config.datastore_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (CAMPUS_API_PSK). Authentication is disabled!");
    }

    let store = db::connect(&config)?;

    let state = AppState {
        repo: Repository::new(store),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Resources
        .route("/resources", get(api::list_resources))
        .route("/resources/{id}/like", post(api::like_resource))
        .route("/resources/{id}/download", post(api::download_resource))
        // Team builder
        .route("/team-requests", get(api::list_team_requests))
        .route("/team-requests", post(api::create_team_request))
        .route("/team-requests/{id}/apply", post(api::apply_to_team))
        // Profiles
        .route("/profiles/{id}", get(api::get_profile))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
