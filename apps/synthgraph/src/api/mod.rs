//! # synthgraph HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Session counts
//! - `GET /graph` - Items and recipes with visual styles
//! - `POST /nodes`, `DELETE /nodes/{label}`, `POST /nodes/rename` - Items
//! - `POST /edges`, `POST /edges/remove` - Recipes
//! - `GET /inventory`, `POST /inventory`, `DELETE /inventory/{name}` - Predicates
//! - `POST /synthesize` - Cheapest synthesis path
//! - `GET /export/dot` - Graphviz rendering
//!
//! ## Configuration (Environment Variables)
//!
//! - `SYNTHGRAPH_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)

mod handlers;
mod types;

pub use handlers::status_for;
pub use types::{
    EdgeRemoveRequest, EdgeRequest, HealthResponse, MutationResponse, NodeRequest,
    PredicateRequest, RenameRequest, SynthesizeRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use std::sync::Arc;
use synthgraph_core::{Session, SynthError};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Largest accepted request body.
const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the session.
#[derive(Clone)]
pub struct AppState {
    /// Graph, inventory and highlights behind one lock.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new app state with a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `SYNTHGRAPH_CORS_ORIGINS`.
///
/// - `*`: allows all origins
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SYNTHGRAPH_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!("CORS: Allowing ALL origins (SYNTHGRAPH_CORS_ORIGINS=*)");
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SYNTHGRAPH_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                with_methods(CorsLayer::new().allow_origin(allowed_origins))
            }
        }
        None => {
            tracing::info!("CORS: No SYNTHGRAPH_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

fn with_methods(layer: CorsLayer) -> CorsLayer {
    layer
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect();

    with_methods(CorsLayer::new().allow_origin(origins))
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner): tracing, CORS, body limit.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/graph", get(handlers::graph_handler))
        .route("/nodes", post(handlers::add_node_handler))
        .route("/nodes/rename", post(handlers::rename_node_handler))
        .route("/nodes/{label}", delete(handlers::remove_node_handler))
        .route("/edges", post(handlers::add_edge_handler))
        .route("/edges/remove", post(handlers::remove_edge_handler))
        .route(
            "/inventory",
            get(handlers::inventory_handler).post(handlers::add_predicate_handler),
        )
        .route(
            "/inventory/{name}",
            delete(handlers::remove_predicate_handler),
        )
        .route("/synthesize", post(handlers::synthesize_handler))
        .route("/export/dot", get(handlers::export_dot_handler))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

/// Serve until Ctrl+C. Returns the session as it stands at shutdown.
pub async fn run_server(addr: &str, session: Session) -> Result<Session, SynthError> {
    let state = AppState::new(session);
    let shared = Arc::clone(&state.session);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SynthError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("synthgraph HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SynthError::IoError(format!("Server error: {}", e)))?;

    let session = shared.read().await.clone();
    Ok(session)
}
