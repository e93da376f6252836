//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        EdgeRemoveRequest, EdgeRequest, HealthResponse, MutationResponse, NodeRequest,
        PredicateRequest, RenameRequest, SynthesizeRequest,
    },
};
use crate::report;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use synthgraph_core::{EdgeWeight, SynthError, render_dot};

/// HTTP status for a rejected operation.
pub fn status_for(error: &SynthError) -> StatusCode {
    match error {
        SynthError::DuplicateNode(_) | SynthError::DuplicatePredicate(_) => StatusCode::CONFLICT,
        SynthError::NodeNotFound(_) | SynthError::PredicateNotFound(_) => StatusCode::NOT_FOUND,
        SynthError::InvalidLabel(_) | SynthError::MalformedCondition(_) => StatusCode::BAD_REQUEST,
        SynthError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SynthError::SerializationError(_) | SynthError::IoError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn failure(error: &SynthError) -> Response {
    (status_for(error), Json(MutationResponse::error(error.to_string()))).into_response()
}

// =============================================================================
// READ-ONLY HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Session counts.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(report::status_json(&session)))
}

/// Items and recipes with their visual styles.
pub async fn graph_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(report::graph_json(&session)))
}

/// Graphviz DOT text.
pub async fn export_dot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")],
        render_dot(&session),
    )
}

// =============================================================================
// ITEM HANDLERS
// =============================================================================

pub async fn add_node_handler(
    State(state): State<AppState>,
    Json(request): Json<NodeRequest>,
) -> Response {
    let mut session = state.session.write().await;
    match session.add_node(&request.label) {
        Ok(id) => {
            tracing::info!(node = id.0, label = %request.label, "node added");
            (StatusCode::OK, Json(MutationResponse::with_id(id.0))).into_response()
        }
        Err(e) => failure(&e),
    }
}

/// Removing an item also drops every recipe touching it.
pub async fn remove_node_handler(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Response {
    let mut session = state.session.write().await;
    match session.remove_node(&label) {
        Ok(removed) => {
            tracing::info!(%label, recipes = removed.len(), "node removed");
            (StatusCode::OK, Json(MutationResponse::with_removed(removed.len()))).into_response()
        }
        Err(e) => failure(&e),
    }
}

pub async fn rename_node_handler(
    State(state): State<AppState>,
    Json(request): Json<RenameRequest>,
) -> Response {
    let mut session = state.session.write().await;
    match session.rename_node(&request.old, &request.new) {
        Ok(id) => (StatusCode::OK, Json(MutationResponse::with_id(id.0))).into_response(),
        Err(e) => failure(&e),
    }
}

// =============================================================================
// RECIPE HANDLERS
// =============================================================================

pub async fn add_edge_handler(
    State(state): State<AppState>,
    Json(request): Json<EdgeRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(MutationResponse::error(e.to_string())),
        )
            .into_response();
    }

    let mut session = state.session.write().await;
    match session.add_edge(
        &request.from,
        &request.to,
        EdgeWeight::new(request.weight),
        &request.condition,
    ) {
        Ok(id) => {
            tracing::info!(edge = id.0, from = %request.from, to = %request.to, "edge added");
            (StatusCode::OK, Json(MutationResponse::with_id(id.0))).into_response()
        }
        Err(e) => failure(&e),
    }
}

/// Removes every recipe between the two items. Zero removals is not an error.
pub async fn remove_edge_handler(
    State(state): State<AppState>,
    Json(request): Json<EdgeRemoveRequest>,
) -> Response {
    let mut session = state.session.write().await;
    match session.remove_edge(&request.from, &request.to) {
        Ok(removed) => {
            (StatusCode::OK, Json(MutationResponse::with_removed(removed.len()))).into_response()
        }
        Err(e) => failure(&e),
    }
}

// =============================================================================
// INVENTORY HANDLERS
// =============================================================================

pub async fn inventory_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (StatusCode::OK, Json(report::inventory_json(session.inventory())))
}

pub async fn add_predicate_handler(
    State(state): State<AppState>,
    Json(request): Json<PredicateRequest>,
) -> Response {
    let mut session = state.session.write().await;
    match session.add_condition(&request.name) {
        Ok(()) => (StatusCode::OK, Json(MutationResponse::ok())).into_response(),
        Err(e) => failure(&e),
    }
}

pub async fn remove_predicate_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let mut session = state.session.write().await;
    match session.remove_condition(&name) {
        Ok(()) => (StatusCode::OK, Json(MutationResponse::ok())).into_response(),
        Err(e) => failure(&e),
    }
}

// =============================================================================
// SYNTHESIS HANDLER
// =============================================================================

/// Cheapest admissible path. An unreachable goal is a 200 with
/// `"reachable": false`; unknown labels are a 404.
pub async fn synthesize_handler(
    State(state): State<AppState>,
    Json(request): Json<SynthesizeRequest>,
) -> Response {
    let mut session = state.session.write().await;
    let body = match session.synthesize(&request.start, &request.goal) {
        Ok(synthesis) => {
            let synthesis = synthesis.clone();
            report::synthesis_json(session.graph(), &synthesis)
        }
        Err(e) => return failure(&e),
    };
    tracing::debug!(start = %request.start, goal = %request.goal, "synthesis served");
    (StatusCode::OK, Json(body)).into_response()
}
