//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use synthgraph_core::{SynthError, primitives::MAX_LABEL_LENGTH};

/// Longest accepted condition expression.
const MAX_CONDITION_LENGTH: usize = 4096;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// ITEM REQUESTS
// =============================================================================

/// Add-item request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRequest {
    pub label: String,
}

/// Rename-item request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub old: String,
    pub new: String,
}

// =============================================================================
// RECIPE REQUESTS
// =============================================================================

/// Add-recipe request. A missing condition means unconditional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRequest {
    pub from: String,
    pub to: String,
    pub weight: u64,
    #[serde(default)]
    pub condition: String,
}

impl EdgeRequest {
    /// Reject oversized condition expressions before they reach the graph.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.condition.len() > MAX_CONDITION_LENGTH {
            return Err(SynthError::SerializationError(format!(
                "Condition length {} exceeds maximum {} bytes",
                self.condition.len(),
                MAX_CONDITION_LENGTH
            )));
        }
        for label in [&self.from, &self.to] {
            if label.len() > MAX_LABEL_LENGTH {
                return Err(SynthError::InvalidLabel(label.clone()));
            }
        }
        Ok(())
    }
}

/// Remove-recipes request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRemoveRequest {
    pub from: String,
    pub to: String,
}

// =============================================================================
// INVENTORY & SYNTHESIS REQUESTS
// =============================================================================

/// Add-predicate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateRequest {
    pub name: String,
}

/// Synthesis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub start: String,
    pub goal: String,
}

// =============================================================================
// MUTATION RESPONSE
// =============================================================================

/// Outcome of a mutating request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub removed: Option<usize>,
    pub error: Option<String>,
}

impl MutationResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn with_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::ok()
        }
    }

    pub fn with_removed(removed: usize) -> Self {
        Self {
            removed: Some(removed),
            ..Self::ok()
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            ..Self::default()
        }
    }
}
