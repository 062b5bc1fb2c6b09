//! REST API type definitions
//!
//! Request and response types for the REST API endpoints.

use serde::{Deserialize, Serialize};
use spy_sdk::{DashboardEngine, MaxScoreCatalog, ProgressView, ViewState};
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DashboardEngine>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Learner identifier as typed; may be blank
    #[serde(default)]
    pub identifier: String,
}

/// Logged-in state together with the learner's graphs
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub state: ViewState,

    pub dashboard: ProgressView,
}

/// Query of the attempts table
#[derive(Debug, Default, Deserialize)]
pub struct AttemptsQuery {
    /// Mission to show; every mission when absent
    #[serde(default)]
    pub mission: Option<String>,
}

/// Query of the statements table
#[derive(Debug, Default, Deserialize)]
pub struct StatementsQuery {
    /// Comma-separated verbs to keep; every verb when absent
    #[serde(default)]
    pub verbs: Option<String>,
}

/// Loaded level catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    /// Category used for rescaling
    pub category: String,

    pub categories: MaxScoreCatalog,
}
