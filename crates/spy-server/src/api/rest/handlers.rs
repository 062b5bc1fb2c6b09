//! API endpoint handlers
//!
//! HTTP request handlers for all REST API endpoints.

use super::conversions::split_verbs;
use super::extractors::{JsonExtractor, QueryExtractor};
use super::types::*;
use crate::error::ServerError;
use axum::{
    extract::{Path, State},
    Json,
};
use spy_sdk::{AttemptsView, ProgressView, StatementsView, ViewState};
use tracing::info;

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Login endpoint
///
/// The learner is logged in only once their statements could be fetched.
pub(super) async fn login(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    let view_state = ViewState::login(&payload.identifier)?;
    let identifier = view_state.identifier().unwrap_or_default();

    let dashboard = state.engine.progress(identifier).await?;
    info!("Learner {} logged in", identifier);

    Ok(Json(LoginResponse {
        state: view_state,
        dashboard,
    }))
}

/// Logout endpoint
pub(super) async fn logout() -> Json<ViewState> {
    Json(ViewState::LoggedOut)
}

/// Graphs of one learner
pub(super) async fn progress(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ProgressView>, ServerError> {
    Ok(Json(state.engine.progress(&identifier).await?))
}

/// Scored attempts of one learner
pub(super) async fn attempts(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    QueryExtractor(query): QueryExtractor<AttemptsQuery>,
) -> Result<Json<AttemptsView>, ServerError> {
    let view = state
        .engine
        .attempts(&identifier, query.mission.as_deref())
        .await?;
    Ok(Json(view))
}

/// Recent statements of one learner
pub(super) async fn statements(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    QueryExtractor(query): QueryExtractor<StatementsQuery>,
) -> Result<Json<StatementsView>, ServerError> {
    let verbs = split_verbs(query.verbs.as_deref());
    Ok(Json(state.engine.statements(&identifier, &verbs).await?))
}

/// Loaded level catalog
pub(super) async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        category: state.engine.config().catalog.category.clone(),
        categories: state.engine.catalog().clone(),
    })
}
