//! REST endpoints for onboarding sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::manager::OnboardingManager;
use super::model::AnswersUpdate;
use crate::error::OnboardingError;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

/// POST /api/onboarding/sessions
///
/// 503 when the session registry is full.
async fn create_session(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok((StatusCode::CREATED, Json(state.manager.create().await?)))
}

/// GET /api/onboarding/sessions/{id}
async fn get_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.manager.status(id).await?))
}

/// PATCH /api/onboarding/sessions/{id}/answers
///
/// Merges partial answers. `bodyScanCompleted` is not accepted here.
async fn update_answers(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
    Json(update): Json<AnswersUpdate>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.manager.update_answers(id, update).await?))
}

/// POST /api/onboarding/sessions/{id}/advance
///
/// 409 when the current screen's checks fail.
async fn advance(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.manager.advance(id).await?))
}

/// POST /api/onboarding/sessions/{id}/scan
///
/// Starts the simulated scan and returns 202; poll the session for the
/// outcome.
async fn start_scan(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, OnboardingError> {
    let status = state.manager.start_scan(id).await?;
    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// POST /api/onboarding/sessions/{id}/skip
async fn skip(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.manager.skip(id).await?))
}

/// DELETE /api/onboarding/sessions/{id}
async fn delete_session(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, OnboardingError> {
    state.manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/sessions", post(create_session))
        .route(
            "/api/onboarding/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/onboarding/sessions/{id}/answers", patch(update_answers))
        .route("/api/onboarding/sessions/{id}/advance", post(advance))
        .route("/api/onboarding/sessions/{id}/scan", post(start_scan))
        .route("/api/onboarding/sessions/{id}/skip", post(skip))
        .with_state(state)
}
