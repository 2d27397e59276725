//! HTTP endpoint for the nutrition proxy.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use super::model::{NutritionRequestBody, NutritionResponse};
use super::service::NutritionAi;
use crate::error::ProxyError;

/// Shared state for the proxy route.
#[derive(Clone)]
pub struct NutritionRouteState {
    pub ai: Arc<NutritionAi>,
}

/// POST /nutrition-ai
///
/// Success is `200 {success: true, data}`. Every failure, including a body
/// that does not parse, is `{success: false, error}` with a matching status.
async fn nutrition_ai(
    State(state): State<NutritionRouteState>,
    body: Result<Json<NutritionRequestBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return ProxyError::InvalidRequest(rejection.body_text()).into_response(),
    };

    match state.ai.handle_body(body).await {
        Ok(data) => Json(NutritionResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// OPTIONS /nutrition-ai
///
/// Preflight answered with an empty 200; CORS headers come from the layer.
async fn preflight() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the proxy route.
pub fn nutrition_routes(state: NutritionRouteState) -> Router {
    Router::new()
        .route("/nutrition-ai", post(nutrition_ai).options(preflight))
        .with_state(state)
}
