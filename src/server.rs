//! HTTP application: proxy, onboarding sessions and a health probe behind
//! one CORS layer.

use std::sync::Arc;

use axum::http::{HeaderName, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::nutrition::{NutritionAi, NutritionRouteState, nutrition_routes};
use crate::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes};

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: [&str; 8] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "nutrition-ai"}))
}

/// Any origin, the fixed header set, and the methods the routes use.
pub fn cors_layer() -> CorsLayer {
    let headers: Vec<HeaderName> = ALLOWED_HEADERS
        .into_iter()
        .map(HeaderName::from_static)
        .collect();

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(headers)
        .expose_headers([header::CONTENT_TYPE])
}

/// Build the full application router.
pub fn app(ai: Arc<NutritionAi>, manager: Arc<OnboardingManager>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(nutrition_routes(NutritionRouteState { ai }))
        .merge(onboarding_routes(OnboardingRouteState { manager }))
        .layer(cors_layer())
}
