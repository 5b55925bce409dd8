use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::meals::Meal;

use super::state::AppState;
use super::types::ApiResponse;

/// Health check
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "System"
)]
pub async fn health_check() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let health = serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(ApiResponse::success(health)))
}

/// Public meal catalog with live availability
///
/// GET /api/meals
#[utoipa::path(
    get,
    path = "/api/meals",
    responses(
        (status = 200, description = "All meals", body = ApiResponse<Vec<Meal>>)
    ),
    tag = "Meals"
)]
pub async fn list_meals(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<Vec<Meal>>>) {
    (StatusCode::OK, Json(ApiResponse::success(state.meals.list())))
}
