use axum::{Extension, Json, extract::State, http::StatusCode};
use std::sync::Arc;

use super::service::{AuthResponse, Claims, LoginRequest};
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, Rejection, error_codes, reject},
};

/// Login with seeded SLUDI credentials
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), Rejection> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            "Username and password are required",
        ));
    }

    match state.auth.login(req) {
        Ok(resp) => Ok((StatusCode::OK, Json(ApiResponse::success(resp)))),
        Err(e) => {
            tracing::warn!("Login failed: {:?}", e);
            Err(reject(
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_CREDENTIALS,
                "Invalid username or password",
            ))
        }
    }
}

/// Echo the verified token claims
///
/// GET /api/auth/profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Authenticated profile"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_jwt" = [])),
    tag = "Auth"
)]
pub async fn profile(
    Extension(claims): Extension<Claims>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let profile = serde_json::json!({
        "user_id": claims.sub,
        "name": claims.name,
        "role": claims.role,
    });
    (StatusCode::OK, Json(ApiResponse::success(profile)))
}
