use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::service::{Claims, Role};
use crate::gateway::{
    state::AppState,
    types::{Rejection, error_codes, reject},
};

/// Verify the `Authorization: Bearer` token and inject [`Claims`].
pub async fn jwt_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Rejection> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                error_codes::MISSING_AUTH,
                "Missing Authorization header",
            )
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            error_codes::AUTH_FAILED,
            "Invalid token format",
        )
    })?;

    match state.auth.verify_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Err(_) => Err(reject(
            StatusCode::UNAUTHORIZED,
            error_codes::AUTH_FAILED,
            "Invalid or expired token",
        )),
    }
}

/// Role gate for staff routes. Layered after [`jwt_auth_middleware`].
pub async fn require_staff(request: Request<Body>, next: Next) -> Result<Response, Rejection> {
    let claims = request.extensions().get::<Claims>().ok_or_else(|| {
        reject(
            StatusCode::UNAUTHORIZED,
            error_codes::MISSING_AUTH,
            "Missing authentication",
        )
    })?;

    if claims.role != Role::Staff {
        return Err(reject(
            StatusCode::FORBIDDEN,
            error_codes::FORBIDDEN,
            "Staff role required",
        ));
    }

    Ok(next.run(request).await)
}
