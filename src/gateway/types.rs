//! API response envelope and error codes
//!
//! All endpoints answer with the same JSON envelope:
//! - success: `{"success": true, "data": ...}`
//! - error:   `{"success": false, "error": "<code>", "message": "..."}`

use axum::{Json, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

/// Unified API response wrapper
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// true for success, false for errors
    #[schema(example = true)]
    pub success: bool,
    /// Response data (only present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Stable machine-readable error code (only present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "validation_error")]
    pub error: Option<String>,
    /// Human-readable error message (only present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Create error response
    pub fn error(code: &'static str, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(code.to_string()),
            message: Some(msg.into()),
        }
    }
}

/// Rejection half of a handler result: status code plus error envelope.
pub type Rejection = (StatusCode, Json<ApiResponse<()>>);

/// Build a rejection in one call; handlers map their service errors with this.
pub fn reject(status: StatusCode, code: &'static str, msg: impl Into<String>) -> Rejection {
    (status, Json(ApiResponse::<()>::error(code, msg)))
}

/// Stable API error codes
pub mod error_codes {
    // Validation / client errors
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const NOTHING_TO_PAY: &str = "nothing_to_pay";

    // Auth errors
    pub const MISSING_AUTH: &str = "missing_auth";
    pub const AUTH_FAILED: &str = "auth_failed";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const FORBIDDEN: &str = "forbidden";

    // Resource errors
    pub const ORDER_NOT_FOUND: &str = "order_not_found";
    pub const STUDENT_NOT_FOUND: &str = "student_not_found";
    pub const MEAL_UNAVAILABLE: &str = "meal_unavailable";
    pub const PAYMENT_NOT_FOUND: &str = "payment_not_found";
    pub const REFUND_NOT_FOUND: &str = "refund_not_found";

    // Conflict errors
    pub const DUPLICATE_ORDER: &str = "duplicate_order";
    pub const CANNOT_CANCEL: &str = "cannot_cancel";
    pub const ALREADY_PAID: &str = "already_paid";
    pub const DUPLICATE_REFUND: &str = "duplicate_refund";
    pub const PAYMENT_NOT_REFUNDABLE: &str = "payment_not_refundable";

    // Server errors
    pub const INTERNAL_ERROR: &str = "internal_error";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let resp = ApiResponse::success(serde_json::json!({"order_id": 7}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["order_id"], 7);
        assert!(json.get("error").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::<()>::error(error_codes::DUPLICATE_ORDER, "already ordered today");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "duplicate_order");
        assert_eq!(json["message"], "already ordered today");
        assert!(json.get("data").is_none());
    }
}
