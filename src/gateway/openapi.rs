//! OpenAPI / Swagger UI documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::service::{AuthResponse, LoginRequest};
use crate::gateway::types::ApiResponse;
use crate::meals::Meal;
use crate::orders::handlers::CreateOrderResponse;
use crate::orders::models::{
    CreateOrderRequest, Order, OrderStatus, PaymentStatus, StatusHistoryEntry, UpdateStatusRequest,
};
use crate::payments::handlers::{ProcessPaymentRequest, WebhookRequest};
use crate::payments::models::{PaymentSession, PaymentState, Refund, RefundState};

/// Bearer JWT security scheme (token from `POST /api/auth/login`)
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT from POST /api/auth/login: Authorization: Bearer <token>",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Main API documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lanka Meals API",
        version = "1.0.0",
        description = "School meal ordering and subsidy platform for Sri Lanka: \
            mock SLUDI authentication, meal orders with per-student subsidies, \
            and a simulated PayDPI payment gateway.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        // Public
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::list_meals,
        crate::auth::handlers::login,
        crate::payments::handlers::paydpi_webhook,
        // Authenticated
        crate::auth::handlers::profile,
        crate::orders::handlers::create_order,
        crate::orders::handlers::list_orders,
        crate::orders::handlers::get_order,
        crate::orders::handlers::cancel_order,
        crate::orders::handlers::staff_pending,
        crate::orders::handlers::update_status,
        crate::payments::handlers::process_payment,
        crate::payments::handlers::payment_status,
        crate::payments::handlers::request_refund,
        crate::payments::handlers::refund_status,
    ),
    components(
        schemas(
            ApiResponse<serde_json::Value>,
            LoginRequest,
            AuthResponse,
            Meal,
            Order,
            OrderStatus,
            PaymentStatus,
            StatusHistoryEntry,
            CreateOrderRequest,
            CreateOrderResponse,
            UpdateStatusRequest,
            PaymentSession,
            PaymentState,
            Refund,
            RefundState,
            ProcessPaymentRequest,
            WebhookRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Mock SLUDI login and profile"),
        (name = "Meals", description = "Public meal catalog"),
        (name = "Orders", description = "Meal order lifecycle (auth required)"),
        (name = "Payments", description = "Mock PayDPI sessions and refunds"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Lanka Meals API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let spec = ApiDoc::openapi();
        let json = spec.to_json();
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Lanka Meals API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let spec = ApiDoc::openapi();
        let paths = spec.paths;
        assert!(paths.paths.contains_key("/health"));
        assert!(paths.paths.contains_key("/api/meals"));
        assert!(paths.paths.contains_key("/api/auth/login"));
        assert!(paths.paths.contains_key("/api/orders"));
        assert!(paths.paths.contains_key("/api/payments/process"));
    }

    #[test]
    fn test_security_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("should have components");
        assert!(components.security_schemes.contains_key("bearer_jwt"));
    }
}
