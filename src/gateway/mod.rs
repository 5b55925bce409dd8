//! HTTP gateway
//!
//! One axum server hosts the three logical services under `/api/*`:
//! auth (`/api/auth`), orders (`/api/orders`) and payments (`/api/payments`),
//! plus the public meal catalog and health check. JWT auth is a router layer;
//! staff-only routes carry an extra role-gate layer on top of it.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::middleware::{jwt_auth_middleware, require_staff};
use crate::config::AppConfig;
use state::AppState;

/// Build the full application router over a shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(crate::auth::handlers::login))
        .route(
            "/profile",
            get(crate::auth::handlers::profile).layer(from_fn_with_state(
                state.clone(),
                jwt_auth_middleware,
            )),
        );

    let staff_routes = Router::new()
        .route("/staff/pending", get(crate::orders::handlers::staff_pending))
        .route("/{id}/status", patch(crate::orders::handlers::update_status))
        .layer(from_fn(require_staff));

    let order_routes = Router::new()
        .route(
            "/",
            post(crate::orders::handlers::create_order).get(crate::orders::handlers::list_orders),
        )
        .route("/{id}", get(crate::orders::handlers::get_order))
        .route("/{id}/cancel", patch(crate::orders::handlers::cancel_order))
        .merge(staff_routes)
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let payment_routes = Router::new()
        .route("/process", post(crate::payments::handlers::process_payment))
        .route(
            "/status/{payment_id}",
            get(crate::payments::handlers::payment_status),
        )
        .route(
            "/refund/{id}",
            post(crate::payments::handlers::request_refund)
                .get(crate::payments::handlers::refund_status),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/meals", get(handlers::list_meals))
        // gateway callback, no JWT
        .route(
            "/api/payments/webhook/paydpi",
            post(crate::payments::handlers::paydpi_webhook),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/payments", payment_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP server.
pub async fn run_server(config: AppConfig, port: u16) {
    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("🍛 Meal catalog: http://{}/api/meals", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
