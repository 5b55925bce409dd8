use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::{Claims, Role};
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, Rejection, error_codes, reject},
};

use super::error::OrderError;
use super::models::{CreateOrderRequest, Order, UpdateStatusRequest};

/// Created order plus a hint telling the client whether to start a payment.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order: Order,
    pub payment_required: bool,
}

fn map_order_error(e: OrderError) -> Rejection {
    use OrderError::*;
    match &e {
        Validation(msg) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            msg.clone(),
        ),
        StudentNotFound(_) => reject(
            StatusCode::NOT_FOUND,
            error_codes::STUDENT_NOT_FOUND,
            e.to_string(),
        ),
        MealUnavailable(_) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::MEAL_UNAVAILABLE,
            e.to_string(),
        ),
        DuplicateOrder => reject(
            StatusCode::CONFLICT,
            error_codes::DUPLICATE_ORDER,
            e.to_string(),
        ),
        NotFound(_) => reject(
            StatusCode::NOT_FOUND,
            error_codes::ORDER_NOT_FOUND,
            e.to_string(),
        ),
        CannotCancel(_) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::CANNOT_CANCEL,
            e.to_string(),
        ),
        StatusNotAssignable(_) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            e.to_string(),
        ),
    }
}

/// Place a meal order for the authenticated student
///
/// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<CreateOrderResponse>),
        (status = 400, description = "Validation failure or meal unavailable"),
        (status = 409, description = "An active order already exists for that date")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateOrderResponse>>), Rejection> {
    let (order, payment_required) = state
        .orders
        .create(&claims.sub, req)
        .await
        .map_err(map_order_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateOrderResponse {
            order,
            payment_required,
        })),
    ))
}

/// List orders visible to the caller
///
/// GET /api/orders — students get their own orders newest-first, staff get
/// every order.
#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders visible to the caller", body = ApiResponse<Vec<Order>>)
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> (StatusCode, Json<ApiResponse<Vec<Order>>>) {
    let orders = state.orders.list_for(&claims);
    (StatusCode::OK, Json(ApiResponse::success(orders)))
}

/// Fetch a single order
///
/// GET /api/orders/{id} — a student asking for someone else's order gets 404,
/// not 403, so order ids don't leak.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order found", body = ApiResponse<Order>),
        (status = 404, description = "No such order (or not yours)")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<u64>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), Rejection> {
    let order = state
        .orders
        .get_for(&claims, order_id)
        .map_err(map_order_error)?;
    Ok((StatusCode::OK, Json(ApiResponse::success(order))))
}

/// Cancel an order
///
/// PATCH /api/orders/{id}/cancel
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/cancel",
    params(("id" = u64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<Order>),
        (status = 400, description = "Order is past the cancellable states"),
        (status = 404, description = "No such order (or not yours)")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<u64>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), Rejection> {
    let order = state
        .orders
        .cancel(&claims, order_id)
        .await
        .map_err(map_order_error)?;
    Ok((StatusCode::OK, Json(ApiResponse::success(order))))
}

/// Staff: list all PENDING orders, oldest first
///
/// GET /api/orders/staff/pending
#[utoipa::path(
    get,
    path = "/api/orders/staff/pending",
    responses(
        (status = 200, description = "Pending orders", body = ApiResponse<Vec<Order>>),
        (status = 403, description = "Caller is not staff")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn staff_pending(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<Vec<Order>>>) {
    let orders = state.orders.pending();
    (StatusCode::OK, Json(ApiResponse::success(orders)))
}

/// Staff: move an order to any state in the allow-list
///
/// PATCH /api/orders/{id}/status
#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(("id" = u64, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 400, description = "Target status not assignable"),
        (status = 403, description = "Caller is not staff"),
        (status = 404, description = "No such order")
    ),
    security(("bearer_jwt" = [])),
    tag = "Orders"
)]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(order_id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), Rejection> {
    // route is behind require_staff, but the check is cheap to repeat
    if claims.role != Role::Staff {
        return Err(reject(
            StatusCode::FORBIDDEN,
            error_codes::FORBIDDEN,
            "Staff role required",
        ));
    }

    let order = state
        .orders
        .update_status(&claims.sub, order_id, req.status, req.note)
        .await
        .map_err(map_order_error)?;
    Ok((StatusCode::OK, Json(ApiResponse::success(order))))
}
