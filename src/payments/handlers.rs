use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Claims;
use crate::gateway::{
    state::AppState,
    types::{ApiResponse, Rejection, error_codes, reject},
};

use super::error::PaymentError;
use super::models::{PaymentSession, PaymentState, Refund, RefundState};
use super::paydpi::now_ms;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessPaymentRequest {
    #[schema(example = 1)]
    pub order_id: u64,
}

/// Webhook body as PayDPI would push it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WebhookRequest {
    pub payment_id: Uuid,
    pub status: PaymentState,
}

fn map_payment_error(e: PaymentError) -> Rejection {
    use PaymentError::*;
    match &e {
        OrderNotFound(_) => reject(
            StatusCode::NOT_FOUND,
            error_codes::ORDER_NOT_FOUND,
            e.to_string(),
        ),
        NothingToPay(_) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::NOTHING_TO_PAY,
            e.to_string(),
        ),
        AlreadyPaid(_) => reject(
            StatusCode::CONFLICT,
            error_codes::ALREADY_PAID,
            e.to_string(),
        ),
        PaymentNotFound(_) => reject(
            StatusCode::NOT_FOUND,
            error_codes::PAYMENT_NOT_FOUND,
            e.to_string(),
        ),
        NotRefundable(_) => reject(
            StatusCode::BAD_REQUEST,
            error_codes::PAYMENT_NOT_REFUNDABLE,
            e.to_string(),
        ),
        DuplicateRefund(_) => reject(
            StatusCode::CONFLICT,
            error_codes::DUPLICATE_REFUND,
            e.to_string(),
        ),
        RefundNotFound(_) => reject(
            StatusCode::NOT_FOUND,
            error_codes::REFUND_NOT_FOUND,
            e.to_string(),
        ),
    }
}

/// Propagate an observed session state onto the owning order. Safe to call
/// repeatedly; each hook is idempotent.
async fn apply_session_observation(state: &AppState, session: &PaymentSession) {
    match session.state {
        PaymentState::Completed => {
            state.orders.on_payment_completed(session.order_id).await;
        }
        PaymentState::Expired | PaymentState::Cancelled => {
            state.orders.on_payment_failed(session.order_id);
        }
        PaymentState::Initiated | PaymentState::Processing => {}
    }
}

/// Open (or resume) a payment session for an order
///
/// POST /api/payments/process — idempotent while a live session exists: the
/// same session is returned instead of opening a second one.
#[utoipa::path(
    post,
    path = "/api/payments/process",
    request_body = ProcessPaymentRequest,
    responses(
        (status = 201, description = "Payment session opened", body = ApiResponse<PaymentSession>),
        (status = 200, description = "Existing live session returned", body = ApiResponse<PaymentSession>),
        (status = 400, description = "Order has nothing to pay"),
        (status = 404, description = "No such order (or not yours)"),
        (status = 409, description = "Order already paid")
    ),
    security(("bearer_jwt" = [])),
    tag = "Payments"
)]
pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ProcessPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentSession>>), Rejection> {
    let order = state
        .orders
        .get_for(&claims, req.order_id)
        .map_err(|_| map_payment_error(PaymentError::OrderNotFound(req.order_id)))?;

    if order.final_amount.is_zero() {
        return Err(map_payment_error(PaymentError::NothingToPay(req.order_id)));
    }
    if order.payment_status == crate::orders::PaymentStatus::Paid {
        return Err(map_payment_error(PaymentError::AlreadyPaid(req.order_id)));
    }

    // Resume a live session rather than stacking a second charge.
    if let Some(payment_id) = order.payment_id {
        if let Ok(session) = state.paydpi.poll_session(payment_id, now_ms()) {
            apply_session_observation(&state, &session).await;
            match session.state {
                PaymentState::Completed => {
                    return Err(map_payment_error(PaymentError::AlreadyPaid(req.order_id)));
                }
                PaymentState::Initiated | PaymentState::Processing => {
                    return Ok((StatusCode::OK, Json(ApiResponse::success(session))));
                }
                // expired or cancelled: fall through and open a fresh session
                PaymentState::Expired | PaymentState::Cancelled => {}
            }
        }
    }

    let session = state.paydpi.create_session(order.order_id, order.final_amount);
    state.orders.attach_payment(order.order_id, session.payment_id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

/// Poll a payment session
///
/// GET /api/payments/status/{payment_id} — state advances on elapsed time at
/// each poll; a COMPLETED observation marks the order paid and confirms it.
/// Visibility follows the owning order, so a foreign session reads as 404.
#[utoipa::path(
    get,
    path = "/api/payments/status/{payment_id}",
    params(("payment_id" = Uuid, Path, description = "PayDPI session id")),
    responses(
        (status = 200, description = "Current session state", body = ApiResponse<PaymentSession>),
        (status = 404, description = "No such payment session (or not yours)")
    ),
    security(("bearer_jwt" = [])),
    tag = "Payments"
)]
pub async fn payment_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(payment_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentSession>>), Rejection> {
    let session = state
        .paydpi
        .poll_session(payment_id, now_ms())
        .map_err(map_payment_error)?;
    state
        .orders
        .get_for(&claims, session.order_id)
        .map_err(|_| map_payment_error(PaymentError::PaymentNotFound(payment_id)))?;
    apply_session_observation(&state, &session).await;
    Ok((StatusCode::OK, Json(ApiResponse::success(session))))
}

/// Request a refund for a completed payment
///
/// POST /api/payments/refund/{payment_id}
#[utoipa::path(
    post,
    path = "/api/payments/refund/{payment_id}",
    params(("payment_id" = Uuid, Path, description = "PayDPI session id")),
    responses(
        (status = 201, description = "Refund initiated", body = ApiResponse<Refund>),
        (status = 400, description = "Payment is not in a refundable state"),
        (status = 404, description = "No such payment session"),
        (status = 409, description = "Payment already refunded")
    ),
    security(("bearer_jwt" = [])),
    tag = "Payments"
)]
pub async fn request_refund(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(payment_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<Refund>>), Rejection> {
    // Visibility rule rides on the owning order: a foreign payment id reads
    // as payment_not_found, mirroring the order endpoints.
    let session = state
        .paydpi
        .get_session(payment_id)
        .ok_or_else(|| map_payment_error(PaymentError::PaymentNotFound(payment_id)))?;
    state
        .orders
        .get_for(&claims, session.order_id)
        .map_err(|_| map_payment_error(PaymentError::PaymentNotFound(payment_id)))?;

    // The order flips to REFUNDED only once a poll observes the refund
    // COMPLETED; until then it stays PAID with an INITIATED refund attached.
    let refund = state
        .paydpi
        .create_refund(payment_id, now_ms())
        .map_err(map_payment_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(refund))))
}

/// Poll a refund
///
/// GET /api/payments/refund/{refund_id} — same order-based visibility as the
/// session poll. Observing COMPLETED flips the order to REFUNDED.
#[utoipa::path(
    get,
    path = "/api/payments/refund/{refund_id}",
    params(("refund_id" = Uuid, Path, description = "Refund id")),
    responses(
        (status = 200, description = "Current refund state", body = ApiResponse<Refund>),
        (status = 404, description = "No such refund (or not yours)")
    ),
    security(("bearer_jwt" = [])),
    tag = "Payments"
)]
pub async fn refund_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(refund_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<Refund>>), Rejection> {
    let refund = state
        .paydpi
        .poll_refund(refund_id, now_ms())
        .map_err(map_payment_error)?;
    state
        .orders
        .get_for(&claims, refund.order_id)
        .map_err(|_| map_payment_error(PaymentError::RefundNotFound(refund_id)))?;
    if refund.state == RefundState::Completed {
        state.orders.on_refund_completed(refund.order_id);
    }
    Ok((StatusCode::OK, Json(ApiResponse::success(refund))))
}

/// PayDPI push notification
///
/// POST /api/payments/webhook/paydpi — unauthenticated, as the mock gateway
/// holds no credentials. Applies the pushed state and the same order-side
/// effects a poll would.
#[utoipa::path(
    post,
    path = "/api/payments/webhook/paydpi",
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "State applied", body = ApiResponse<PaymentSession>),
        (status = 404, description = "No such payment session")
    ),
    tag = "Payments"
)]
pub async fn paydpi_webhook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WebhookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentSession>>), Rejection> {
    let session = state
        .paydpi
        .apply_webhook(req.payment_id, req.status)
        .map_err(map_payment_error)?;
    apply_session_observation(&state, &session).await;
    Ok((StatusCode::OK, Json(ApiResponse::success(session))))
}
