//! Order model and status definitions
//!
//! Status strings go over the wire in SCREAMING_SNAKE_CASE, matching the
//! original platform's contract.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle states
///
/// Normal progression: PENDING → CONFIRMED → PREPARING → READY → DELIVERED.
/// CANCELLED is reachable from PENDING/CONFIRMED (student) or from anywhere
/// via the staff allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Students may cancel only before the kitchen starts work.
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Fixed allow-list for staff transitions. PENDING is creation-only;
    /// everything else is an unconditional overwrite target.
    #[inline]
    pub fn staff_assignable(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment-side state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Processing => "PROCESSING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One staff transition in the append-only history log
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusHistoryEntry {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Staff id taken from the JWT
    pub changed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// A meal order. Never physically deleted; cancellation is a status change.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Order {
    pub order_id: u64,
    pub student_id: String,
    pub meal_id: String,
    pub meal_name: String,
    pub school_id: String,
    pub scheduled_date: NaiveDate,
    pub quantity: u32,
    /// price * quantity, LKR
    #[schema(value_type = String, example = "750.00")]
    pub total_amount: Decimal,
    /// Subsidy applied (0 for ineligible students), LKR
    #[schema(value_type = String, example = "450.00")]
    pub subsidy_amount: Decimal,
    /// What the student actually owes, LKR
    #[schema(value_type = String, example = "300.00")]
    pub final_amount: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    pub status_history: Vec<StatusHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-order request body (student id comes from the JWT)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "meal_id is required"))]
    #[schema(example = "MEAL-RICE-CURRY")]
    pub meal_id: String,
    #[schema(value_type = String, example = "2026-09-01")]
    pub scheduled_date: NaiveDate,
    #[validate(range(min = 1, max = 10, message = "quantity must be between 1 and 10"))]
    #[schema(example = 2)]
    pub quantity: u32,
}

/// Staff status-transition request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    #[schema(example = "packed for delivery")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellable_states() {
        assert!(OrderStatus::Pending.is_cancellable());
        assert!(OrderStatus::Confirmed.is_cancellable());

        assert!(!OrderStatus::Preparing.is_cancellable());
        assert!(!OrderStatus::Ready.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_staff_allow_list_excludes_pending() {
        assert!(!OrderStatus::Pending.staff_assignable());
        assert!(OrderStatus::Confirmed.staff_assignable());
        assert!(OrderStatus::Delivered.staff_assignable());
        assert!(OrderStatus::Cancelled.staff_assignable());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
        let parsed: OrderStatus = serde_json::from_str("\"DELIVERED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Delivered);
    }

    #[test]
    fn test_payment_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Refunded).unwrap(),
            "\"REFUNDED\""
        );
    }

    #[test]
    fn test_create_request_quantity_bounds() {
        use validator::Validate;
        let ok: CreateOrderRequest = serde_json::from_str(
            r#"{"meal_id":"MEAL-RICE-CURRY","scheduled_date":"2030-01-01","quantity":10}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());

        let too_many: CreateOrderRequest = serde_json::from_str(
            r#"{"meal_id":"MEAL-RICE-CURRY","scheduled_date":"2030-01-01","quantity":11}"#,
        )
        .unwrap();
        assert!(too_many.validate().is_err());

        let zero: CreateOrderRequest = serde_json::from_str(
            r#"{"meal_id":"MEAL-RICE-CURRY","scheduled_date":"2030-01-01","quantity":0}"#,
        )
        .unwrap();
        assert!(zero.validate().is_err());
    }
}
