//! PayDPI session and refund models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Payment session states
///
/// Terminal: COMPLETED, CANCELLED, EXPIRED. Non-terminal states are
/// recomputed from elapsed time on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Initiated,
    Processing,
    Completed,
    Cancelled,
    Expired,
}

impl PaymentState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentState::Completed | PaymentState::Cancelled | PaymentState::Expired
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentState::Initiated => "INITIATED",
            PaymentState::Processing => "PROCESSING",
            PaymentState::Completed => "COMPLETED",
            PaymentState::Cancelled => "CANCELLED",
            PaymentState::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Refund states, same elapsed-time progression pattern as sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundState {
    Initiated,
    Processing,
    Completed,
}

impl RefundState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RefundState::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RefundState::Initiated => "INITIATED",
            RefundState::Processing => "PROCESSING",
            RefundState::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for RefundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One mock PayDPI payment session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentSession {
    pub payment_id: Uuid,
    pub order_id: u64,
    /// Amount charged, LKR
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
    /// Gateway fee (1.5%, rounded to cents), LKR
    #[schema(value_type = String, example = "4.50")]
    pub fee: Decimal,
    pub state: PaymentState,
    /// Canned bank transaction reference
    #[schema(example = "LKPAY-7F3K9Q2MHX")]
    pub bank_reference: String,
    /// Unix epoch ms
    pub initiated_at_ms: u64,
    /// Unix epoch ms
    pub expires_at_ms: u64,
}

/// One mock PayDPI refund
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Refund {
    pub refund_id: Uuid,
    pub payment_id: Uuid,
    pub order_id: u64,
    /// Amount returned, LKR
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
    pub state: RefundState,
    /// Unix epoch ms
    pub initiated_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_payment_states() {
        assert!(PaymentState::Completed.is_terminal());
        assert!(PaymentState::Cancelled.is_terminal());
        assert!(PaymentState::Expired.is_terminal());

        assert!(!PaymentState::Initiated.is_terminal());
        assert!(!PaymentState::Processing.is_terminal());
    }

    #[test]
    fn test_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentState::Processing).unwrap(),
            "\"PROCESSING\""
        );
        let parsed: PaymentState = serde_json::from_str("\"EXPIRED\"").unwrap();
        assert_eq!(parsed, PaymentState::Expired);
    }

    #[test]
    fn test_refund_terminal() {
        assert!(RefundState::Completed.is_terminal());
        assert!(!RefundState::Initiated.is_terminal());
        assert!(!RefundState::Processing.is_terminal());
    }
}
