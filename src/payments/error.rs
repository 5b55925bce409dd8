use thiserror::Error;
use uuid::Uuid;

use super::models::PaymentState;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Order not found: {0}")]
    OrderNotFound(u64),

    #[error("Order {0} has nothing to pay (fully subsidised)")]
    NothingToPay(u64),

    #[error("Order {0} is already paid")]
    AlreadyPaid(u64),

    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    #[error("Payment is {0}, only COMPLETED payments can be refunded")]
    NotRefundable(PaymentState),

    #[error("A refund already exists for payment {0}")]
    DuplicateRefund(Uuid),

    #[error("Refund not found: {0}")]
    RefundNotFound(Uuid),
}
