use thiserror::Error;

use super::models::OrderStatus;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("{0}")]
    Validation(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Meal unavailable: {0}")]
    MealUnavailable(String),

    #[error("An active order already exists for this student and date")]
    DuplicateOrder,

    #[error("Order not found: {0}")]
    NotFound(u64),

    #[error("Order cannot be cancelled from status {0}")]
    CannotCancel(OrderStatus),

    #[error("Status {0} cannot be assigned by staff")]
    StatusNotAssignable(OrderStatus),
}
