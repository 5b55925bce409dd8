//! Order lifecycle service
//!
//! Owns order creation, queries, cancellation and staff status transitions
//! over an in-memory store, composing the meal catalog, student directory,
//! PayDPI client and notifier.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;
pub mod store;

pub use error::OrderError;
pub use models::{
    CreateOrderRequest, Order, OrderStatus, PaymentStatus, StatusHistoryEntry, UpdateStatusRequest,
};
pub use service::OrderService;
pub use store::OrderStore;
