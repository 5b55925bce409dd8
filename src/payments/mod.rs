//! Payment service: façade over the mock PayDPI gateway
//!
//! PayDPI is simulated entirely in memory. Session and refund states advance
//! on elapsed wall-clock time at each poll, not on any real settlement
//! signal; the webhook endpoint lets the (equally fictional) gateway push
//! the same transitions.

pub mod error;
pub mod handlers;
pub mod models;
pub mod paydpi;

pub use error::PaymentError;
pub use models::{PaymentSession, PaymentState, Refund, RefundState};
pub use paydpi::PayDpiClient;
