//! Notification service (mock)
//!
//! Stands in for SMS / app push. The only delivery channel is the log.

use async_trait::async_trait;
use std::fmt;

use crate::orders::models::{Order, OrderStatus};

#[derive(Debug)]
pub enum Notification<'a> {
    OrderCreated(&'a Order),
    OrderCancelled(&'a Order),
    OrderStatusChanged { order: &'a Order, from: OrderStatus },
    PaymentCompleted(&'a Order),
}

impl fmt::Display for Notification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::OrderCreated(o) => write!(
                f,
                "Order #{} placed: {} x{} for {}",
                o.order_id, o.meal_name, o.quantity, o.scheduled_date
            ),
            Notification::OrderCancelled(o) => {
                write!(f, "Order #{} cancelled", o.order_id)
            }
            Notification::OrderStatusChanged { order, from } => write!(
                f,
                "Order #{} moved {} -> {}",
                order.order_id, from, order.status
            ),
            Notification::PaymentCompleted(o) => write!(
                f,
                "Payment of {} LKR received for order #{}",
                o.final_amount, o.order_id
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, recipient: &str, notification: Notification<'_>);
}

/// Log-only notifier used everywhere in the prototype.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, notification: Notification<'_>) {
        tracing::info!(target: "notify", recipient, "{}", notification);
    }
}
