//! Order lifecycle operations
//!
//! Composes the student directory, meal catalog, PayDPI client and notifier.
//! There is no cross-store transaction: a failure after the availability
//! decrement is undone with an explicit compensating release, and downstream
//! mock failures (refunds, notifications) are logged and swallowed so order
//! state never hostages on an integration.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use validator::Validate;

use crate::auth::{Claims, Role};
use crate::meals::MealCatalog;
use crate::notify::{Notification, Notifier};
use crate::payments::PayDpiClient;
use crate::payments::paydpi::now_ms;
use crate::students::StudentDirectory;

use super::error::OrderError;
use super::models::{
    CreateOrderRequest, Order, OrderStatus, PaymentStatus, StatusHistoryEntry,
};
use super::store::OrderStore;

pub struct OrderService {
    store: Arc<OrderStore>,
    meals: Arc<MealCatalog>,
    students: Arc<StudentDirectory>,
    paydpi: Arc<PayDpiClient>,
    notifier: Arc<dyn Notifier>,
    order_id_gen: AtomicU64,
}

impl OrderService {
    pub fn new(
        store: Arc<OrderStore>,
        meals: Arc<MealCatalog>,
        students: Arc<StudentDirectory>,
        paydpi: Arc<PayDpiClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            meals,
            students,
            paydpi,
            notifier,
            order_id_gen: AtomicU64::new(1),
        }
    }

    fn next_order_id(&self) -> u64 {
        self.order_id_gen.fetch_add(1, Ordering::SeqCst)
    }

    /// Place an order for the authenticated student.
    ///
    /// Returns the stored order plus a hint telling the client whether a
    /// payment is still owed (`final_amount > 0`).
    pub async fn create(
        &self,
        student_id: &str,
        req: CreateOrderRequest,
    ) -> Result<(Order, bool), OrderError> {
        req.validate()
            .map_err(|e| OrderError::Validation(e.to_string()))?;

        let today = Utc::now().date_naive();
        if req.scheduled_date < today {
            return Err(OrderError::Validation(
                "scheduled_date cannot be in the past".to_string(),
            ));
        }

        let student = self
            .students
            .get(student_id)
            .ok_or_else(|| OrderError::StudentNotFound(student_id.to_string()))?;

        let order_id = self.next_order_id();

        // Dedup slot first: cheapest step, and atomic via the index entry.
        self.store
            .claim_slot(student_id, req.scheduled_date, order_id)?;

        let meal = match self.meals.reserve(&req.meal_id, req.quantity) {
            Some(meal) => meal,
            None => {
                // compensate the slot claim
                self.store
                    .free_slot(student_id, req.scheduled_date, order_id);
                return Err(OrderError::MealUnavailable(req.meal_id));
            }
        };

        let qty = Decimal::from(req.quantity);
        let total_amount = meal.price * qty;
        let subsidy_amount = if student.subsidy_eligible {
            meal.subsidy_per_unit * qty
        } else {
            Decimal::ZERO
        };
        let final_amount = (total_amount - subsidy_amount).max(Decimal::ZERO);
        let payment_required = final_amount > Decimal::ZERO;

        let now = Utc::now();
        let mut order = Order {
            order_id,
            student_id: student.student_id.clone(),
            meal_id: meal.meal_id.clone(),
            meal_name: meal.name.clone(),
            school_id: student.school_id.clone(),
            scheduled_date: req.scheduled_date,
            quantity: req.quantity,
            total_amount,
            subsidy_amount,
            final_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        // Open a PayDPI session up front when money is owed. The mock cannot
        // fail, but the order is stored either way; payment stays best-effort.
        if payment_required {
            let session = self.paydpi.create_session(order_id, final_amount);
            order.payment_id = Some(session.payment_id);
            order.payment_status = PaymentStatus::Processing;
        }

        self.store.insert(order.clone());

        tracing::info!(
            order_id,
            student_id,
            meal_id = %order.meal_id,
            final_amount = %final_amount,
            payment_required,
            "Order created"
        );
        self.notifier
            .send(student_id, Notification::OrderCreated(&order))
            .await;

        Ok((order, payment_required))
    }

    /// Cancel an order. Students may cancel only their own PENDING/CONFIRMED
    /// orders; staff may cancel anyone's (same status rule).
    pub async fn cancel(&self, claims: &Claims, order_id: u64) -> Result<Order, OrderError> {
        self.get_for(claims, order_id)?;

        // Decide cancellability under the shard lock: two racing cancels must
        // not both pass the status check and double-release availability.
        let mut rejected_from: Option<OrderStatus> = None;
        let updated = self
            .store
            .update(order_id, |o| {
                if !o.status.is_cancellable() {
                    rejected_from = Some(o.status);
                    return;
                }
                let from = o.status;
                o.status = OrderStatus::Cancelled;
                o.status_history.push(StatusHistoryEntry {
                    from,
                    to: OrderStatus::Cancelled,
                    changed_by: claims.sub.clone(),
                    note: None,
                    changed_at: Utc::now(),
                });
                o.updated_at = Utc::now();
            })
            .ok_or(OrderError::NotFound(order_id))?;
        if let Some(from) = rejected_from {
            return Err(OrderError::CannotCancel(from));
        }

        self.meals.release(&updated.meal_id, updated.quantity);
        self.store
            .free_slot(&updated.student_id, updated.scheduled_date, order_id);

        // Best-effort refund for paid orders; a failure is logged, never surfaced.
        let updated = if updated.payment_status == PaymentStatus::Paid {
            self.try_refund(&updated).await
        } else {
            updated
        };

        tracing::info!(order_id, by = %claims.sub, "Order cancelled");
        self.notifier
            .send(&updated.student_id, Notification::OrderCancelled(&updated))
            .await;

        Ok(updated)
    }

    async fn try_refund(&self, order: &Order) -> Order {
        let Some(payment_id) = order.payment_id else {
            tracing::warn!(order_id = order.order_id, "Paid order has no payment id, skipping refund");
            return order.clone();
        };
        match self.paydpi.create_refund(payment_id, now_ms()) {
            Ok(refund) => self
                .store
                .update(order.order_id, |o| {
                    o.payment_status = PaymentStatus::Refunded;
                    o.updated_at = Utc::now();
                })
                .map(|o| {
                    tracing::info!(
                        order_id = o.order_id,
                        refund_id = %refund.refund_id,
                        "Refund initiated for cancelled order"
                    );
                    o
                })
                .unwrap_or_else(|| order.clone()),
            Err(e) => {
                tracing::warn!(order_id = order.order_id, "Refund request failed: {}", e);
                order.clone()
            }
        }
    }

    /// Staff status transition: unconditional overwrite within the allow-list,
    /// appending exactly one history entry.
    pub async fn update_status(
        &self,
        staff_id: &str,
        order_id: u64,
        new_status: OrderStatus,
        note: Option<String>,
    ) -> Result<Order, OrderError> {
        if !new_status.staff_assignable() {
            return Err(OrderError::StatusNotAssignable(new_status));
        }

        let order = self.store.get(order_id).ok_or(OrderError::NotFound(order_id))?;
        let from = order.status;

        let updated = self
            .store
            .update(order_id, |o| {
                o.status_history.push(StatusHistoryEntry {
                    from,
                    to: new_status,
                    changed_by: staff_id.to_string(),
                    note,
                    changed_at: Utc::now(),
                });
                o.status = new_status;
                o.updated_at = Utc::now();
            })
            .ok_or(OrderError::NotFound(order_id))?;

        // Staff cancellation restores availability like the student path.
        if new_status == OrderStatus::Cancelled && from != OrderStatus::Cancelled {
            self.meals.release(&updated.meal_id, updated.quantity);
            self.store
                .free_slot(&updated.student_id, updated.scheduled_date, order_id);
        }

        tracing::info!(order_id, from = %from, to = %new_status, by = staff_id, "Order status updated");
        self.notifier
            .send(
                &updated.student_id,
                Notification::OrderStatusChanged {
                    order: &updated,
                    from,
                },
            )
            .await;

        Ok(updated)
    }

    /// Fetch one order under the caller's visibility: staff see everything,
    /// students only their own (others read as not-found).
    pub fn get_for(&self, claims: &Claims, order_id: u64) -> Result<Order, OrderError> {
        let order = self.store.get(order_id).ok_or(OrderError::NotFound(order_id))?;
        if claims.role != Role::Staff && order.student_id != claims.sub {
            return Err(OrderError::NotFound(order_id));
        }
        Ok(order)
    }

    pub fn list_for(&self, claims: &Claims) -> Vec<Order> {
        match claims.role {
            Role::Staff => self.store.list_all(),
            Role::Student => self.store.list_for_student(&claims.sub),
        }
    }

    pub fn pending(&self) -> Vec<Order> {
        self.store.list_pending()
    }

    // ------------------------------------------------------------------
    // Payment observation hooks, called by the payment handlers whenever a
    // poll or webhook surfaces a session/refund transition.
    // ------------------------------------------------------------------

    /// Attach a fresh payment session to an order.
    pub fn attach_payment(&self, order_id: u64, payment_id: uuid::Uuid) -> Option<Order> {
        self.store.update(order_id, |o| {
            o.payment_id = Some(payment_id);
            o.payment_status = PaymentStatus::Processing;
            o.updated_at = Utc::now();
        })
    }

    /// A session was observed COMPLETED: mark paid, auto-confirm if pending.
    pub async fn on_payment_completed(&self, order_id: u64) -> Option<Order> {
        let updated = self.store.update(order_id, |o| {
            if o.payment_status != PaymentStatus::Paid {
                o.payment_status = PaymentStatus::Paid;
                if o.status == OrderStatus::Pending {
                    o.status = OrderStatus::Confirmed;
                }
                o.updated_at = Utc::now();
            }
        })?;
        self.notifier
            .send(
                &updated.student_id,
                Notification::PaymentCompleted(&updated),
            )
            .await;
        Some(updated)
    }

    /// A session was observed EXPIRED or CANCELLED: the charge failed.
    pub fn on_payment_failed(&self, order_id: u64) -> Option<Order> {
        self.store.update(order_id, |o| {
            if o.payment_status == PaymentStatus::Processing
                || o.payment_status == PaymentStatus::Pending
            {
                o.payment_status = PaymentStatus::Failed;
                o.updated_at = Utc::now();
            }
        })
    }

    /// A refund was observed COMPLETED.
    pub fn on_refund_completed(&self, order_id: u64) -> Option<Order> {
        self.store.update(order_id, |o| {
            o.payment_status = PaymentStatus::Refunded;
            o.updated_at = Utc::now();
        })
    }
}
