//! In-memory order store
//!
//! Two maps: orders by id, plus a dedup index enforcing the invariant that a
//! student holds at most one non-cancelled order per scheduled date. The
//! index claim goes through `DashMap::entry`, so the duplicate check and the
//! claim are a single atomic step rather than check-then-act.

use chrono::NaiveDate;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::error::OrderError;
use super::models::{Order, OrderStatus};

#[derive(Default)]
pub struct OrderStore {
    orders: DashMap<u64, Order>,
    /// (student_id, scheduled_date) -> order_id for non-cancelled orders
    active_by_day: DashMap<(String, NaiveDate), u64>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the one-active-order-per-day slot for (student, date).
    pub fn claim_slot(
        &self,
        student_id: &str,
        date: NaiveDate,
        order_id: u64,
    ) -> Result<(), OrderError> {
        match self
            .active_by_day
            .entry((student_id.to_string(), date))
        {
            Entry::Occupied(_) => Err(OrderError::DuplicateOrder),
            Entry::Vacant(slot) => {
                slot.insert(order_id);
                Ok(())
            }
        }
    }

    /// Release the dedup slot after cancellation. Only removes the slot if it
    /// still points at this order.
    pub fn free_slot(&self, student_id: &str, date: NaiveDate, order_id: u64) {
        self.active_by_day
            .remove_if(&(student_id.to_string(), date), |_, held| *held == order_id);
    }

    pub fn insert(&self, order: Order) {
        self.orders.insert(order.order_id, order);
    }

    pub fn get(&self, order_id: u64) -> Option<Order> {
        self.orders.get(&order_id).map(|o| o.clone())
    }

    /// Mutate an order in place under the shard lock; returns the updated copy.
    pub fn update<F>(&self, order_id: u64, f: F) -> Option<Order>
    where
        F: FnOnce(&mut Order),
    {
        let mut entry = self.orders.get_mut(&order_id)?;
        f(&mut entry);
        Some(entry.clone())
    }

    pub fn list_for_student(&self, student_id: &str) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.student_id == student_id)
            .map(|o| o.clone())
            .collect();
        orders.sort_by(|a, b| b.order_id.cmp(&a.order_id));
        orders
    }

    pub fn list_all(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.iter().map(|o| o.clone()).collect();
        orders.sort_by(|a, b| b.order_id.cmp(&a.order_id));
        orders
    }

    pub fn list_pending(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .map(|o| o.clone())
            .collect();
        orders.sort_by(|a, b| a.order_id.cmp(&b.order_id));
        orders
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::models::PaymentStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sample_order(order_id: u64, student_id: &str, date: NaiveDate) -> Order {
        Order {
            order_id,
            student_id: student_id.to_string(),
            meal_id: "MEAL-RICE-CURRY".to_string(),
            meal_name: "Rice & Curry".to_string(),
            school_id: "SCH-COL-042".to_string(),
            scheduled_date: date,
            quantity: 1,
            total_amount: Decimal::new(25000, 2),
            subsidy_amount: Decimal::new(15000, 2),
            final_amount: Decimal::new(10000, 2),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            status_history: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_slot_claim_blocks_same_day_duplicate() {
        let store = OrderStore::new();
        let d = date("2030-01-15");
        store.claim_slot("STU-2024-001", d, 1).unwrap();
        assert!(matches!(
            store.claim_slot("STU-2024-001", d, 2),
            Err(OrderError::DuplicateOrder)
        ));
        // different day or student is fine
        store.claim_slot("STU-2024-001", date("2030-01-16"), 3).unwrap();
        store.claim_slot("STU-2024-002", d, 4).unwrap();
    }

    #[test]
    fn test_free_slot_reopens_day() {
        let store = OrderStore::new();
        let d = date("2030-01-15");
        store.claim_slot("STU-2024-001", d, 1).unwrap();
        store.free_slot("STU-2024-001", d, 1);
        store.claim_slot("STU-2024-001", d, 2).unwrap();
    }

    #[test]
    fn test_free_slot_ignores_stale_order_id() {
        let store = OrderStore::new();
        let d = date("2030-01-15");
        store.claim_slot("STU-2024-001", d, 7).unwrap();
        // order 1 no longer owns the slot; must not free order 7's claim
        store.free_slot("STU-2024-001", d, 1);
        assert!(matches!(
            store.claim_slot("STU-2024-001", d, 8),
            Err(OrderError::DuplicateOrder)
        ));
    }

    #[test]
    fn test_list_for_student_newest_first() {
        let store = OrderStore::new();
        store.insert(sample_order(1, "STU-2024-001", date("2030-01-15")));
        store.insert(sample_order(2, "STU-2024-001", date("2030-01-16")));
        store.insert(sample_order(3, "STU-2024-002", date("2030-01-15")));

        let mine = store.list_for_student("STU-2024-001");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].order_id, 2);
        assert_eq!(mine[1].order_id, 1);
    }

    #[test]
    fn test_update_in_place() {
        let store = OrderStore::new();
        store.insert(sample_order(1, "STU-2024-001", date("2030-01-15")));
        let updated = store
            .update(1, |o| o.status = OrderStatus::Confirmed)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);
        assert_eq!(store.get(1).unwrap().status, OrderStatus::Confirmed);
    }
}
