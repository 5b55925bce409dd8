//! Mock PayDPI gateway client
//!
//! Stands in for the government payment gateway. Sessions live in a DashMap;
//! state is a pure function of elapsed time since `initiated_at_ms`
//! (`state_at`), so the progression is scripted rather than settled:
//! INITIATED until `processing_after_ms`, PROCESSING until
//! `completed_after_ms`, COMPLETED after that, EXPIRED past the session TTL
//! without completion. Refunds follow the same pattern on shorter timers.

use dashmap::DashMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use rust_decimal::Decimal;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::config::PayDpiConfig;

use super::error::PaymentError;
use super::models::{PaymentSession, PaymentState, Refund, RefundState};

/// Refund progression timers (refunds clear faster than charges)
const REFUND_PROCESSING_AFTER_MS: u64 = 10_000;
const REFUND_COMPLETED_AFTER_MS: u64 = 30_000;

/// Gateway fee rate: 1.5%
fn gateway_fee(amount: Decimal) -> Decimal {
    (amount * Decimal::new(15, 3)).round_dp(2)
}

/// Current time in epoch milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_millis() as u64
}

pub struct PayDpiClient {
    config: PayDpiConfig,
    sessions: DashMap<Uuid, PaymentSession>,
    refunds: DashMap<Uuid, Refund>,
}

impl PayDpiClient {
    pub fn new(config: PayDpiConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            refunds: DashMap::new(),
        }
    }

    /// Open a payment session for an order.
    pub fn create_session(&self, order_id: u64, amount: Decimal) -> PaymentSession {
        let initiated_at_ms = now_ms();
        let session = PaymentSession {
            payment_id: Uuid::new_v4(),
            order_id,
            amount,
            fee: gateway_fee(amount),
            state: PaymentState::Initiated,
            bank_reference: bank_reference(),
            initiated_at_ms,
            expires_at_ms: initiated_at_ms + self.config.session_ttl_ms,
        };
        self.sessions.insert(session.payment_id, session.clone());
        tracing::info!(
            payment_id = %session.payment_id,
            order_id,
            amount = %amount,
            "PayDPI session created"
        );
        session
    }

    /// Scripted state progression: pure so tests can probe instants directly.
    pub fn state_at(&self, session: &PaymentSession, at_ms: u64) -> PaymentState {
        if session.state.is_terminal() {
            return session.state;
        }
        let elapsed = at_ms.saturating_sub(session.initiated_at_ms);
        if elapsed >= self.config.completed_after_ms {
            PaymentState::Completed
        } else if at_ms >= session.expires_at_ms {
            PaymentState::Expired
        } else if elapsed >= self.config.processing_after_ms {
            PaymentState::Processing
        } else {
            PaymentState::Initiated
        }
    }

    /// Poll a session, persisting the recomputed state.
    pub fn poll_session(&self, payment_id: Uuid, at_ms: u64) -> Result<PaymentSession, PaymentError> {
        let mut entry = self
            .sessions
            .get_mut(&payment_id)
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;
        let next = self.state_at(&entry, at_ms);
        if next != entry.state {
            tracing::info!(payment_id = %payment_id, from = %entry.state, to = %next, "PayDPI session progressed");
            entry.state = next;
        }
        Ok(entry.clone())
    }

    pub fn get_session(&self, payment_id: Uuid) -> Option<PaymentSession> {
        self.sessions.get(&payment_id).map(|s| s.clone())
    }

    /// Gateway-pushed state override (webhook path).
    pub fn apply_webhook(
        &self,
        payment_id: Uuid,
        state: PaymentState,
    ) -> Result<PaymentSession, PaymentError> {
        let mut entry = self
            .sessions
            .get_mut(&payment_id)
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;
        tracing::info!(payment_id = %payment_id, from = %entry.state, to = %state, "PayDPI webhook state update");
        entry.state = state;
        Ok(entry.clone())
    }

    /// Create a refund for a COMPLETED session. One refund per session.
    pub fn create_refund(&self, payment_id: Uuid, at_ms: u64) -> Result<Refund, PaymentError> {
        // settle the session state first so a completed-but-unpolled session refunds
        let session = self.poll_session(payment_id, at_ms)?;
        if session.state != PaymentState::Completed {
            return Err(PaymentError::NotRefundable(session.state));
        }
        if self.refunds.iter().any(|r| r.payment_id == payment_id) {
            return Err(PaymentError::DuplicateRefund(payment_id));
        }

        let refund = Refund {
            refund_id: Uuid::new_v4(),
            payment_id,
            order_id: session.order_id,
            amount: session.amount,
            state: RefundState::Initiated,
            initiated_at_ms: at_ms,
        };
        self.refunds.insert(refund.refund_id, refund.clone());
        tracing::info!(
            refund_id = %refund.refund_id,
            payment_id = %payment_id,
            amount = %refund.amount,
            "PayDPI refund initiated"
        );
        Ok(refund)
    }

    pub fn refund_state_at(&self, refund: &Refund, at_ms: u64) -> RefundState {
        if refund.state.is_terminal() {
            return refund.state;
        }
        let elapsed = at_ms.saturating_sub(refund.initiated_at_ms);
        if elapsed >= REFUND_COMPLETED_AFTER_MS {
            RefundState::Completed
        } else if elapsed >= REFUND_PROCESSING_AFTER_MS {
            RefundState::Processing
        } else {
            RefundState::Initiated
        }
    }

    /// Poll a refund, persisting the recomputed state.
    pub fn poll_refund(&self, refund_id: Uuid, at_ms: u64) -> Result<Refund, PaymentError> {
        let mut entry = self
            .refunds
            .get_mut(&refund_id)
            .ok_or(PaymentError::RefundNotFound(refund_id))?;
        let next = self.refund_state_at(&entry, at_ms);
        if next != entry.state {
            tracing::info!(refund_id = %refund_id, from = %entry.state, to = %next, "PayDPI refund progressed");
            entry.state = next;
        }
        Ok(entry.clone())
    }
}

/// Canned bank reference: LKPAY- plus 10 alphanumerics.
fn bank_reference() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("LKPAY-{}", suffix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PayDpiClient {
        PayDpiClient::new(PayDpiConfig::default())
    }

    fn amount() -> Decimal {
        Decimal::new(30000, 2) // 300.00
    }

    #[test]
    fn test_fee_is_one_and_a_half_percent() {
        assert_eq!(gateway_fee(Decimal::new(30000, 2)), Decimal::new(450, 2)); // 4.50
        assert_eq!(gateway_fee(Decimal::new(10000, 2)), Decimal::new(150, 2)); // 1.50
    }

    #[test]
    fn test_session_progression_by_elapsed_time() {
        let c = client();
        let s = c.create_session(1, amount());
        let t0 = s.initiated_at_ms;

        assert_eq!(c.state_at(&s, t0), PaymentState::Initiated);
        assert_eq!(c.state_at(&s, t0 + 29_999), PaymentState::Initiated);
        assert_eq!(c.state_at(&s, t0 + 30_000), PaymentState::Processing);
        assert_eq!(c.state_at(&s, t0 + 59_999), PaymentState::Processing);
        assert_eq!(c.state_at(&s, t0 + 60_000), PaymentState::Completed);
    }

    #[test]
    fn test_session_expires_without_completion() {
        // 100ms to process, never completes inside the 1s ttl window
        let c = PayDpiClient::new(PayDpiConfig {
            processing_after_ms: 100,
            completed_after_ms: 10_000,
            session_ttl_ms: 1_000,
        });
        let s = c.create_session(1, amount());
        let t0 = s.initiated_at_ms;

        assert_eq!(c.state_at(&s, t0 + 500), PaymentState::Processing);
        assert_eq!(c.state_at(&s, t0 + 1_000), PaymentState::Expired);
    }

    #[test]
    fn test_poll_persists_terminal_state() {
        let c = client();
        let s = c.create_session(1, amount());
        let done = c.poll_session(s.payment_id, s.initiated_at_ms + 60_000).unwrap();
        assert_eq!(done.state, PaymentState::Completed);

        // terminal state sticks even if polled at an earlier-looking instant
        let again = c.poll_session(s.payment_id, s.initiated_at_ms).unwrap();
        assert_eq!(again.state, PaymentState::Completed);
    }

    #[test]
    fn test_refund_requires_completed_session() {
        let c = client();
        let s = c.create_session(1, amount());
        let err = c.create_refund(s.payment_id, s.initiated_at_ms + 1_000);
        assert!(matches!(err, Err(PaymentError::NotRefundable(_))));

        let refund = c
            .create_refund(s.payment_id, s.initiated_at_ms + 60_000)
            .unwrap();
        assert_eq!(refund.state, RefundState::Initiated);
        assert_eq!(refund.amount, amount());
    }

    #[test]
    fn test_second_refund_rejected() {
        let c = client();
        let s = c.create_session(1, amount());
        let t = s.initiated_at_ms + 60_000;
        c.create_refund(s.payment_id, t).unwrap();
        assert!(matches!(
            c.create_refund(s.payment_id, t),
            Err(PaymentError::DuplicateRefund(_))
        ));
    }

    #[test]
    fn test_refund_progression() {
        let c = client();
        let s = c.create_session(1, amount());
        let t = s.initiated_at_ms + 60_000;
        let refund = c.create_refund(s.payment_id, t).unwrap();

        assert_eq!(c.refund_state_at(&refund, t + 9_999), RefundState::Initiated);
        assert_eq!(c.refund_state_at(&refund, t + 10_000), RefundState::Processing);
        assert_eq!(c.refund_state_at(&refund, t + 30_000), RefundState::Completed);
    }

    #[test]
    fn test_webhook_overrides_state() {
        let c = client();
        let s = c.create_session(1, amount());
        let updated = c
            .apply_webhook(s.payment_id, PaymentState::Completed)
            .unwrap();
        assert_eq!(updated.state, PaymentState::Completed);
    }

    #[test]
    fn test_unknown_payment_rejected() {
        let c = client();
        assert!(matches!(
            c.poll_session(Uuid::new_v4(), now_ms()),
            Err(PaymentError::PaymentNotFound(_))
        ));
    }

    #[test]
    fn test_bank_reference_format() {
        let r = bank_reference();
        assert!(r.starts_with("LKPAY-"));
        assert_eq!(r.len(), 16);
    }
}
