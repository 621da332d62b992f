//! Booking state changes driven by payment events.

use crate::entities::{BookingStatus, PaymentStatus, TransactionStatus};

/// What the payment provider reports for a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedPayment {
    Paid,
    Expired,
    Open,
}

impl ObservedPayment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservedPayment::Paid => "paid",
            ObservedPayment::Expired => "expired",
            ObservedPayment::Open => "open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTransition {
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub ledger_status: TransactionStatus,
    /// True only on the first move to paid
    pub sends_confirmation: bool,
}

/// `None` means the booking is left untouched. Paid is terminal here, so a
/// repeated or late event never produces a second confirmation.
pub fn payment_transition(
    status: BookingStatus,
    payment_status: PaymentStatus,
    observed: ObservedPayment,
) -> Option<PaymentTransition> {
    match observed {
        ObservedPayment::Paid => {
            if payment_status != PaymentStatus::Pending {
                return None;
            }
            // A cancelled booking no longer holds its nights, so a late
            // payment is recorded without reviving it.
            let (status, sends_confirmation) = match status {
                BookingStatus::Cancelled => (BookingStatus::Cancelled, false),
                BookingStatus::Completed => (BookingStatus::Completed, true),
                _ => (BookingStatus::Confirmed, true),
            };
            Some(PaymentTransition {
                status,
                payment_status: PaymentStatus::Paid,
                ledger_status: TransactionStatus::Paid,
                sends_confirmation,
            })
        }
        ObservedPayment::Expired => {
            if payment_status != PaymentStatus::Pending {
                return None;
            }
            Some(PaymentTransition {
                status: BookingStatus::Cancelled,
                payment_status: PaymentStatus::Expired,
                ledger_status: TransactionStatus::Expired,
                sends_confirmation: false,
            })
        }
        ObservedPayment::Open => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_payment_confirms_booking() {
        let t = payment_transition(
            BookingStatus::Pending,
            PaymentStatus::Pending,
            ObservedPayment::Paid,
        )
        .unwrap();
        assert_eq!(t.status, BookingStatus::Confirmed);
        assert_eq!(t.payment_status, PaymentStatus::Paid);
        assert!(t.sends_confirmation);
    }

    #[test]
    fn test_repeated_payment_is_a_no_op() {
        assert!(
            payment_transition(
                BookingStatus::Confirmed,
                PaymentStatus::Paid,
                ObservedPayment::Paid
            )
            .is_none()
        );
    }

    #[test]
    fn test_expiry_cancels_only_unpaid() {
        let t = payment_transition(
            BookingStatus::Pending,
            PaymentStatus::Pending,
            ObservedPayment::Expired,
        )
        .unwrap();
        assert_eq!(t.status, BookingStatus::Cancelled);
        assert_eq!(t.payment_status, PaymentStatus::Expired);
        assert!(!t.sends_confirmation);

        assert!(
            payment_transition(
                BookingStatus::Confirmed,
                PaymentStatus::Paid,
                ObservedPayment::Expired
            )
            .is_none()
        );
    }

    #[test]
    fn test_payment_after_cancellation_keeps_booking_cancelled() {
        let t = payment_transition(
            BookingStatus::Cancelled,
            PaymentStatus::Pending,
            ObservedPayment::Paid,
        )
        .unwrap();
        assert_eq!(t.status, BookingStatus::Cancelled);
        assert_eq!(t.payment_status, PaymentStatus::Paid);
        assert_eq!(t.ledger_status, TransactionStatus::Paid);
        assert!(!t.sends_confirmation);
    }

    #[test]
    fn test_open_session_changes_nothing() {
        assert!(
            payment_transition(
                BookingStatus::Pending,
                PaymentStatus::Pending,
                ObservedPayment::Open
            )
            .is_none()
        );
    }
}
