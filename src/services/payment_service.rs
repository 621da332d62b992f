//! Applies checkout session outcomes to bookings.
//!
//! Webhooks, the status poll from the success page and the reconciliation
//! task all funnel into [`PaymentService::apply_observation`]. The booking row
//! only moves when it is still awaiting payment, so whichever path arrives
//! first wins and the confirmation email goes out once.

use crate::domain::{ObservedPayment, payment_transition, to_minor_units};
use crate::entities::{BookingStatus, PaymentStatus, booking_entity, payment_transaction_entity};
use crate::error::{AppError, AppResult};
use crate::external::{PaymentGateway, SessionSnapshot};
use crate::services::notification_service::NotificationService;
use chrono::{Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    gateway: Arc<dyn PaymentGateway>,
    notifications: NotificationService,
}

impl PaymentService {
    pub fn new(
        pool: DatabaseConnection,
        gateway: Arc<dyn PaymentGateway>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            gateway,
            notifications,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn PaymentGateway> {
        &self.gateway
    }

    async fn find_by_session(&self, session_id: &str) -> AppResult<booking_entity::Model> {
        booking_entity::Entity::find()
            .filter(booking_entity::Column::StripeSessionId.eq(session_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No booking for session {session_id}")))
    }

    /// Records what the provider reported for a session and returns the
    /// booking as it stands afterwards.
    pub async fn apply_observation(
        &self,
        snapshot: &SessionSnapshot,
    ) -> AppResult<booking_entity::Model> {
        let mut booking = self.find_by_session(&snapshot.session_id).await?;
        // A second pass covers an admin status change landing between the
        // read and the conditional update.
        for _ in 0..2 {
            let Some(transition) =
                payment_transition(booking.status, booking.payment_status, snapshot.observed)
            else {
                return Ok(booking);
            };

            if snapshot.observed == ObservedPayment::Paid
                && let Some(amount) = snapshot.amount_total
                && amount != to_minor_units(booking.total_price)
            {
                log::warn!(
                    "Session {} paid {amount} but booking {} expects {}",
                    snapshot.session_id,
                    booking.id,
                    booking.total_price
                );
            }

            let now = Utc::now();
            let updated = booking_entity::Entity::update_many()
                .col_expr(
                    booking_entity::Column::Status,
                    Expr::value(transition.status.to_value()),
                )
                .col_expr(
                    booking_entity::Column::PaymentStatus,
                    Expr::value(transition.payment_status.to_value()),
                )
                .col_expr(booking_entity::Column::UpdatedAt, Expr::value(now))
                .filter(booking_entity::Column::Id.eq(booking.id))
                .filter(booking_entity::Column::Status.eq(booking.status))
                .filter(booking_entity::Column::PaymentStatus.eq(PaymentStatus::Pending))
                .exec(&self.pool)
                .await?;
            if updated.rows_affected == 0 {
                log::info!(
                    "Booking {} changed while applying session {}, reloading",
                    booking.id,
                    snapshot.session_id
                );
                booking = self.find_by_session(&snapshot.session_id).await?;
                continue;
            }

            payment_transaction_entity::Entity::update_many()
                .col_expr(
                    payment_transaction_entity::Column::Status,
                    Expr::value(transition.ledger_status.to_value()),
                )
                .col_expr(
                    payment_transaction_entity::Column::PaymentStatus,
                    Expr::value(snapshot.observed.as_str()),
                )
                .col_expr(payment_transaction_entity::Column::UpdatedAt, Expr::value(now))
                .filter(payment_transaction_entity::Column::SessionId.eq(&snapshot.session_id))
                .exec(&self.pool)
                .await?;

            if booking.status == BookingStatus::Cancelled
                && transition.payment_status == PaymentStatus::Paid
            {
                log::warn!(
                    "Booking {} was paid after cancellation (session {}), refund needed",
                    booking.id,
                    snapshot.session_id
                );
            } else {
                log::info!(
                    "Booking {} is now {} ({})",
                    booking.id,
                    transition.status,
                    transition.payment_status
                );
            }
            booking.status = transition.status;
            booking.payment_status = transition.payment_status;
            booking.updated_at = now;

            if transition.sends_confirmation {
                self.deliver_confirmation(&mut booking).await?;
            }
            return Ok(booking);
        }
        Ok(booking)
    }

    /// Emails guest and owner, then stamps `confirmation_sent_at`.
    pub async fn deliver_confirmation(&self, booking: &mut booking_entity::Model) -> AppResult<()> {
        if !self.notifications.booking_confirmed(booking).await {
            return Ok(());
        }
        let sent_at = Utc::now();
        booking_entity::Entity::update_many()
            .col_expr(
                booking_entity::Column::ConfirmationSentAt,
                Expr::value(sent_at),
            )
            .filter(booking_entity::Column::Id.eq(booking.id))
            .exec(&self.pool)
            .await?;
        booking.confirmation_sent_at = Some(sent_at);
        Ok(())
    }

    /// Verified webhook entry point. Events for unknown sessions are
    /// acknowledged so the provider stops retrying them.
    pub async fn handle_webhook(&self, payload: &str, signature: &str) -> AppResult<()> {
        let Some(snapshot) = self.gateway.parse_webhook(payload, signature)? else {
            return Ok(());
        };
        match self.apply_observation(&snapshot).await {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(msg)) => {
                log::warn!("Ignoring webhook: {msg}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Looks up the session at the provider unless the booking is already
    /// settled locally.
    pub async fn check_session(
        &self,
        session_id: &str,
    ) -> AppResult<(ObservedPayment, booking_entity::Model)> {
        let booking = self.find_by_session(session_id).await?;
        match booking.payment_status {
            PaymentStatus::Paid => return Ok((ObservedPayment::Paid, booking)),
            PaymentStatus::Expired => return Ok((ObservedPayment::Expired, booking)),
            _ => {}
        }
        let snapshot = self.gateway.retrieve_session(session_id).await?;
        let booking = self.apply_observation(&snapshot).await?;
        Ok((snapshot.observed, booking))
    }

    /// Catches up on bookings whose webhook never arrived. Returns how many
    /// bookings changed state.
    pub async fn reconcile_pending(&self, grace_minutes: i64) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::minutes(grace_minutes);
        let pending = booking_entity::Entity::find()
            .filter(booking_entity::Column::Status.eq(BookingStatus::Pending))
            .filter(booking_entity::Column::PaymentStatus.eq(PaymentStatus::Pending))
            .filter(booking_entity::Column::StripeSessionId.is_not_null())
            .filter(booking_entity::Column::CreatedAt.lt(cutoff))
            .order_by_asc(booking_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let mut changed = 0;
        for booking in pending {
            let Some(session_id) = booking.stripe_session_id.as_deref() else {
                continue;
            };
            let snapshot = match self.gateway.retrieve_session(session_id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::error!("Failed to retrieve session {session_id}: {e}");
                    continue;
                }
            };
            if snapshot.observed == ObservedPayment::Open {
                continue;
            }
            match self.apply_observation(&snapshot).await {
                Ok(after) if after.payment_status != booking.payment_status => changed += 1,
                Ok(_) => {}
                Err(e) => {
                    log::error!("Failed to reconcile booking {}: {e}", booking.id);
                }
            }
        }
        Ok(changed)
    }
}
