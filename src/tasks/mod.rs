//! Recurring background jobs.
//!
//! `spawn_all` is called once at startup. Every job is safe to repeat, so a
//! restart or an overlapping run only redoes work that is already settled.

use crate::config::TasksConfig;
use crate::services::{AdminAuthService, BookingService, PaymentService};
use std::time::Duration;

/// Spawn all background tasks. Returns immediately.
pub fn spawn_all(
    config: &TasksConfig,
    payment_service: PaymentService,
    booking_service: BookingService,
    auth_service: AdminAuthService,
) {
    // Pending checkouts whose webhook never arrived
    {
        let svc = payment_service.clone();
        let grace_minutes = config.pending_grace_minutes;
        let interval = Duration::from_secs(config.reconcile_interval_secs.max(60));
        tokio::spawn(async move {
            loop {
                match svc.reconcile_pending(grace_minutes).await {
                    Ok(n) if n > 0 => log::info!("Reconciled pending bookings: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to reconcile pending bookings: {e:?}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }

    // Confirmed stays past check-out (hourly)
    {
        let svc = booking_service.clone();
        tokio::spawn(async move {
            loop {
                let today = chrono::Utc::now().date_naive();
                match svc.complete_past_stays(today).await {
                    Ok(n) if n > 0 => log::info!("Bookings marked completed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to complete past stays: {e:?}"),
                }
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    }

    // Expired admin sessions (every 6 hours)
    {
        let svc = auth_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.purge_expired().await {
                    Ok(n) if n > 0 => log::info!("Expired admin sessions removed: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to purge admin sessions: {e:?}"),
                }
                tokio::time::sleep(Duration::from_secs(6 * 3600)).await;
            }
        });
    }
}
