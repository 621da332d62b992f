pub mod admin_auth_service;
pub mod availability_service;
pub mod booking_service;
pub mod calendar_service;
pub mod contact_service;
pub mod coupon_service;
pub mod dashboard_service;
pub mod notification_service;
pub mod payment_service;
pub mod pricing_service;
pub mod review_service;
pub mod room_service;
pub mod settings_service;
pub mod upsell_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use admin_auth_service::*;
pub use availability_service::*;
pub use booking_service::*;
pub use calendar_service::*;
pub use contact_service::*;
pub use coupon_service::*;
pub use dashboard_service::*;
pub use notification_service::*;
pub use payment_service::*;
pub use pricing_service::*;
pub use review_service::*;
pub use room_service::*;
pub use settings_service::*;
pub use upsell_service::*;

use crate::error::AppError;
use sea_orm::{DbErr, SqlErr};

/// Unique index hits become a 409 with `message`; anything else stays a
/// database error.
pub(crate) fn map_unique_violation(err: DbErr, message: impl Into<String>) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.into()),
        _ => AppError::DatabaseError(err),
    }
}
