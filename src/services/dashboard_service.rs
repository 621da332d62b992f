use crate::entities::{
    BookingStatus, PaymentStatus, booking_entity, contact_message_entity, review_entity,
};
use crate::error::AppResult;
use crate::models::{BookingCounts, DashboardStats};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};

/// Window for the upcoming arrivals counter
const UPCOMING_DAYS: i64 = 30;

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
}

fn tally(rows: Vec<(String, i64)>) -> BookingCounts {
    let mut counts = BookingCounts::default();
    for (status, count) in rows {
        let count = count.max(0) as u64;
        match BookingStatus::try_from_value(&status) {
            Ok(BookingStatus::Pending) => counts.pending += count,
            Ok(BookingStatus::Confirmed) => counts.confirmed += count,
            Ok(BookingStatus::Cancelled) => counts.cancelled += count,
            Ok(BookingStatus::Completed) => counts.completed += count,
            Err(_) => log::warn!("Unknown booking status in database: {status}"),
        }
    }
    counts
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let by_status: Vec<(String, i64)> = booking_entity::Entity::find()
            .select_only()
            .column(booking_entity::Column::Status)
            .column_as(Expr::col(booking_entity::Column::Id).count(), "count")
            .group_by(booking_entity::Column::Status)
            .into_tuple()
            .all(&self.pool)
            .await?;

        let revenue: Option<Option<Decimal>> = booking_entity::Entity::find()
            .select_only()
            .column_as(Expr::col(booking_entity::Column::TotalPrice).sum(), "revenue")
            .filter(booking_entity::Column::PaymentStatus.eq(PaymentStatus::Paid))
            .filter(booking_entity::Column::Status.ne(BookingStatus::Cancelled))
            .into_tuple()
            .one(&self.pool)
            .await?;

        let today = Utc::now().date_naive();
        let upcoming_arrivals = booking_entity::Entity::find()
            .filter(booking_entity::Column::Status.eq(BookingStatus::Confirmed))
            .filter(
                booking_entity::Column::CheckIn.between(today, today + Duration::days(UPCOMING_DAYS)),
            )
            .count(&self.pool)
            .await?;

        let unread_messages = contact_message_entity::Entity::find()
            .filter(contact_message_entity::Column::IsRead.eq(false))
            .count(&self.pool)
            .await?;

        let pending_reviews = review_entity::Entity::find()
            .filter(review_entity::Column::IsApproved.eq(false))
            .count(&self.pool)
            .await?;

        Ok(DashboardStats {
            bookings: tally(by_status),
            revenue: revenue.flatten().unwrap_or(Decimal::ZERO),
            upcoming_arrivals,
            unread_messages,
            pending_reviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_by_status() {
        let counts = tally(vec![
            ("pending".to_string(), 2),
            ("confirmed".to_string(), 5),
            ("completed".to_string(), 11),
            ("archived".to_string(), 1),
        ]);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.confirmed, 5);
        assert_eq!(counts.cancelled, 0);
        assert_eq!(counts.completed, 11);
    }
}
