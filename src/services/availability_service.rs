use crate::domain::unavailable_dates;
use crate::entities::{BookingStatus, blocked_date_entity, booking_entity, custom_price_entity};
use crate::error::AppResult;
use crate::models::AvailabilityResponse;
use crate::services::room_service::find_room;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::BTreeMap;

#[derive(Clone)]
pub struct AvailabilityService {
    pool: DatabaseConnection,
}

impl AvailabilityService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Unavailable nights and price overrides for `[start_date, end_date]`.
    pub async fn get_availability(
        &self,
        room_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<AvailabilityResponse> {
        let room = find_room(&self.pool, room_id).await?;
        let mut response = AvailabilityResponse {
            room_id: room.id.clone(),
            default_price: room.price_per_night,
            unavailable_dates: Vec::new(),
            custom_prices: BTreeMap::new(),
        };
        if start_date > end_date {
            return Ok(response);
        }

        let bookings = booking_entity::Entity::find()
            .filter(booking_entity::Column::RoomId.eq(&room.id))
            .filter(booking_entity::Column::Status.is_in(BookingStatus::OCCUPYING))
            .filter(booking_entity::Column::CheckIn.lte(end_date))
            .filter(booking_entity::Column::CheckOut.gt(start_date))
            .all(&self.pool)
            .await?;

        let blocked = blocked_date_entity::Entity::find()
            .filter(blocked_date_entity::Column::RoomId.eq(&room.id))
            .filter(blocked_date_entity::Column::Date.between(start_date, end_date))
            .all(&self.pool)
            .await?;

        let custom_prices = custom_price_entity::Entity::find()
            .filter(custom_price_entity::Column::RoomId.eq(&room.id))
            .filter(custom_price_entity::Column::Date.between(start_date, end_date))
            .order_by_asc(custom_price_entity::Column::Date)
            .all(&self.pool)
            .await?;

        response.unavailable_dates = unavailable_dates(
            start_date,
            end_date,
            bookings.iter().map(|b| (b.check_in, b.check_out)),
            blocked.iter().map(|d| d.date),
        )
        .into_iter()
        .collect();
        response.custom_prices = custom_prices.into_iter().map(|c| (c.date, c.price)).collect();

        log::debug!(
            "Availability for {} {start_date}..{end_date}: {} unavailable nights",
            room.id,
            response.unavailable_dates.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::room_entity;
    use crate::models::CustomPriceRequest;
    use crate::services::calendar_service::CalendarService;
    use crate::services::fixtures::{booking, d, exec, room};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_availability_unions_bookings_and_blocks() {
        let blocked = blocked_date_entity::Model {
            id: Uuid::new_v4(),
            room_id: "pozzo".to_string(),
            date: d("2026-07-10"),
            reason: Some("manutenzione".to_string()),
            created_at: Utc::now(),
        };
        let custom = custom_price_entity::Model {
            id: Uuid::new_v4(),
            room_id: "pozzo".to_string(),
            date: d("2026-07-11"),
            price: dec!(120),
            reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("pozzo", dec!(80))]])
            .append_query_results([vec![booking("pozzo", "2026-07-01", "2026-07-05")]])
            .append_query_results([vec![blocked]])
            .append_query_results([vec![custom]])
            .into_connection();
        let service = AvailabilityService::new(db);

        let response = service
            .get_availability("pozzo", d("2026-07-01"), d("2026-07-31"))
            .await
            .unwrap();

        assert_eq!(response.default_price, dec!(80));
        assert_eq!(
            response.unavailable_dates,
            vec![
                d("2026-07-01"),
                d("2026-07-02"),
                d("2026-07-03"),
                d("2026-07-04"),
                d("2026-07-10"),
            ]
        );
        assert!(!response.unavailable_dates.contains(&d("2026-07-05")));
        assert_eq!(response.custom_prices.get(&d("2026-07-11")), Some(&dec!(120)));
    }

    fn price_row(date: NaiveDate, price: Decimal) -> custom_price_entity::Model {
        custom_price_entity::Model {
            id: Uuid::new_v4(),
            room_id: "nonna".to_string(),
            date,
            price,
            reason: Some("Ferragosto".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_deleted_custom_price_leaves_availability() {
        let start = d("2026-08-10");
        let removed = d("2026-08-12");
        let remaining: Vec<_> = (0..5)
            .map(|i| start + Duration::days(i))
            .filter(|date| *date != removed)
            .map(|date| price_row(date, dec!(120)))
            .collect();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // set_custom_prices
            .append_query_results([vec![room("nonna", dec!(80))]])
            .append_exec_results([exec(5)])
            // delete_custom_price
            .append_exec_results([exec(1)])
            // get_availability
            .append_query_results([vec![room("nonna", dec!(80))]])
            .append_query_results([Vec::<booking_entity::Model>::new()])
            .append_query_results([Vec::<blocked_date_entity::Model>::new()])
            .append_query_results([remaining])
            .into_connection();
        let calendar = CalendarService::new(db.clone(), "Desideri di Puglia".to_string());
        let availability = AvailabilityService::new(db.clone());

        let set = calendar
            .set_custom_prices(CustomPriceRequest {
                room_id: "nonna".to_string(),
                start_date: start,
                end_date: d("2026-08-14"),
                price: dec!(120),
                reason: Some("Ferragosto".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(set.count, 5);

        calendar.delete_custom_price("nonna", removed).await.unwrap();

        let response = availability
            .get_availability("nonna", d("2026-08-01"), d("2026-08-31"))
            .await
            .unwrap();
        assert_eq!(response.custom_prices.len(), 4);
        assert!(!response.custom_prices.contains_key(&removed));
        assert_eq!(response.custom_prices.get(&d("2026-08-14")), Some(&dec!(120)));

        let log = db.into_transaction_log();
        assert!(log.iter().any(|t| format!("{t:?}").contains("DELETE")));
    }

    #[tokio::test]
    async fn test_reversed_window_returns_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("nonna", dec!(80))]])
            .into_connection();
        let service = AvailabilityService::new(db);

        let response = service
            .get_availability("nonna", d("2026-07-31"), d("2026-07-01"))
            .await
            .unwrap();
        assert!(response.unavailable_dates.is_empty());
        assert!(response.custom_prices.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_room() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<room_entity::Model>::new()])
            .into_connection();
        let service = AvailabilityService::new(db);
        assert!(
            service
                .get_availability("soffitta", d("2026-07-01"), d("2026-07-31"))
                .await
                .is_err()
        );
    }
}
