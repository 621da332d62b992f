//! Admin calendar tools (blocked dates, per-date prices) and the iCal feed.

use crate::domain::dates_inclusive;
use crate::entities::{BookingStatus, blocked_date_entity, booking_entity, custom_price_entity};
use crate::error::{AppError, AppResult};
use crate::models::{
    BlockDateRangeRequest, BlockDateRequest, BlockedDateResponse, BulkResult, CustomPriceQuery,
    CustomPriceRequest, CustomPriceResponse,
};
use crate::services::room_service::find_room;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

/// Upper bound on dates touched by one range operation
const MAX_RANGE_DAYS: usize = 366;

#[derive(Clone)]
pub struct CalendarService {
    pool: DatabaseConnection,
    site_name: String,
}

fn checked_range(start: NaiveDate, end: NaiveDate) -> AppResult<Vec<NaiveDate>> {
    if start > end {
        return Err(AppError::ValidationError(
            "start_date must not be after end_date".to_string(),
        ));
    }
    let dates = dates_inclusive(start, end);
    if dates.len() > MAX_RANGE_DAYS {
        return Err(AppError::ValidationError(format!(
            "A range can cover at most {MAX_RANGE_DAYS} days"
        )));
    }
    Ok(dates)
}

fn blocked_row(room_id: &str, date: NaiveDate, reason: Option<String>) -> blocked_date_entity::ActiveModel {
    blocked_date_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        room_id: Set(room_id.to_string()),
        date: Set(date),
        reason: Set(reason),
        created_at: Set(Utc::now()),
    }
}

fn ignore_existing_block() -> OnConflict {
    OnConflict::columns([
        blocked_date_entity::Column::RoomId,
        blocked_date_entity::Column::Date,
    ])
    .do_nothing()
    .to_owned()
}

impl CalendarService {
    pub fn new(pool: DatabaseConnection, site_name: String) -> Self {
        Self { pool, site_name }
    }

    pub async fn list_blocked_dates(&self, room_id: &str) -> AppResult<Vec<BlockedDateResponse>> {
        let rows = blocked_date_entity::Entity::find()
            .filter(blocked_date_entity::Column::RoomId.eq(room_id))
            .order_by_asc(blocked_date_entity::Column::Date)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Blocking an already blocked date is a no-op that returns the existing row.
    pub async fn block_date(&self, request: BlockDateRequest) -> AppResult<BlockedDateResponse> {
        find_room(&self.pool, &request.room_id).await?;

        blocked_date_entity::Entity::insert(blocked_row(
            &request.room_id,
            request.date,
            request.reason,
        ))
        .on_conflict(ignore_existing_block())
        .exec_without_returning(&self.pool)
        .await?;

        let row = blocked_date_entity::Entity::find()
            .filter(blocked_date_entity::Column::RoomId.eq(&request.room_id))
            .filter(blocked_date_entity::Column::Date.eq(request.date))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Blocked date vanished after insert".into()))?;
        Ok(row.into())
    }

    pub async fn block_range(&self, request: BlockDateRangeRequest) -> AppResult<BulkResult> {
        let dates = checked_range(request.start_date, request.end_date)?;
        find_room(&self.pool, &request.room_id).await?;

        let rows: Vec<_> = dates
            .iter()
            .map(|date| blocked_row(&request.room_id, *date, request.reason.clone()))
            .collect();
        let inserted = blocked_date_entity::Entity::insert_many(rows)
            .on_conflict(ignore_existing_block())
            .exec_without_returning(&self.pool)
            .await?;

        log::info!(
            "Blocked {inserted} new dates for {} ({}..={})",
            request.room_id,
            request.start_date,
            request.end_date
        );
        Ok(BulkResult { count: inserted })
    }

    pub async fn unblock_date(&self, room_id: &str, date: NaiveDate) -> AppResult<()> {
        let result = blocked_date_entity::Entity::delete_many()
            .filter(blocked_date_entity::Column::RoomId.eq(room_id))
            .filter(blocked_date_entity::Column::Date.eq(date))
            .exec(&self.pool)
            .await?;
        log::info!("Unblocked {room_id} {date} ({} rows)", result.rows_affected);
        Ok(())
    }

    /// Upserts one price row per date of the inclusive range.
    pub async fn set_custom_prices(&self, request: CustomPriceRequest) -> AppResult<BulkResult> {
        if request.price <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "price must be greater than zero".to_string(),
            ));
        }
        let dates = checked_range(request.start_date, request.end_date)?;
        find_room(&self.pool, &request.room_id).await?;

        let now = Utc::now();
        let rows: Vec<_> = dates
            .iter()
            .map(|date| custom_price_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                room_id: Set(request.room_id.clone()),
                date: Set(*date),
                price: Set(request.price),
                reason: Set(request.reason.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .collect();

        custom_price_entity::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    custom_price_entity::Column::RoomId,
                    custom_price_entity::Column::Date,
                ])
                .update_columns([
                    custom_price_entity::Column::Price,
                    custom_price_entity::Column::Reason,
                    custom_price_entity::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;

        log::info!(
            "Set price {} on {} dates for {}",
            request.price,
            dates.len(),
            request.room_id
        );
        Ok(BulkResult {
            count: dates.len() as u64,
        })
    }

    pub async fn list_custom_prices(
        &self,
        room_id: &str,
        query: &CustomPriceQuery,
    ) -> AppResult<Vec<CustomPriceResponse>> {
        let mut select = custom_price_entity::Entity::find()
            .filter(custom_price_entity::Column::RoomId.eq(room_id));
        if let Some(start) = query.start_date {
            select = select.filter(custom_price_entity::Column::Date.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(custom_price_entity::Column::Date.lte(end));
        }
        let rows = select
            .order_by_asc(custom_price_entity::Column::Date)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn delete_custom_price(&self, room_id: &str, date: NaiveDate) -> AppResult<()> {
        let result = custom_price_entity::Entity::delete_many()
            .filter(custom_price_entity::Column::RoomId.eq(room_id))
            .filter(custom_price_entity::Column::Date.eq(date))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "No custom price for {room_id} on {date}"
            )));
        }
        Ok(())
    }

    /// `text/calendar` feed of upcoming occupied nights and blocked dates.
    pub async fn export_ics(&self, room_id: &str) -> AppResult<String> {
        let room = find_room(&self.pool, room_id).await?;
        let today = Utc::now().date_naive();

        let bookings = booking_entity::Entity::find()
            .filter(booking_entity::Column::RoomId.eq(&room.id))
            .filter(booking_entity::Column::Status.is_in(BookingStatus::OCCUPYING))
            .filter(booking_entity::Column::CheckOut.gte(today))
            .order_by_asc(booking_entity::Column::CheckIn)
            .all(&self.pool)
            .await?;
        let blocked = blocked_date_entity::Entity::find()
            .filter(blocked_date_entity::Column::RoomId.eq(&room.id))
            .filter(blocked_date_entity::Column::Date.gte(today))
            .order_by_asc(blocked_date_entity::Column::Date)
            .all(&self.pool)
            .await?;

        let mut events: Vec<IcsEvent> = bookings
            .iter()
            .map(|b| IcsEvent {
                uid: format!("booking-{}", b.id),
                start: b.check_in,
                end: b.check_out,
                summary: "Prenotato / Booked".to_string(),
            })
            .collect();
        events.extend(blocked.iter().map(|b| IcsEvent {
            uid: format!("blocked-{}", b.id),
            start: b.date,
            end: b.date + Duration::days(1),
            summary: "Non disponibile / Unavailable".to_string(),
        }));

        let name = format!("{} - {}", self.site_name, room.name_it);
        Ok(render_ics(&name, &events, Utc::now()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcsEvent {
    pub uid: String,
    pub start: NaiveDate,
    /// Exclusive, as in the iCalendar all-day convention
    pub end: NaiveDate,
    pub summary: String,
}

/// Long names are folded onto continuation lines by the serializer.
pub fn render_ics(calendar_name: &str, events: &[IcsEvent], stamp: DateTime<Utc>) -> String {
    let mut calendar = Calendar::new();
    calendar
        .append_property(Property::new("METHOD", "PUBLISH"))
        .name(calendar_name);
    for event in events {
        calendar.push(
            Event::new()
                .uid(&format!("{}@desideridipuglia", event.uid))
                .timestamp(stamp)
                .starts(event.start)
                .ends(event.end)
                .summary(&event.summary)
                .done(),
        );
    }
    calendar.to_string()
}
