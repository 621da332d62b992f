use crate::domain::{
    PriceBreakdown, Stay, UpsellSelection, check_coupon, normalize_coupon_code, room_subtotal,
    select_upsells,
};
use crate::entities::{coupon_entity, custom_price_entity, room_entity, upsell_entity};
use crate::error::{AppError, AppResult};
use crate::models::{QuoteRequest, QuoteResponse};
use crate::services::coupon_service::{find_coupon_by_code, redeem_coupon};
use crate::services::room_service::find_room;
use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;
use uuid::Uuid;

/// Whether pricing a stay consumes a coupon use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponMode {
    Preview,
    Redeem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedStay {
    pub breakdown: PriceBreakdown,
    /// Set when a submitted coupon did not apply
    pub coupon_error: Option<String>,
}

pub fn validate_guests(room: &room_entity::Model, num_guests: i32) -> AppResult<()> {
    if num_guests < 1 || num_guests > room.max_guests {
        return Err(AppError::ValidationError(format!(
            "num_guests must be between 1 and {}",
            room.max_guests
        )));
    }
    Ok(())
}

/// Full price computation for a stay in `room`. Unknown or ineligible
/// upsells and coupons are left out of the total rather than failing.
pub async fn price_stay<C: ConnectionTrait>(
    db: &C,
    room: &room_entity::Model,
    stay: &Stay,
    upsell_ids: &[Uuid],
    coupon_code: Option<&str>,
    today: NaiveDate,
    mode: CouponMode,
) -> AppResult<PricedStay> {
    let overrides: HashMap<NaiveDate, _> = custom_price_entity::Entity::find()
        .filter(custom_price_entity::Column::RoomId.eq(&room.id))
        .filter(custom_price_entity::Column::Date.gte(stay.check_in()))
        .filter(custom_price_entity::Column::Date.lt(stay.check_out()))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.date, c.price))
        .collect();
    let room_price = room_subtotal(stay, room.price_per_night, &overrides);

    let upsells = if upsell_ids.is_empty() {
        UpsellSelection::default()
    } else {
        let catalog = upsell_entity::Entity::find()
            .filter(upsell_entity::Column::Id.is_in(upsell_ids.iter().copied()))
            .all(db)
            .await?;
        select_upsells(upsell_ids, &catalog, stay.nights())
    };

    let (coupon, coupon_error) = match coupon_code
        .map(normalize_coupon_code)
        .filter(|c| !c.is_empty())
    {
        None => (None, None),
        Some(code) => resolve_coupon(db, &code, stay.nights(), today, mode).await?,
    };

    Ok(PricedStay {
        breakdown: PriceBreakdown::compose(stay.nights(), room_price, upsells, coupon.as_ref()),
        coupon_error,
    })
}

async fn resolve_coupon<C: ConnectionTrait>(
    db: &C,
    code: &str,
    nights: i64,
    today: NaiveDate,
    mode: CouponMode,
) -> AppResult<(Option<coupon_entity::Model>, Option<String>)> {
    let Some(coupon) = find_coupon_by_code(db, code).await? else {
        return Ok((None, Some(format!("Coupon {code} not found"))));
    };
    if let Err(rejection) = check_coupon(&coupon, nights, today) {
        log::info!("Coupon {code} not applied: {rejection}");
        return Ok((None, Some(rejection.to_string())));
    }
    if mode == CouponMode::Redeem && !redeem_coupon(db, coupon.id).await? {
        log::warn!("Coupon {code} lost its last use to a concurrent booking");
        return Ok((None, Some("Coupon usage limit reached".to_string())));
    }
    Ok((Some(coupon), None))
}

#[derive(Clone)]
pub struct PricingService {
    pool: DatabaseConnection,
}

impl PricingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Price preview for the booking form. Never consumes a coupon use.
    pub async fn quote(&self, request: &QuoteRequest) -> AppResult<QuoteResponse> {
        let stay = Stay::new(request.check_in, request.check_out)?;
        let room = find_room(&self.pool, &request.room_id).await?;
        if let Some(num_guests) = request.num_guests {
            validate_guests(&room, num_guests)?;
        }

        let priced = price_stay(
            &self.pool,
            &room,
            &stay,
            &request.upsell_ids,
            request.coupon_code.as_deref(),
            Utc::now().date_naive(),
            CouponMode::Preview,
        )
        .await?;

        Ok(QuoteResponse {
            breakdown: priced.breakdown.into(),
            coupon_error: priced.coupon_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DiscountType;
    use crate::services::fixtures::{coupon, d, exec, room, upsell};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn price_override(room_id: &str, date: &str, price: Decimal) -> custom_price_entity::Model {
        custom_price_entity::Model {
            id: Uuid::new_v4(),
            room_id: room_id.to_string(),
            date: d(date),
            price,
            reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_custom_price_adds_to_default_nights() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![price_override("nonna", "2026-06-01", dec!(120))]])
            .into_connection();
        let nonna = room("nonna", dec!(80));
        let stay = Stay::new(d("2026-05-31"), d("2026-06-02")).unwrap();

        let priced = price_stay(&db, &nonna, &stay, &[], None, d("2026-05-01"), CouponMode::Preview)
            .await
            .unwrap();
        assert_eq!(priced.breakdown.room_price, dec!(200));
        assert_eq!(priced.breakdown.total_price, dec!(200));
    }

    #[tokio::test]
    async fn test_long_stay_upsell_dropped_for_short_stay() {
        let cleaning = upsell("pulizia-extra", dec!(40), 7);
        let dinner = upsell("cena-tipica", dec!(45), 0);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_query_results([vec![cleaning.clone(), dinner.clone()]])
            .into_connection();
        let pozzo = room("pozzo", dec!(80));
        let stay = Stay::new(d("2026-07-01"), d("2026-07-04")).unwrap();

        let priced = price_stay(
            &db,
            &pozzo,
            &stay,
            &[cleaning.id, dinner.id],
            None,
            d("2026-06-01"),
            CouponMode::Preview,
        )
        .await
        .unwrap();
        assert_eq!(priced.breakdown.applied_upsells, vec![dinner.id]);
        assert_eq!(priced.breakdown.upsells_total, dec!(45));
        assert_eq!(priced.breakdown.total_price, dec!(285));
    }

    #[tokio::test]
    async fn test_preview_does_not_consume_coupon() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_query_results([vec![coupon("ESTATE10", DiscountType::Percentage, dec!(10))]])
            .into_connection();
        let nonna = room("nonna", dec!(100));
        let stay = Stay::new(d("2026-07-01"), d("2026-07-03")).unwrap();

        // no exec result is queued: an UPDATE here would fail the test
        let priced = price_stay(
            &db,
            &nonna,
            &stay,
            &[],
            Some("estate10"),
            d("2026-06-01"),
            CouponMode::Preview,
        )
        .await
        .unwrap();
        assert_eq!(priced.breakdown.discount_amount, dec!(20));
        assert_eq!(priced.breakdown.coupon_code.as_deref(), Some("ESTATE10"));
    }

    #[tokio::test]
    async fn test_redeem_falls_back_when_exhausted_concurrently() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_query_results([vec![coupon("ULTIMO", DiscountType::Fixed, dec!(50))]])
            .append_exec_results([exec(0)])
            .into_connection();
        let nonna = room("nonna", dec!(100));
        let stay = Stay::new(d("2026-07-01"), d("2026-07-03")).unwrap();

        let priced = price_stay(
            &db,
            &nonna,
            &stay,
            &[],
            Some("ultimo"),
            d("2026-06-01"),
            CouponMode::Redeem,
        )
        .await
        .unwrap();
        assert_eq!(priced.breakdown.discount_amount, Decimal::ZERO);
        assert_eq!(priced.breakdown.total_price, dec!(200));
        assert!(priced.coupon_error.is_some());
    }

    #[tokio::test]
    async fn test_unknown_coupon_is_reported_not_fatal() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_query_results([Vec::<coupon_entity::Model>::new()])
            .into_connection();
        let nonna = room("nonna", dec!(80));
        let stay = Stay::new(d("2026-07-01"), d("2026-07-02")).unwrap();

        let priced = price_stay(&db, &nonna, &stay, &[], Some("boh"), d("2026-06-01"), CouponMode::Preview)
            .await
            .unwrap();
        assert_eq!(priced.breakdown.total_price, dec!(80));
        assert_eq!(priced.coupon_error.as_deref(), Some("Coupon BOH not found"));
    }

    #[tokio::test]
    async fn test_quote_rejects_reversed_dates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = PricingService::new(db);
        let request = QuoteRequest {
            room_id: "nonna".to_string(),
            check_in: d("2026-07-05"),
            check_out: d("2026-07-01"),
            num_guests: None,
            upsell_ids: vec![],
            coupon_code: None,
        };
        assert!(matches!(
            service.quote(&request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_rejects_too_many_guests() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("nonna", dec!(80))]])
            .into_connection();
        let service = PricingService::new(db);
        let request = QuoteRequest {
            room_id: "nonna".to_string(),
            check_in: d("2026-07-01"),
            check_out: d("2026-07-03"),
            num_guests: Some(4),
            upsell_ids: vec![],
            coupon_code: None,
        };
        assert!(matches!(
            service.quote(&request).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
