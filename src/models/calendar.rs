use crate::entities::{blocked_date_entity, custom_price_entity};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockDateRequest {
    pub room_id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockDateRangeRequest {
    pub room_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockedDateResponse {
    pub id: Uuid,
    pub room_id: String,
    pub date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<blocked_date_entity::Model> for BlockedDateResponse {
    fn from(m: blocked_date_entity::Model) -> Self {
        Self {
            id: m.id,
            room_id: m.room_id,
            date: m.date,
            reason: m.reason,
            created_at: m.created_at,
        }
    }
}

/// Sets `price` on every date of the inclusive range
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomPriceRequest {
    pub room_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomPriceQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CustomPriceResponse {
    pub id: Uuid,
    pub room_id: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<custom_price_entity::Model> for CustomPriceResponse {
    fn from(m: custom_price_entity::Model) -> Self {
        Self {
            id: m.id,
            room_id: m.room_id,
            date: m.date,
            price: m.price,
            reason: m.reason,
            updated_at: m.updated_at,
        }
    }
}
