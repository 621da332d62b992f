use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub room_id: String,
    pub default_price: Decimal,
    /// Sorted nights that cannot be booked
    pub unavailable_dates: Vec<NaiveDate>,
    /// Per-date price overrides inside the window
    #[schema(value_type = Object)]
    pub custom_prices: BTreeMap<NaiveDate, Decimal>,
}
