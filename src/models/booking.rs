use crate::domain::PriceBreakdown;
use crate::entities::{BookingStatus, PaymentStatus, booking_entity};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub room_id: String,
    pub guest_email: String,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_guests: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub upsell_ids: Vec<Uuid>,
    pub coupon_code: Option<String>,
    pub stay_reason: Option<String>,
    /// `it` or `en`, used for guest emails
    pub language: Option<String>,
    /// Frontend origin for checkout redirects, defaults to the configured site
    pub origin_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_guests: Option<i32>,
    #[serde(default)]
    pub upsell_ids: Vec<Uuid>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdownResponse {
    pub nights: i64,
    pub room_price: Decimal,
    pub upsells_total: Decimal,
    pub upsell_ids: Vec<Uuid>,
    pub coupon_code: Option<String>,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
}

impl From<PriceBreakdown> for PriceBreakdownResponse {
    fn from(b: PriceBreakdown) -> Self {
        Self {
            nights: b.nights,
            room_price: b.room_price,
            upsells_total: b.upsells_total,
            upsell_ids: b.applied_upsells,
            coupon_code: b.coupon_code,
            discount_amount: b.discount_amount,
            total_price: b.total_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub breakdown: PriceBreakdownResponse,
    /// Why the submitted coupon was not applied
    pub coupon_error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
    /// Absent when nothing is left to pay
    pub checkout_url: Option<String>,
    pub session_id: Option<String>,
    pub status: BookingStatus,
    pub nights: i64,
    pub total_price: Decimal,
    pub breakdown: PriceBreakdownResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub room_id: String,
    pub guest_email: String,
    pub guest_name: String,
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub num_guests: i32,
    pub room_price: Decimal,
    pub upsells_total: Decimal,
    pub upsell_ids: Vec<Uuid>,
    pub coupon_code: Option<String>,
    pub discount_amount: Decimal,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub stripe_session_id: Option<String>,
    pub notes: Option<String>,
    pub stay_reason: Option<String>,
    pub language: String,
    pub confirmation_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<booking_entity::Model> for BookingResponse {
    fn from(b: booking_entity::Model) -> Self {
        let nights = b.nights();
        let upsell_ids = b.applied_upsell_ids();
        Self {
            id: b.id,
            room_id: b.room_id,
            guest_email: b.guest_email,
            guest_name: b.guest_name,
            guest_phone: b.guest_phone,
            check_in: b.check_in,
            check_out: b.check_out,
            nights,
            num_guests: b.num_guests,
            room_price: b.room_price,
            upsells_total: b.upsells_total,
            upsell_ids,
            coupon_code: b.coupon_code,
            discount_amount: b.discount_amount,
            total_price: b.total_price,
            status: b.status,
            payment_status: b.payment_status,
            stripe_session_id: b.stripe_session_id,
            notes: b.notes,
            stay_reason: b.stay_reason,
            language: b.language,
            confirmation_sent_at: b.confirmation_sent_at,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingStatusResponse {
    /// What the payment provider reports: `paid`, `expired` or `open`
    pub payment_status: String,
    pub booking: BookingResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub room_id: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}
