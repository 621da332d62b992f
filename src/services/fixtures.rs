//! Model builders and collaborator doubles shared by the service tests.

use crate::domain::ObservedPayment;
use crate::entities::{
    BookingStatus, DiscountType, PaymentStatus, booking_entity, coupon_entity, room_entity,
    upsell_entity,
};
use crate::error::{AppError, AppResult};
use crate::external::{
    CheckoutRequest, CheckoutSessionInfo, EmailMessage, Mailer, PaymentGateway, SessionSnapshot,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::MockExecResult;
use serde_json::json;
use std::sync::Mutex;
use uuid::Uuid;

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

pub fn room(id: &str, price: Decimal) -> room_entity::Model {
    room_entity::Model {
        id: id.to_string(),
        slug: format!("stanza-{id}"),
        name_it: format!("Stanza {id}"),
        name_en: format!("Room {id}"),
        description_it: String::new(),
        description_en: String::new(),
        price_per_night: price,
        max_guests: 3,
        images: json!([
            {"id": "b", "url": "https://img/b.jpg", "alt_it": "", "alt_en": "", "order": 1},
            {"id": "a", "url": "https://img/a.jpg", "alt_it": "", "alt_en": "", "order": 0}
        ]),
        amenities: json!(["wifi", "ac"]),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn booking(room_id: &str, check_in: &str, check_out: &str) -> booking_entity::Model {
    booking_entity::Model {
        id: Uuid::new_v4(),
        room_id: room_id.to_string(),
        guest_email: "ospite@example.it".to_string(),
        guest_name: "Giulia Bianchi".to_string(),
        guest_phone: None,
        check_in: d(check_in),
        check_out: d(check_out),
        num_guests: 2,
        room_price: Decimal::from(160),
        upsells_total: Decimal::ZERO,
        upsell_ids: json!([]),
        coupon_code: None,
        discount_amount: Decimal::ZERO,
        total_price: Decimal::from(160),
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        stripe_session_id: Some("cs_test_1".to_string()),
        notes: None,
        stay_reason: None,
        language: "it".to_string(),
        confirmation_sent_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn upsell(slug: &str, price: Decimal, min_nights: i32) -> upsell_entity::Model {
    upsell_entity::Model {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title_it: slug.to_string(),
        title_en: slug.to_string(),
        description_it: String::new(),
        description_en: String::new(),
        price,
        min_nights,
        is_active: true,
        order: 0,
        icon: "gift".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn coupon(code: &str, discount_type: DiscountType, value: Decimal) -> coupon_entity::Model {
    coupon_entity::Model {
        id: Uuid::new_v4(),
        code: code.to_string(),
        discount_type,
        discount_value: value,
        min_nights: 1,
        max_uses: None,
        uses_count: 0,
        valid_from: None,
        valid_until: None,
        is_active: true,
        description_it: None,
        description_en: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Records every message; fails when `fail` is set.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if self.fail {
            return Err(AppError::ExternalApiError("smtp down".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Gateway double that answers every lookup with a fixed outcome.
pub struct FakeGateway {
    pub observed: ObservedPayment,
    pub created: Mutex<Vec<CheckoutRequest>>,
}

impl FakeGateway {
    pub fn new(observed: ObservedPayment) -> Self {
        Self {
            observed,
            created: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> AppResult<CheckoutSessionInfo> {
        self.created.lock().unwrap().push(request.clone());
        Ok(CheckoutSessionInfo {
            session_id: "cs_test_1".to_string(),
            url: Some("https://checkout.stripe.com/c/pay/cs_test_1".to_string()),
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<SessionSnapshot> {
        Ok(SessionSnapshot {
            session_id: session_id.to_string(),
            observed: self.observed,
            amount_total: Some(16000),
            booking_id: None,
        })
    }

    fn parse_webhook(
        &self,
        _payload: &str,
        signature: &str,
    ) -> AppResult<Option<SessionSnapshot>> {
        if signature != "valid" {
            return Err(AppError::AuthError("Invalid webhook signature".to_string()));
        }
        Ok(Some(SessionSnapshot {
            session_id: "cs_test_1".to_string(),
            observed: self.observed,
            amount_total: Some(16000),
            booking_id: None,
        }))
    }
}
