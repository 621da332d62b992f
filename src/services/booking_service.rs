use crate::domain::{Stay, find_conflict};
use crate::entities::{
    BookingStatus, PaymentStatus, TransactionStatus, blocked_date_entity, booking_entity,
    payment_transaction_entity, room_entity,
};
use crate::error::{AppError, AppResult};
use crate::external::{CheckoutRequest, CheckoutSessionInfo};
use crate::models::{
    BookingListQuery, BookingResponse, BookingStatusResponse, CreateBookingRequest,
    CreateBookingResponse, PaginatedResponse, PaginationParams, is_known_stay_reason,
};
use crate::services::payment_service::PaymentService;
use crate::services::pricing_service::{CouponMode, price_stay, validate_guests};
use crate::services::settings_service::load_settings;
use crate::utils::{normalize_language, require_non_empty, validate_email};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct BookingService {
    pool: DatabaseConnection,
    payments: PaymentService,
    public_url: String,
    currency: String,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated guest input, ready to be priced and stored.
struct GuestDetails {
    name: String,
    email: String,
    phone: Option<String>,
    notes: Option<String>,
    stay_reason: Option<String>,
    language: String,
}

fn guest_details(request: &CreateBookingRequest) -> AppResult<GuestDetails> {
    require_non_empty("guest_name", &request.guest_name)?;
    let email = request.guest_email.trim().to_lowercase();
    validate_email(&email)?;

    let stay_reason = trimmed(request.stay_reason.clone());
    if let Some(reason) = &stay_reason
        && !is_known_stay_reason(reason)
    {
        return Err(AppError::ValidationError(format!(
            "Unknown stay reason: {reason}"
        )));
    }

    Ok(GuestDetails {
        name: request.guest_name.trim().to_string(),
        email,
        phone: trimmed(request.guest_phone.clone()),
        notes: trimmed(request.notes.clone()),
        stay_reason,
        language: normalize_language(request.language.as_deref()),
    })
}

/// Checkout redirects go back to the page the guest booked from, or to the
/// configured site when none was given.
fn redirect_origin(requested: Option<&str>, public_url: &str) -> String {
    requested
        .map(str::trim)
        .filter(|o| o.starts_with("https://") || o.starts_with("http://"))
        .unwrap_or(public_url)
        .trim_end_matches('/')
        .to_string()
}

fn booking_row(booking: &booking_entity::Model) -> booking_entity::ActiveModel {
    booking_entity::ActiveModel {
        id: Set(booking.id),
        room_id: Set(booking.room_id.clone()),
        guest_email: Set(booking.guest_email.clone()),
        guest_name: Set(booking.guest_name.clone()),
        guest_phone: Set(booking.guest_phone.clone()),
        check_in: Set(booking.check_in),
        check_out: Set(booking.check_out),
        num_guests: Set(booking.num_guests),
        room_price: Set(booking.room_price),
        upsells_total: Set(booking.upsells_total),
        upsell_ids: Set(booking.upsell_ids.clone()),
        coupon_code: Set(booking.coupon_code.clone()),
        discount_amount: Set(booking.discount_amount),
        total_price: Set(booking.total_price),
        status: Set(booking.status),
        payment_status: Set(booking.payment_status),
        stripe_session_id: Set(booking.stripe_session_id.clone()),
        notes: Set(booking.notes.clone()),
        stay_reason: Set(booking.stay_reason.clone()),
        language: Set(booking.language.clone()),
        confirmation_sent_at: Set(booking.confirmation_sent_at),
        created_at: Set(booking.created_at),
        updated_at: Set(booking.updated_at),
    }
}

impl BookingService {
    pub fn new(
        pool: DatabaseConnection,
        payments: PaymentService,
        public_url: String,
        currency: String,
    ) -> Self {
        Self {
            pool,
            payments,
            public_url,
            currency,
        }
    }

    /// Prices the stay, reserves the dates and opens a checkout session.
    ///
    /// Everything from the room lock to the ledger row runs in one
    /// transaction, so a failed checkout leaves no booking behind and hands
    /// any consumed coupon use back.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> AppResult<CreateBookingResponse> {
        let guest = guest_details(&request)?;
        let stay = Stay::new(request.check_in, request.check_out)?;
        let today = Utc::now().date_naive();
        if stay.check_in() < today {
            return Err(AppError::ValidationError(
                "Check-in cannot be in the past".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let settings = load_settings(&txn).await?;
        if stay.nights() < i64::from(settings.min_nights) {
            return Err(AppError::ValidationError(format!(
                "Minimum stay is {} nights",
                settings.min_nights
            )));
        }

        let room = room_entity::Entity::find_by_id(request.room_id.clone())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", request.room_id)))?;
        validate_guests(&room, request.num_guests)?;

        let overlapping = booking_entity::Entity::find()
            .filter(booking_entity::Column::RoomId.eq(&room.id))
            .filter(booking_entity::Column::Status.is_in(BookingStatus::OCCUPYING))
            .filter(booking_entity::Column::CheckIn.lt(stay.check_out()))
            .filter(booking_entity::Column::CheckOut.gt(stay.check_in()))
            .all(&txn)
            .await?;
        if let Some(existing) = find_conflict(&stay, &overlapping) {
            log::info!(
                "Rejected booking for {} {}..{}: overlaps booking {}",
                room.id,
                stay.check_in(),
                stay.check_out(),
                existing.id
            );
            return Err(AppError::Conflict(
                "The room is not available for the selected dates".to_string(),
            ));
        }

        let blocked = blocked_date_entity::Entity::find()
            .filter(blocked_date_entity::Column::RoomId.eq(&room.id))
            .filter(blocked_date_entity::Column::Date.gte(stay.check_in()))
            .filter(blocked_date_entity::Column::Date.lt(stay.check_out()))
            .all(&txn)
            .await?;
        if !blocked.is_empty() {
            return Err(AppError::Conflict(
                "The room is not available for the selected dates".to_string(),
            ));
        }

        let priced = price_stay(
            &txn,
            &room,
            &stay,
            &request.upsell_ids,
            request.coupon_code.as_deref(),
            today,
            CouponMode::Redeem,
        )
        .await?;
        let breakdown = priced.breakdown;

        let booking_id = Uuid::new_v4();
        let checkout = if breakdown.total_price > Decimal::ZERO {
            let origin = redirect_origin(request.origin_url.as_deref(), &self.public_url);
            let room_name = if guest.language == "en" {
                &room.name_en
            } else {
                &room.name_it
            };
            let session = self
                .payments
                .gateway()
                .create_checkout_session(&CheckoutRequest {
                    booking_id,
                    room_id: room.id.clone(),
                    customer_email: guest.email.clone(),
                    description: format!(
                        "{room_name}, {} - {}",
                        stay.check_in().format("%d/%m/%Y"),
                        stay.check_out().format("%d/%m/%Y")
                    ),
                    amount: breakdown.total_price,
                    success_url: format!(
                        "{origin}/booking/success?session_id={{CHECKOUT_SESSION_ID}}"
                    ),
                    cancel_url: format!("{origin}/booking/cancel"),
                })
                .await?;
            Some(session)
        } else {
            None
        };

        let now = Utc::now();
        let (status, payment_status) = match checkout {
            Some(_) => (BookingStatus::Pending, PaymentStatus::Pending),
            None => (BookingStatus::Confirmed, PaymentStatus::Paid),
        };
        let mut booking = booking_entity::Model {
            id: booking_id,
            room_id: room.id.clone(),
            guest_email: guest.email,
            guest_name: guest.name,
            guest_phone: guest.phone,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            num_guests: request.num_guests,
            room_price: breakdown.room_price,
            upsells_total: breakdown.upsells_total,
            upsell_ids: json!(breakdown.applied_upsells),
            coupon_code: breakdown.coupon_code.clone(),
            discount_amount: breakdown.discount_amount,
            total_price: breakdown.total_price,
            status,
            payment_status,
            stripe_session_id: checkout.as_ref().map(|c| c.session_id.clone()),
            notes: guest.notes,
            stay_reason: guest.stay_reason,
            language: guest.language,
            confirmation_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        booking_entity::Entity::insert(booking_row(&booking))
            .exec_without_returning(&txn)
            .await?;

        if let Some(CheckoutSessionInfo { session_id, .. }) = &checkout {
            payment_transaction_entity::Entity::insert(payment_transaction_entity::ActiveModel {
                id: Set(Uuid::new_v4()),
                booking_id: Set(booking.id),
                session_id: Set(session_id.clone()),
                amount: Set(booking.total_price),
                currency: Set(self.currency.to_lowercase()),
                status: Set(TransactionStatus::Initiated),
                payment_status: Set("unpaid".to_string()),
                metadata: Set(Some(json!({
                    "room_id": booking.room_id,
                    "check_in": booking.check_in,
                    "check_out": booking.check_out,
                    "nights": stay.nights(),
                    "coupon_code": booking.coupon_code,
                }))),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        log::info!(
            "Booking {} created for room {} {}..{} total {}",
            booking.id,
            booking.room_id,
            booking.check_in,
            booking.check_out,
            booking.total_price
        );

        if checkout.is_none() {
            self.payments.deliver_confirmation(&mut booking).await?;
        }

        Ok(CreateBookingResponse {
            booking_id: booking.id,
            checkout_url: checkout.as_ref().and_then(|c| c.url.clone()),
            session_id: checkout.map(|c| c.session_id),
            status: booking.status,
            nights: stay.nights(),
            total_price: booking.total_price,
            breakdown: breakdown.into(),
        })
    }

    /// Polled by the checkout success page.
    pub async fn check_status(&self, session_id: &str) -> AppResult<BookingStatusResponse> {
        let (observed, booking) = self.payments.check_session(session_id).await?;
        Ok(BookingStatusResponse {
            payment_status: observed.as_str().to_string(),
            booking: booking.into(),
        })
    }

    pub async fn list_bookings(
        &self,
        query: BookingListQuery,
    ) -> AppResult<PaginatedResponse<BookingResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let page = params.get_page();
        let per_page = params.get_per_page();

        let mut select = booking_entity::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(booking_entity::Column::Status.eq(status));
        }
        if let Some(room_id) = query.room_id {
            select = select.filter(booking_entity::Column::RoomId.eq(room_id));
        }
        let paginator = select
            .order_by_desc(booking_entity::Column::CreatedAt)
            .paginate(&self.pool, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(Into::into).collect(),
            page,
            per_page,
            total,
        ))
    }

    async fn find_booking(&self, id: Uuid) -> AppResult<booking_entity::Model> {
        booking_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {id} not found")))
    }

    pub async fn get_booking(&self, id: Uuid) -> AppResult<BookingResponse> {
        Ok(self.find_booking(id).await?.into())
    }

    /// Admin override. Any status may be set.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> AppResult<BookingResponse> {
        let mut booking = self.find_booking(id).await?;
        if booking.status == status {
            return Ok(booking.into());
        }
        let now = Utc::now();
        booking_entity::Entity::update_many()
            .col_expr(booking_entity::Column::Status, Expr::value(status.to_value()))
            .col_expr(booking_entity::Column::UpdatedAt, Expr::value(now))
            .filter(booking_entity::Column::Id.eq(id))
            .exec(&self.pool)
            .await?;
        log::info!("Booking {id} status {} -> {status} by admin", booking.status);
        booking.status = status;
        booking.updated_at = now;
        Ok(booking.into())
    }

    pub async fn resend_confirmation(&self, id: Uuid) -> AppResult<BookingResponse> {
        let mut booking = self.find_booking(id).await?;
        if !matches!(
            booking.status,
            BookingStatus::Confirmed | BookingStatus::Completed
        ) {
            return Err(AppError::ValidationError(
                "Only confirmed bookings have a confirmation to resend".to_string(),
            ));
        }
        let before = booking.confirmation_sent_at;
        self.payments.deliver_confirmation(&mut booking).await?;
        if booking.confirmation_sent_at == before {
            return Err(AppError::ExternalApiError(
                "Confirmation email could not be sent".to_string(),
            ));
        }
        Ok(booking.into())
    }

    /// Marks confirmed stays whose check-out day has arrived as completed.
    pub async fn complete_past_stays(&self, today: NaiveDate) -> AppResult<u64> {
        let result = booking_entity::Entity::update_many()
            .col_expr(
                booking_entity::Column::Status,
                Expr::value(BookingStatus::Completed.to_value()),
            )
            .col_expr(booking_entity::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(booking_entity::Column::Status.eq(BookingStatus::Confirmed))
            .filter(booking_entity::Column::CheckOut.lte(today))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ObservedPayment;
    use crate::entities::{custom_price_entity, settings_entity};
    use crate::services::fixtures::{FakeGateway, RecordingMailer, booking, exec, room};
    use crate::services::notification_service::NotificationService;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(
        db: DatabaseConnection,
        gateway: Arc<FakeGateway>,
        mailer: Arc<RecordingMailer>,
    ) -> BookingService {
        let notifications = NotificationService::new(
            db.clone(),
            mailer,
            "Desideri di Puglia".to_string(),
            None,
        );
        let payments = PaymentService::new(db.clone(), gateway, notifications);
        BookingService::new(
            db,
            payments,
            "https://desideridipuglia.it/".to_string(),
            "eur".to_string(),
        )
    }

    fn request(room_id: &str, check_in: NaiveDate, nights: i64) -> CreateBookingRequest {
        CreateBookingRequest {
            room_id: room_id.to_string(),
            guest_email: " Ospite@Example.it ".to_string(),
            guest_name: "Giulia Bianchi".to_string(),
            guest_phone: None,
            check_in,
            check_out: check_in + Duration::days(nights),
            num_guests: 2,
            notes: None,
            upsell_ids: Vec::new(),
            coupon_code: None,
            stay_reason: Some("romantico".to_string()),
            language: Some("en".to_string()),
            origin_url: None,
        }
    }

    fn future(days: i64) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(days)
    }

    #[tokio::test]
    async fn test_overlapping_stay_is_rejected() {
        let check_in = future(30);
        let existing = booking(
            "pozzo",
            &(check_in - Duration::days(2)).to_string(),
            &(check_in + Duration::days(1)).to_string(),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings_entity::Model>::new()])
            .append_query_results([vec![room("pozzo", dec!(80))]])
            .append_query_results([vec![existing]])
            .into_connection();
        let gateway = Arc::new(FakeGateway::new(ObservedPayment::Open));
        let service = service(db, gateway.clone(), Arc::new(RecordingMailer::default()));

        let err = service
            .create_booking(request("pozzo", check_in, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(gateway.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_booking_opens_checkout_for_total() {
        let check_in = future(40);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings_entity::Model>::new()])
            .append_query_results([vec![room("nonna", dec!(80))]])
            .append_query_results([Vec::<booking_entity::Model>::new()])
            .append_query_results([Vec::<blocked_date_entity::Model>::new()])
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_exec_results([exec(1), exec(1)])
            .into_connection();
        let gateway = Arc::new(FakeGateway::new(ObservedPayment::Open));
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(db, gateway.clone(), mailer.clone());

        let response = service
            .create_booking(request("nonna", check_in, 2))
            .await
            .unwrap();
        assert_eq!(response.status, BookingStatus::Pending);
        assert_eq!(response.nights, 2);
        assert_eq!(response.total_price, dec!(160));
        assert_eq!(response.session_id.as_deref(), Some("cs_test_1"));

        let created = gateway.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].amount, dec!(160));
        assert_eq!(created[0].customer_email, "ospite@example.it");
        assert_eq!(
            created[0].success_url,
            "https://desideridipuglia.it/booking/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert!(created[0].description.starts_with("Room nonna"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_back_to_back_stay_is_accepted() {
        let check_in = future(30);
        // previous guest leaves the morning this stay starts
        let previous = booking(
            "pozzo",
            &(check_in - Duration::days(4)).to_string(),
            &check_in.to_string(),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings_entity::Model>::new()])
            .append_query_results([vec![room("pozzo", dec!(80))]])
            .append_query_results([vec![previous]])
            .append_query_results([Vec::<blocked_date_entity::Model>::new()])
            .append_query_results([Vec::<custom_price_entity::Model>::new()])
            .append_exec_results([exec(1), exec(1)])
            .into_connection();
        let gateway = Arc::new(FakeGateway::new(ObservedPayment::Open));
        let service = service(db, gateway.clone(), Arc::new(RecordingMailer::default()));

        let response = service
            .create_booking(request("pozzo", check_in, 1))
            .await
            .unwrap();
        assert_eq!(response.status, BookingStatus::Pending);
        assert_eq!(response.nights, 1);
        assert_eq!(gateway.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blocked_night_is_a_conflict() {
        let check_in = future(10);
        let block = blocked_date_entity::Model {
            id: Uuid::new_v4(),
            room_id: "nonna".to_string(),
            date: check_in,
            reason: Some("manutenzione".to_string()),
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings_entity::Model>::new()])
            .append_query_results([vec![room("nonna", dec!(80))]])
            .append_query_results([Vec::<booking_entity::Model>::new()])
            .append_query_results([vec![block]])
            .into_connection();
        let service = service(
            db,
            Arc::new(FakeGateway::new(ObservedPayment::Open)),
            Arc::new(RecordingMailer::default()),
        );
        let err = service
            .create_booking(request("nonna", check_in, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_input_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(
            db,
            Arc::new(FakeGateway::new(ObservedPayment::Open)),
            Arc::new(RecordingMailer::default()),
        );

        let mut bad_email = request("nonna", future(5), 2);
        bad_email.guest_email = "not-an-email".to_string();
        assert!(matches!(
            service.create_booking(bad_email).await,
            Err(AppError::ValidationError(_))
        ));

        let mut reversed = request("nonna", future(5), 2);
        reversed.check_out = reversed.check_in;
        assert!(matches!(
            service.create_booking(reversed).await,
            Err(AppError::ValidationError(_))
        ));

        let mut reason = request("nonna", future(5), 2);
        reason.stay_reason = Some("conquista".to_string());
        assert!(matches!(
            service.create_booking(reason).await,
            Err(AppError::ValidationError(_))
        ));

        let past = request("nonna", future(-3), 2);
        assert!(matches!(
            service.create_booking(past).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_resend_requires_confirmed_booking() {
        let pending = booking("nonna", "2026-07-01", "2026-07-03");
        let id = pending.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending]])
            .into_connection();
        let service = service(
            db,
            Arc::new(FakeGateway::new(ObservedPayment::Open)),
            Arc::new(RecordingMailer::default()),
        );
        assert!(matches!(
            service.resend_confirmation(id).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_past_stays_reports_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(3)])
            .into_connection();
        let service = service(
            db,
            Arc::new(FakeGateway::new(ObservedPayment::Open)),
            Arc::new(RecordingMailer::default()),
        );
        assert_eq!(service.complete_past_stays(future(0)).await.unwrap(), 3);
    }

    #[test]
    fn test_redirect_origin() {
        assert_eq!(
            redirect_origin(Some("https://www.desideridipuglia.it/"), "https://x.it"),
            "https://www.desideridipuglia.it"
        );
        assert_eq!(
            redirect_origin(Some("javascript:alert(1)"), "https://x.it/"),
            "https://x.it"
        );
        assert_eq!(redirect_origin(None, "https://x.it"), "https://x.it");
    }
}
