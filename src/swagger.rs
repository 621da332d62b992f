use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{BookingStatus, DiscountType, PaymentStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::rooms::list_rooms,
        handlers::rooms::get_room,
        handlers::rooms::get_availability,
        handlers::rooms::update_room,
        handlers::bookings::quote,
        handlers::bookings::create_booking,
        handlers::bookings::booking_status,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::update_booking_status,
        handlers::bookings::resend_confirmation,
        handlers::upsells::list_upsells,
        handlers::upsells::create_upsell,
        handlers::upsells::update_upsell,
        handlers::upsells::delete_upsell,
        handlers::coupons::validate_coupon,
        handlers::coupons::list_coupons,
        handlers::coupons::create_coupon,
        handlers::coupons::update_coupon,
        handlers::coupons::delete_coupon,
        handlers::reviews::list_public_reviews,
        handlers::reviews::create_review,
        handlers::reviews::list_reviews,
        handlers::reviews::approve_review,
        handlers::reviews::delete_review,
        handlers::contact::submit_contact,
        handlers::contact::list_messages,
        handlers::contact::mark_read,
        handlers::settings::get_settings,
        handlers::settings::list_stay_reasons,
        handlers::settings::update_settings,
        handlers::calendar::export_ics,
        handlers::calendar::list_blocked_dates,
        handlers::calendar::block_date,
        handlers::calendar::block_range,
        handlers::calendar::unblock_date,
        handlers::calendar::list_custom_prices,
        handlers::calendar::set_custom_prices,
        handlers::calendar::delete_custom_price,
        handlers::webhook::stripe_webhook,
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::dashboard,
    ),
    components(
        schemas(
            ApiError,
            BulkResult,
            RoomImage,
            RoomResponse,
            UpdateRoomRequest,
            AvailabilityResponse,
            QuoteRequest,
            QuoteResponse,
            PriceBreakdownResponse,
            CreateBookingRequest,
            CreateBookingResponse,
            BookingResponse,
            BookingStatusResponse,
            UpdateBookingStatusRequest,
            PaginatedBookingResponse,
            BookingStatus,
            PaymentStatus,
            UpsellResponse,
            CreateUpsellRequest,
            UpdateUpsellRequest,
            CouponResponse,
            CreateCouponRequest,
            UpdateCouponRequest,
            CouponValidationResponse,
            DiscountType,
            CreateReviewRequest,
            ReviewResponse,
            ContactRequest,
            ContactMessageResponse,
            SettingsResponse,
            UpdateSettingsRequest,
            StayReason,
            BlockDateRequest,
            BlockDateRangeRequest,
            BlockedDateResponse,
            CustomPriceRequest,
            CustomPriceResponse,
            LoginRequest,
            LoginResponse,
            BookingCounts,
            DashboardStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "rooms", description = "Rooms and availability"),
        (name = "bookings", description = "Quotes, bookings and checkout"),
        (name = "extras", description = "Upsells and coupons"),
        (name = "reviews", description = "Guest reviews"),
        (name = "contact", description = "Contact form"),
        (name = "settings", description = "Property settings"),
        (name = "calendar", description = "iCal export"),
        (name = "payments", description = "Payment provider callbacks"),
        (name = "admin", description = "Back office, bearer token required"),
        (name = "system", description = "Health"),
    ),
    info(
        title = "Desideri di Puglia API",
        version = "1.0.0",
        description = "Booking backend for the Desideri di Puglia B&B"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
