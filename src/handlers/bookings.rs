use crate::models::*;
use crate::services::{BookingService, PricingService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/bookings/quote",
    tag = "bookings",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price breakdown, coupon is not consumed", body = QuoteResponse),
        (status = 400, description = "Invalid dates or guest count"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn quote(
    pricing_service: web::Data<PricingService>,
    request: web::Json<QuoteRequest>,
) -> Result<HttpResponse> {
    match pricing_service.quote(&request).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": quote
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking reserved, redirect the guest to checkout_url", body = CreateBookingResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Dates no longer available"),
        (status = 502, description = "Payment provider unavailable")
    )
)]
pub async fn create_booking(
    booking_service: web::Data<BookingService>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse> {
    match booking_service.create_booking(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/bookings/status/{session_id}",
    tag = "bookings",
    params(
        ("session_id" = String, Path, description = "Checkout session id from the success redirect")
    ),
    responses(
        (status = 200, description = "Current booking and payment state", body = BookingStatusResponse),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn booking_status(
    booking_service: web::Data<BookingService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match booking_service.check_status(&path).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/bookings",
    tag = "admin",
    params(BookingListQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Bookings, newest first", body = PaginatedBookingResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_bookings(
    booking_service: web::Data<BookingService>,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse> {
    match booking_service.list_bookings(query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/bookings/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    booking_service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match booking_service.get_booking(path.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/bookings/{id}/status",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    request_body = UpdateBookingStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status changed", body = BookingResponse),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    booking_service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse> {
    match booking_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/bookings/{id}/resend-confirmation",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Booking id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Confirmation email sent", body = BookingResponse),
        (status = 400, description = "Booking is not confirmed"),
        (status = 502, description = "Email delivery failed")
    )
)]
pub async fn resend_confirmation(
    booking_service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match booking_service.resend_confirmation(path.into_inner()).await {
        Ok(booking) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": booking,
            "message": "Confirmation email sent"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn bookings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("/quote", web::post().to(quote))
            .route("/status/{session_id}", web::get().to(booking_status)),
    );
}

pub fn bookings_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/status", web::put().to(update_booking_status))
            .route(
                "/{id}/resend-confirmation",
                web::post().to(resend_confirmation),
            ),
    );
}
