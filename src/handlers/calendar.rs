use crate::models::*;
use crate::services::CalendarService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use chrono::NaiveDate;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/calendar/{room_id}.ics",
    tag = "calendar",
    params(
        ("room_id" = String, Path, description = "Room id")
    ),
    responses(
        (status = 200, description = "iCalendar feed for channel managers", content_type = "text/calendar"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn export_ics(
    calendar_service: web::Data<CalendarService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match calendar_service.export_ics(&path).await {
        Ok(ics) => Ok(HttpResponse::Ok()
            .content_type("text/calendar; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("inline; filename=\"{}.ics\"", path.as_str()),
            ))
            .body(ics)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/blocked-dates/{room_id}",
    tag = "admin",
    params(
        ("room_id" = String, Path, description = "Room id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Blocked dates of the room", body = [BlockedDateResponse])
    )
)]
pub async fn list_blocked_dates(
    calendar_service: web::Data<CalendarService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match calendar_service.list_blocked_dates(&path).await {
        Ok(dates) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": dates
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/blocked-dates",
    tag = "admin",
    request_body = BlockDateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Date blocked, repeated calls return the existing row", body = BlockedDateResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn block_date(
    calendar_service: web::Data<CalendarService>,
    request: web::Json<BlockDateRequest>,
) -> Result<HttpResponse> {
    match calendar_service.block_date(request.into_inner()).await {
        Ok(blocked) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": blocked
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/blocked-dates/range",
    tag = "admin",
    request_body = BlockDateRangeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Number of newly blocked dates", body = BulkResult),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn block_range(
    calendar_service: web::Data<CalendarService>,
    request: web::Json<BlockDateRangeRequest>,
) -> Result<HttpResponse> {
    match calendar_service.block_range(request.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/blocked-dates/{room_id}/{date}",
    tag = "admin",
    params(
        ("room_id" = String, Path, description = "Room id"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Date unblocked")
    )
)]
pub async fn unblock_date(
    calendar_service: web::Data<CalendarService>,
    path: web::Path<(String, NaiveDate)>,
) -> Result<HttpResponse> {
    let (room_id, date) = path.into_inner();
    match calendar_service.unblock_date(&room_id, date).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Date unblocked"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/custom-prices/{room_id}",
    tag = "admin",
    params(
        ("room_id" = String, Path, description = "Room id"),
        CustomPriceQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Per-date price overrides", body = [CustomPriceResponse])
    )
)]
pub async fn list_custom_prices(
    calendar_service: web::Data<CalendarService>,
    path: web::Path<String>,
    query: web::Query<CustomPriceQuery>,
) -> Result<HttpResponse> {
    match calendar_service.list_custom_prices(&path, &query).await {
        Ok(prices) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prices
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/custom-prices",
    tag = "admin",
    request_body = CustomPriceRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Price set for every date of the range", body = BulkResult),
        (status = 400, description = "Invalid price or range"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn set_custom_prices(
    calendar_service: web::Data<CalendarService>,
    request: web::Json<CustomPriceRequest>,
) -> Result<HttpResponse> {
    match calendar_service.set_custom_prices(request.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/custom-prices/{room_id}/{date}",
    tag = "admin",
    params(
        ("room_id" = String, Path, description = "Room id"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Override removed"),
        (status = 404, description = "No override on that date")
    )
)]
pub async fn delete_custom_price(
    calendar_service: web::Data<CalendarService>,
    path: web::Path<(String, NaiveDate)>,
) -> Result<HttpResponse> {
    let (room_id, date) = path.into_inner();
    match calendar_service.delete_custom_price(&room_id, date).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Custom price removed"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn calendar_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/calendar/{room_id}.ics", web::get().to(export_ics));
}

pub fn calendar_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blocked-dates")
            .route("", web::post().to(block_date))
            .route("/range", web::post().to(block_range))
            .route("/{room_id}", web::get().to(list_blocked_dates))
            .route("/{room_id}/{date}", web::delete().to(unblock_date)),
    )
    .service(
        web::scope("/custom-prices")
            .route("", web::post().to(set_custom_prices))
            .route("/{room_id}", web::get().to(list_custom_prices))
            .route("/{room_id}/{date}", web::delete().to(delete_custom_price)),
    );
}
