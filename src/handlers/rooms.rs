use crate::models::*;
use crate::services::{AvailabilityService, RoomService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    responses(
        (status = 200, description = "All rooms", body = [RoomResponse])
    )
)]
pub async fn list_rooms(room_service: web::Data<RoomService>) -> Result<HttpResponse> {
    match room_service.list_rooms().await {
        Ok(rooms) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rooms
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    tag = "rooms",
    params(
        ("room_id" = String, Path, description = "Room id, e.g. nonna")
    ),
    responses(
        (status = 200, description = "Room details", body = RoomResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    room_service: web::Data<RoomService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match room_service.get_room(&path).await {
        Ok(room) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": room
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/availability/{room_id}",
    tag = "rooms",
    params(
        ("room_id" = String, Path, description = "Room id"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Unavailable nights and price overrides", body = AvailabilityResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_availability(
    availability_service: web::Data<AvailabilityService>,
    path: web::Path<String>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse> {
    match availability_service
        .get_availability(&path, query.start_date, query.end_date)
        .await
    {
        Ok(availability) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": availability
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/rooms/{room_id}",
    tag = "admin",
    params(
        ("room_id" = String, Path, description = "Room id")
    ),
    request_body = UpdateRoomRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 400, description = "Invalid price or capacity"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    room_service: web::Data<RoomService>,
    path: web::Path<String>,
    request: web::Json<UpdateRoomRequest>,
) -> Result<HttpResponse> {
    match room_service.update_room(&path, request.into_inner()).await {
        Ok(room) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": room
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn rooms_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms", web::get().to(list_rooms))
        .route("/rooms/{room_id}", web::get().to(get_room))
        .route("/availability/{room_id}", web::get().to(get_availability));
}

pub fn rooms_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rooms/{room_id}", web::put().to(update_room));
}
