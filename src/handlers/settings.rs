use crate::models::*;
use crate::services::SettingsService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Public property settings", body = SettingsResponse)
    )
)]
pub async fn get_settings(settings_service: web::Data<SettingsService>) -> Result<HttpResponse> {
    match settings_service.get_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": settings
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/stay-reasons",
    tag = "settings",
    responses(
        (status = 200, description = "Reasons a guest can pick on the booking form", body = [StayReason])
    )
)]
pub async fn list_stay_reasons() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": STAY_REASONS
    })))
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    request_body = UpdateSettingsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Settings saved", body = SettingsResponse),
        (status = 400, description = "Invalid value")
    )
)]
pub async fn update_settings(
    settings_service: web::Data<SettingsService>,
    request: web::Json<UpdateSettingsRequest>,
) -> Result<HttpResponse> {
    match settings_service.update_settings(request.into_inner()).await {
        Ok(settings) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": settings
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings", web::get().to(get_settings))
        .route("/stay-reasons", web::get().to(list_stay_reasons));
}

pub fn settings_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings", web::put().to(update_settings));
}
