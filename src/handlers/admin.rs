use crate::handlers::{
    bookings_admin_config, calendar_admin_config, contact_admin_config, coupons_admin_config,
    reviews_admin_config, rooms_admin_config, settings_admin_config, upsells_admin_config,
};
use crate::middlewares::AdminToken;
use crate::models::*;
use crate::services::{AdminAuthService, DashboardService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token to send as a bearer token", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    auth_service: web::Data<AdminAuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(session) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": session
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session closed")
    )
)]
pub async fn logout(
    auth_service: web::Data<AdminAuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let token = req.extensions().get::<AdminToken>().cloned();
    let Some(AdminToken(token)) = token else {
        return Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Logged out")));
    };
    match auth_service.logout(&token).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Logged out"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Booking counts, revenue and pending work", body = DashboardStats)
    )
)]
pub async fn dashboard(dashboard_service: web::Data<DashboardService>) -> Result<HttpResponse> {
    match dashboard_service.stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": stats
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/dashboard", web::get().to(dashboard))
            .configure(rooms_admin_config)
            .configure(bookings_admin_config)
            .configure(calendar_admin_config)
            .configure(upsells_admin_config)
            .configure(coupons_admin_config)
            .configure(reviews_admin_config)
            .configure(contact_admin_config)
            .configure(settings_admin_config),
    );
}
