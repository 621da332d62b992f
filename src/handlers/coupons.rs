use crate::models::*;
use crate::services::CouponService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/coupons/validate/{code}",
    tag = "extras",
    params(
        ("code" = String, Path, description = "Coupon code, case insensitive"),
        CouponValidationQuery
    ),
    responses(
        (status = 200, description = "Whether the coupon applies, with the reason when it does not", body = CouponValidationResponse),
        (status = 404, description = "Unknown coupon")
    )
)]
pub async fn validate_coupon(
    coupon_service: web::Data<CouponService>,
    path: web::Path<String>,
    query: web::Query<CouponValidationQuery>,
) -> Result<HttpResponse> {
    match coupon_service.validate_coupon(&path, query.nights).await {
        Ok(validation) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": validation
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/coupons",
    tag = "admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All coupons", body = [CouponResponse])
    )
)]
pub async fn list_coupons(coupon_service: web::Data<CouponService>) -> Result<HttpResponse> {
    match coupon_service.list_coupons().await {
        Ok(coupons) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": coupons
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/coupons",
    tag = "admin",
    request_body = CreateCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Coupon created", body = CouponResponse),
        (status = 400, description = "Invalid discount"),
        (status = 409, description = "Code already exists")
    )
)]
pub async fn create_coupon(
    coupon_service: web::Data<CouponService>,
    request: web::Json<CreateCouponRequest>,
) -> Result<HttpResponse> {
    match coupon_service.create_coupon(request.into_inner()).await {
        Ok(coupon) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": coupon
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/coupons/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Coupon id")
    ),
    request_body = UpdateCouponRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coupon updated", body = CouponResponse),
        (status = 404, description = "Coupon not found")
    )
)]
pub async fn update_coupon(
    coupon_service: web::Data<CouponService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateCouponRequest>,
) -> Result<HttpResponse> {
    match coupon_service
        .update_coupon(path.into_inner(), request.into_inner())
        .await
    {
        Ok(coupon) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": coupon
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/coupons/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Coupon id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Coupon deleted"),
        (status = 404, description = "Coupon not found")
    )
)]
pub async fn delete_coupon(
    coupon_service: web::Data<CouponService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match coupon_service.delete_coupon(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Coupon deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coupons_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/coupons/validate/{code}", web::get().to(validate_coupon));
}

pub fn coupons_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coupons")
            .route("", web::get().to(list_coupons))
            .route("", web::post().to(create_coupon))
            .route("/{id}", web::put().to(update_coupon))
            .route("/{id}", web::delete().to(delete_coupon)),
    );
}
