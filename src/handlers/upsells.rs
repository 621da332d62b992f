use crate::models::*;
use crate::services::UpsellService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/upsells",
    tag = "extras",
    params(UpsellQuery),
    responses(
        (status = 200, description = "Upsells in display order", body = [UpsellResponse])
    )
)]
pub async fn list_upsells(
    upsell_service: web::Data<UpsellService>,
    query: web::Query<UpsellQuery>,
) -> Result<HttpResponse> {
    match upsell_service.list_upsells(query.active_only).await {
        Ok(upsells) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": upsells
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/upsells",
    tag = "admin",
    request_body = CreateUpsellRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Upsell created", body = UpsellResponse),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_upsell(
    upsell_service: web::Data<UpsellService>,
    request: web::Json<CreateUpsellRequest>,
) -> Result<HttpResponse> {
    match upsell_service.create_upsell(request.into_inner()).await {
        Ok(upsell) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": upsell
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/upsells/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Upsell id")
    ),
    request_body = UpdateUpsellRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Upsell updated", body = UpsellResponse),
        (status = 404, description = "Upsell not found")
    )
)]
pub async fn update_upsell(
    upsell_service: web::Data<UpsellService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUpsellRequest>,
) -> Result<HttpResponse> {
    match upsell_service
        .update_upsell(path.into_inner(), request.into_inner())
        .await
    {
        Ok(upsell) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": upsell
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/upsells/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Upsell id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Upsell deleted"),
        (status = 404, description = "Upsell not found")
    )
)]
pub async fn delete_upsell(
    upsell_service: web::Data<UpsellService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match upsell_service.delete_upsell(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Upsell deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn upsells_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/upsells", web::get().to(list_upsells));
}

pub fn upsells_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/upsells")
            .route("", web::post().to(create_upsell))
            .route("/{id}", web::put().to(update_upsell))
            .route("/{id}", web::delete().to(delete_upsell)),
    );
}
