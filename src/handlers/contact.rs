use crate::models::*;
use crate::services::ContactService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message received"),
        (status = 400, description = "Missing or invalid fields")
    )
)]
pub async fn submit_contact(
    contact_service: web::Data<ContactService>,
    request: web::Json<ContactRequest>,
) -> Result<HttpResponse> {
    match contact_service.submit(request.into_inner()).await {
        Ok(_) => Ok(HttpResponse::Created().json(ApiResponse::<()>::message(
            "Message received, we will reply as soon as possible",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/contact",
    tag = "admin",
    params(ContactListQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Contact messages, newest first", body = [ContactMessageResponse])
    )
)]
pub async fn list_messages(
    contact_service: web::Data<ContactService>,
    query: web::Query<ContactListQuery>,
) -> Result<HttpResponse> {
    match contact_service.list_messages(query.unread_only).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": messages
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/contact/{id}/read",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Message id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Message marked as read"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn mark_read(
    contact_service: web::Data<ContactService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match contact_service.mark_read(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Message marked as read"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn contact_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(submit_contact));
}

pub fn contact_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::get().to(list_messages))
        .route("/contact/{id}/read", web::put().to(mark_read));
}
