use crate::models::*;
use crate::services::ReviewService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    params(
        ("room_id" = Option<String>, Query, description = "Only reviews for this room")
    ),
    responses(
        (status = 200, description = "Approved reviews, newest first", body = [ReviewResponse])
    )
)]
pub async fn list_public_reviews(
    review_service: web::Data<ReviewService>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    let query = ReviewQuery {
        approved_only: true,
        ..query.into_inner()
    };
    match review_service.list_reviews(query).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": reviews
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored, awaiting approval", body = ReviewResponse),
        (status = 400, description = "Stay not completed yet"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already reviewed")
    )
)]
pub async fn create_review(
    review_service: web::Data<ReviewService>,
    request: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse> {
    match review_service.create_review(request.into_inner()).await {
        Ok(review) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": review,
            "message": "Thank you, your review will be published after moderation"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/reviews",
    tag = "admin",
    params(ReviewQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Reviews, pass approved_only=false to include pending ones", body = [ReviewResponse])
    )
)]
pub async fn list_reviews(
    review_service: web::Data<ReviewService>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse> {
    match review_service.list_reviews(query.into_inner()).await {
        Ok(reviews) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": reviews
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/reviews/{id}/approve",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Review id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review published"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn approve_review(
    review_service: web::Data<ReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match review_service.approve_review(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Review approved"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/reviews/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "Review id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    review_service: web::Data<ReviewService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match review_service.delete_review(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Review deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn reviews_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(list_public_reviews))
            .route("", web::post().to(create_review)),
    );
}

pub fn reviews_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(list_reviews))
            .route("/{id}/approve", web::put().to(approve_review))
            .route("/{id}", web::delete().to(delete_review)),
    );
}
