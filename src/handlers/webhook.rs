use crate::error::AppError;
use crate::services::PaymentService;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{error, warn};
use serde_json::json;

/// Stripe webhook receiver.
///
/// Signature failures get a 400 so misconfiguration is visible in the
/// Stripe dashboard. Processing failures still answer 200 after logging,
/// the reconciliation task picks the booking up later.
#[utoipa::path(
    post,
    path = "/webhook/stripe",
    tag = "payments",
    responses(
        (status = 200, description = "Event received"),
        (status = 400, description = "Missing or invalid signature")
    )
)]
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    payment_service: web::Data<PaymentService>,
) -> Result<HttpResponse> {
    let Some(signature) = req
        .headers()
        .get("stripe-signature")
        .and_then(|sig| sig.to_str().ok())
    else {
        warn!("Missing Stripe-Signature header");
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Missing Stripe-Signature header"
        })));
    };

    let payload = std::str::from_utf8(&body).map_err(|_| {
        error!("Invalid UTF-8 in webhook payload");
        actix_web::error::ErrorBadRequest("Invalid payload encoding")
    })?;

    match payment_service.handle_webhook(payload, signature).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "received": true }))),
        Err(AppError::AuthError(msg)) => {
            error!("Webhook signature verification failed: {msg}");
            Ok(HttpResponse::BadRequest().json(json!({
                "error": "Invalid signature"
            })))
        }
        Err(e) => {
            error!("Failed to process webhook event: {e}");
            Ok(HttpResponse::Ok().json(json!({ "received": true })))
        }
    }
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook/stripe", web::post().to(stripe_webhook));
}
