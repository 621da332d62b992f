pub mod admin;
pub mod bookings;
pub mod calendar;
pub mod contact;
pub mod coupons;
pub mod reviews;
pub mod rooms;
pub mod settings;
pub mod upsells;
pub mod webhook;

use actix_web::{HttpResponse, web};
use serde_json::json;

pub use admin::admin_config;
pub use bookings::{bookings_admin_config, bookings_config};
pub use calendar::{calendar_admin_config, calendar_config};
pub use contact::{contact_admin_config, contact_config};
pub use coupons::{coupons_admin_config, coupons_config};
pub use reviews::{reviews_admin_config, reviews_config};
pub use rooms::{rooms_admin_config, rooms_config};
pub use settings::{settings_admin_config, settings_config};
pub use upsells::{upsells_admin_config, upsells_config};
pub use webhook::webhook_config;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Every route under `/api`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(index))
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health))
        .configure(rooms_config)
        .configure(bookings_config)
        .configure(upsells_config)
        .configure(coupons_config)
        .configure(reviews_config)
        .configure(contact_config)
        .configure(settings_config)
        .configure(calendar_config)
        .configure(webhook_config)
        .configure(admin_config);
}
