use crate::entities::review_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    /// Clamped to 1..=5
    pub rating: i32,
    pub comment: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "it".to_string()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub room_id: String,
    pub guest_name: String,
    pub rating: i16,
    pub comment_it: Option<String>,
    pub comment_en: Option<String>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

impl From<review_entity::Model> for ReviewResponse {
    fn from(r: review_entity::Model) -> Self {
        Self {
            id: r.id,
            booking_id: r.booking_id,
            room_id: r.room_id,
            guest_name: r.guest_name,
            rating: r.rating,
            comment_it: r.comment_it,
            comment_en: r.comment_en,
            is_approved: r.is_approved,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewQuery {
    pub room_id: Option<String>,
    #[serde(default = "default_approved_only")]
    pub approved_only: bool,
}

fn default_approved_only() -> bool {
    true
}
