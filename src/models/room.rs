use crate::entities::room_entity;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoomImage {
    pub id: String,
    pub url: String,
    pub alt_it: String,
    pub alt_en: String,
    pub order: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomResponse {
    pub id: String,
    pub slug: String,
    pub name_it: String,
    pub name_en: String,
    pub description_it: String,
    pub description_en: String,
    pub price_per_night: Decimal,
    pub max_guests: i32,
    pub images: Vec<RoomImage>,
    pub amenities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<room_entity::Model> for RoomResponse {
    fn from(room: room_entity::Model) -> Self {
        let mut images: Vec<RoomImage> = serde_json::from_value(room.images).unwrap_or_default();
        images.sort_by_key(|img| img.order);
        Self {
            id: room.id,
            slug: room.slug,
            name_it: room.name_it,
            name_en: room.name_en,
            description_it: room.description_it,
            description_en: room.description_en,
            price_per_night: room.price_per_night,
            max_guests: room.max_guests,
            images,
            amenities: serde_json::from_value(room.amenities).unwrap_or_default(),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoomRequest {
    pub name_it: Option<String>,
    pub name_en: Option<String>,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
    pub price_per_night: Option<Decimal>,
    pub max_guests: Option<i32>,
    pub images: Option<Vec<RoomImage>>,
    pub amenities: Option<Vec<String>>,
}
