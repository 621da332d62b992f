use crate::entities::upsell_entity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpsellResponse {
    pub id: Uuid,
    pub slug: String,
    pub title_it: String,
    pub title_en: String,
    pub description_it: String,
    pub description_en: String,
    pub price: Decimal,
    pub min_nights: i32,
    pub is_active: bool,
    pub order: i32,
    pub icon: String,
}

impl From<upsell_entity::Model> for UpsellResponse {
    fn from(u: upsell_entity::Model) -> Self {
        Self {
            id: u.id,
            slug: u.slug,
            title_it: u.title_it,
            title_en: u.title_en,
            description_it: u.description_it,
            description_en: u.description_en,
            price: u.price,
            min_nights: u.min_nights,
            is_active: u.is_active,
            order: u.order,
            icon: u.icon,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpsellQuery {
    #[serde(default = "default_true")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUpsellRequest {
    pub slug: String,
    pub title_it: String,
    pub title_en: String,
    #[serde(default)]
    pub description_it: String,
    #[serde(default)]
    pub description_en: String,
    pub price: Decimal,
    #[serde(default)]
    pub min_nights: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUpsellRequest {
    pub slug: Option<String>,
    pub title_it: Option<String>,
    pub title_en: Option<String>,
    pub description_it: Option<String>,
    pub description_en: Option<String>,
    pub price: Option<Decimal>,
    pub min_nights: Option<i32>,
    pub is_active: Option<bool>,
    pub order: Option<i32>,
    pub icon: Option<String>,
}
