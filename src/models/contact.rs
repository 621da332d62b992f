use crate::entities::contact_message_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "it".to_string()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub language: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<contact_message_entity::Model> for ContactMessageResponse {
    fn from(m: contact_message_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            message: m.message,
            language: m.language,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactListQuery {
    #[serde(default)]
    pub unread_only: bool,
}
