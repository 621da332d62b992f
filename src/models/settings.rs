use crate::entities::settings_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub min_nights: i32,
    pub check_in_time: String,
    pub check_out_time: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<settings_entity::Model> for SettingsResponse {
    fn from(s: settings_entity::Model) -> Self {
        Self {
            min_nights: s.min_nights,
            check_in_time: s.check_in_time,
            check_out_time: s.check_out_time,
            contact_email: s.contact_email,
            contact_phone: s.contact_phone,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub min_nights: Option<i32>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StayReason {
    pub id: &'static str,
    pub label_it: &'static str,
    pub label_en: &'static str,
}

pub const STAY_REASONS: [StayReason; 6] = [
    StayReason {
        id: "vacanza",
        label_it: "Vacanza",
        label_en: "Holiday",
    },
    StayReason {
        id: "romantico",
        label_it: "Fuga romantica",
        label_en: "Romantic getaway",
    },
    StayReason {
        id: "famiglia",
        label_it: "Visita in famiglia",
        label_en: "Family visit",
    },
    StayReason {
        id: "lavoro",
        label_it: "Lavoro",
        label_en: "Business",
    },
    StayReason {
        id: "evento",
        label_it: "Evento o matrimonio",
        label_en: "Event or wedding",
    },
    StayReason {
        id: "altro",
        label_it: "Altro",
        label_en: "Other",
    },
];

pub fn is_known_stay_reason(id: &str) -> bool {
    STAY_REASONS.iter().any(|r| r.id == id)
}
