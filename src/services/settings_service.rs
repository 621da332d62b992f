use crate::entities::settings_entity;
use crate::error::{AppError, AppResult};
use crate::models::{SettingsResponse, UpdateSettingsRequest};
use crate::utils::validate_email;
use chrono::{NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set,
};

#[derive(Clone)]
pub struct SettingsService {
    pool: DatabaseConnection,
}

/// Loads the singleton row, falling back to defaults if it was never seeded.
pub async fn load_settings<C: ConnectionTrait>(db: &C) -> AppResult<settings_entity::Model> {
    let settings = settings_entity::Entity::find_by_id(settings_entity::SETTINGS_ID)
        .one(db)
        .await?;
    Ok(settings.unwrap_or_else(default_settings))
}

pub(crate) fn default_settings() -> settings_entity::Model {
    settings_entity::Model {
        id: settings_entity::SETTINGS_ID.to_string(),
        min_nights: 1,
        check_in_time: "13:00".to_string(),
        check_out_time: "10:30".to_string(),
        contact_email: None,
        contact_phone: None,
        updated_at: Utc::now(),
    }
}

fn validate_time(field: &str, value: &str) -> AppResult<()> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::ValidationError(format!("{field} must be HH:MM")))
}

impl SettingsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_settings(&self) -> AppResult<SettingsResponse> {
        Ok(load_settings(&self.pool).await?.into())
    }

    pub async fn update_settings(
        &self,
        request: UpdateSettingsRequest,
    ) -> AppResult<SettingsResponse> {
        if let Some(min_nights) = request.min_nights
            && min_nights < 1
        {
            return Err(AppError::ValidationError(
                "min_nights must be at least 1".to_string(),
            ));
        }
        if let Some(t) = &request.check_in_time {
            validate_time("check_in_time", t)?;
        }
        if let Some(t) = &request.check_out_time {
            validate_time("check_out_time", t)?;
        }
        if let Some(email) = &request.contact_email {
            validate_email(email)?;
        }

        let existing = settings_entity::Entity::find_by_id(settings_entity::SETTINGS_ID)
            .one(&self.pool)
            .await?;
        let exists = existing.is_some();
        let current = existing.unwrap_or_else(default_settings);

        let merged = settings_entity::Model {
            min_nights: request.min_nights.unwrap_or(current.min_nights),
            check_in_time: request.check_in_time.unwrap_or(current.check_in_time),
            check_out_time: request.check_out_time.unwrap_or(current.check_out_time),
            contact_email: request.contact_email.or(current.contact_email),
            contact_phone: request.contact_phone.or(current.contact_phone),
            updated_at: Utc::now(),
            id: current.id,
        };

        let active = settings_entity::ActiveModel {
            id: Set(merged.id),
            min_nights: Set(merged.min_nights),
            check_in_time: Set(merged.check_in_time),
            check_out_time: Set(merged.check_out_time),
            contact_email: Set(merged.contact_email),
            contact_phone: Set(merged.contact_phone),
            updated_at: Set(merged.updated_at),
        };
        let saved = if exists {
            active.update(&self.pool).await?
        } else {
            active.insert(&self.pool).await?
        };
        Ok(saved.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_defaults_when_row_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<settings_entity::Model>::new()])
            .into_connection();
        let settings = load_settings(&db).await.unwrap();
        assert_eq!(settings.min_nights, 1);
        assert_eq!(settings.check_out_time, "10:30");
    }

    #[tokio::test]
    async fn test_update_validates_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = SettingsService::new(db);

        let bad_nights = UpdateSettingsRequest {
            min_nights: Some(0),
            ..Default::default()
        };
        assert!(service.update_settings(bad_nights).await.is_err());

        let bad_time = UpdateSettingsRequest {
            check_in_time: Some("1pm".to_string()),
            ..Default::default()
        };
        assert!(service.update_settings(bad_time).await.is_err());
    }
}
