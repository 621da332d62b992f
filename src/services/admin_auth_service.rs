//! Shared-password admin login backed by opaque session tokens.

use crate::config::AdminConfig;
use crate::entities::admin_session_entity;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse};
use crate::utils::{SESSION_TOKEN_LEN, generate_token, verify_password};
use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[derive(Clone)]
pub struct AdminAuthService {
    pool: DatabaseConnection,
    config: AdminConfig,
}

impl AdminAuthService {
    pub fn new(pool: DatabaseConnection, config: AdminConfig) -> Self {
        Self { pool, config }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        if self.config.password_hash.is_empty() {
            return Err(AppError::ConfigError(
                "Admin password hash is not configured".to_string(),
            ));
        }
        let username_ok = request.username.trim() == self.config.username;
        let password_ok = verify_password(&request.password, &self.config.password_hash)?;
        if !(username_ok && password_ok) {
            log::warn!("Failed admin login for '{}'", request.username);
            return Err(AppError::AuthError("Invalid credentials".to_string()));
        }

        let token = generate_token(SESSION_TOKEN_LEN);
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.session_ttl_hours);
        admin_session_entity::Entity::insert(admin_session_entity::ActiveModel {
            token: Set(token.clone()),
            expires_at: Set(expires_at),
            created_at: Set(now),
        })
        .exec_without_returning(&self.pool)
        .await?;

        log::info!("Admin session opened, expires at {expires_at}");
        Ok(LoginResponse { token, expires_at })
    }

    /// True when the token names a live session.
    pub async fn validate_token(&self, token: &str) -> AppResult<bool> {
        let session = admin_session_entity::Entity::find_by_id(token.to_string())
            .one(&self.pool)
            .await?;
        Ok(session.is_some_and(|s| s.expires_at > Utc::now()))
    }

    pub async fn logout(&self, token: &str) -> AppResult<()> {
        admin_session_entity::Entity::delete_by_id(token.to_string())
            .exec(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn purge_expired(&self) -> AppResult<u64> {
        let result = admin_session_entity::Entity::delete_many()
            .filter(admin_session_entity::Column::ExpiresAt.lt(Utc::now()))
            .exec(&self.pool)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::exec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn config() -> AdminConfig {
        AdminConfig {
            username: "admin".to_string(),
            password_hash: bcrypt::hash("Masseria2026", 4).unwrap(),
            session_ttl_hours: 12,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();
        let service = AdminAuthService::new(db, config());

        let response = service.login(login("admin", "Masseria2026")).await.unwrap();
        assert_eq!(response.token.len(), SESSION_TOKEN_LEN);
        assert!(response.expires_at > Utc::now() + Duration::hours(11));
    }

    #[tokio::test]
    async fn test_wrong_credentials_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = AdminAuthService::new(db, config());

        assert!(matches!(
            service.login(login("admin", "masseria2026")).await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            service.login(login("root", "Masseria2026")).await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_invalid() {
        let expired = admin_session_entity::Model {
            token: "abc".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
            created_at: Utc::now() - Duration::hours(13),
        };
        let live = admin_session_entity::Model {
            expires_at: Utc::now() + Duration::hours(1),
            ..expired.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![expired]])
            .append_query_results([vec![live]])
            .append_query_results([Vec::<admin_session_entity::Model>::new()])
            .into_connection();
        let service = AdminAuthService::new(db, config());

        assert!(!service.validate_token("abc").await.unwrap());
        assert!(service.validate_token("abc").await.unwrap());
        assert!(!service.validate_token("missing").await.unwrap());
    }
}
