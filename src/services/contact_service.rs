use crate::entities::contact_message_entity;
use crate::error::{AppError, AppResult};
use crate::models::{ContactMessageResponse, ContactRequest};
use crate::services::notification_service::NotificationService;
use crate::utils::{normalize_language, require_non_empty, validate_email};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

/// Upper bound on a single message body, in characters
const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Clone)]
pub struct ContactService {
    pool: DatabaseConnection,
    notifications: NotificationService,
}

impl ContactService {
    pub fn new(pool: DatabaseConnection, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    pub async fn submit(&self, request: ContactRequest) -> AppResult<ContactMessageResponse> {
        require_non_empty("name", &request.name)?;
        require_non_empty("message", &request.message)?;
        let email = request.email.trim().to_lowercase();
        validate_email(&email)?;
        if request.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(AppError::ValidationError(format!(
                "message cannot exceed {MAX_MESSAGE_LEN} characters"
            )));
        }

        let message = contact_message_entity::Model {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email,
            message: request.message.trim().to_string(),
            language: normalize_language(Some(&request.language)),
            is_read: false,
            created_at: Utc::now(),
        };
        contact_message_entity::Entity::insert(contact_message_entity::ActiveModel {
            id: Set(message.id),
            name: Set(message.name.clone()),
            email: Set(message.email.clone()),
            message: Set(message.message.clone()),
            language: Set(message.language.clone()),
            is_read: Set(false),
            created_at: Set(message.created_at),
        })
        .exec_without_returning(&self.pool)
        .await?;

        log::info!("Contact message {} from {}", message.id, message.email);
        self.notifications.contact_received(&message).await;
        Ok(message.into())
    }

    pub async fn list_messages(&self, unread_only: bool) -> AppResult<Vec<ContactMessageResponse>> {
        let mut select = contact_message_entity::Entity::find();
        if unread_only {
            select = select.filter(contact_message_entity::Column::IsRead.eq(false));
        }
        let messages = select
            .order_by_desc(contact_message_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }

    pub async fn mark_read(&self, id: Uuid) -> AppResult<()> {
        let result = contact_message_entity::Entity::update_many()
            .col_expr(contact_message_entity::Column::IsRead, Expr::value(true))
            .filter(contact_message_entity::Column::Id.eq(id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Message {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{RecordingMailer, exec};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: DatabaseConnection, mailer: Arc<RecordingMailer>) -> ContactService {
        let notifications = NotificationService::new(
            db.clone(),
            mailer,
            "Desideri di Puglia".to_string(),
            Some("host@desideridipuglia.it".to_string()),
        );
        ContactService::new(db, notifications)
    }

    fn request(email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: "Marco".to_string(),
            email: email.to_string(),
            message: message.to_string(),
            language: "fr".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_and_notifies_owner() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(db, mailer.clone());

        let saved = service
            .submit(request("Marco@Example.com", "Avete parcheggio?"))
            .await
            .unwrap();
        assert_eq!(saved.email, "marco@example.com");
        assert_eq!(saved.language, "it");
        assert!(!saved.is_read);

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "host@desideridipuglia.it");
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service(db, Arc::new(RecordingMailer::default()));
        assert!(matches!(
            service.submit(request("marco", "ciao")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.submit(request("marco@example.com", "   ")).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
