use crate::entities::{BookingStatus, booking_entity, review_entity};
use crate::error::{AppError, AppResult};
use crate::models::{CreateReviewRequest, ReviewQuery, ReviewResponse};
use crate::services::map_unique_violation;
use crate::utils::{normalize_language, require_non_empty};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

/// Guests may review once their stay is over.
fn can_review(booking: &booking_entity::Model, today: NaiveDate) -> bool {
    match booking.status {
        BookingStatus::Completed => true,
        BookingStatus::Confirmed => booking.check_out <= today,
        _ => false,
    }
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// `approved_only` is forced for public callers by the handler.
    pub async fn list_reviews(&self, query: ReviewQuery) -> AppResult<Vec<ReviewResponse>> {
        let mut select = review_entity::Entity::find();
        if let Some(room_id) = query.room_id {
            select = select.filter(review_entity::Column::RoomId.eq(room_id));
        }
        if query.approved_only {
            select = select.filter(review_entity::Column::IsApproved.eq(true));
        }
        let reviews = select
            .order_by_desc(review_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(reviews.into_iter().map(Into::into).collect())
    }

    /// New reviews wait for approval before they are listed publicly.
    pub async fn create_review(&self, request: CreateReviewRequest) -> AppResult<ReviewResponse> {
        require_non_empty("comment", &request.comment)?;

        let booking = booking_entity::Entity::find_by_id(request.booking_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", request.booking_id)))?;
        if !can_review(&booking, Utc::now().date_naive()) {
            return Err(AppError::ValidationError(
                "Reviews open after the stay is completed".to_string(),
            ));
        }

        let existing = review_entity::Entity::find()
            .filter(review_entity::Column::BookingId.eq(booking.id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(
                "This booking has already been reviewed".to_string(),
            ));
        }

        let comment = request.comment.trim().to_string();
        let (comment_it, comment_en) = if normalize_language(Some(&request.language)) == "en" {
            (None, Some(comment))
        } else {
            (Some(comment), None)
        };
        let review = review_entity::Model {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            room_id: booking.room_id,
            guest_name: booking.guest_name,
            rating: request.rating.clamp(1, 5) as i16,
            comment_it,
            comment_en,
            is_approved: false,
            created_at: Utc::now(),
        };

        review_entity::Entity::insert(review_entity::ActiveModel {
            id: Set(review.id),
            booking_id: Set(review.booking_id),
            room_id: Set(review.room_id.clone()),
            guest_name: Set(review.guest_name.clone()),
            rating: Set(review.rating),
            comment_it: Set(review.comment_it.clone()),
            comment_en: Set(review.comment_en.clone()),
            is_approved: Set(review.is_approved),
            created_at: Set(review.created_at),
        })
        .exec_without_returning(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "This booking has already been reviewed"))?;

        log::info!("Review {} received for booking {}", review.id, review.booking_id);
        Ok(review.into())
    }

    pub async fn approve_review(&self, id: Uuid) -> AppResult<()> {
        let result = review_entity::Entity::update_many()
            .col_expr(review_entity::Column::IsApproved, Expr::value(true))
            .filter(review_entity::Column::Id.eq(id))
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Review {id} not found")));
        }
        Ok(())
    }

    pub async fn delete_review(&self, id: Uuid) -> AppResult<()> {
        let result = review_entity::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Review {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{booking, d, exec};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn review_request(booking_id: Uuid, rating: i32, language: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            booking_id,
            rating,
            comment: " Soggiorno splendido ".to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_can_review_after_stay() {
        let mut b = booking("nonna", "2026-07-01", "2026-07-03");
        assert!(!can_review(&b, d("2026-07-05")));
        b.status = BookingStatus::Confirmed;
        assert!(!can_review(&b, d("2026-07-02")));
        assert!(can_review(&b, d("2026-07-03")));
        b.status = BookingStatus::Completed;
        assert!(can_review(&b, d("2026-07-01")));
    }

    #[tokio::test]
    async fn test_review_is_clamped_and_pending_approval() {
        let mut b = booking("pozzo", "2026-05-01", "2026-05-04");
        b.status = BookingStatus::Completed;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![b.clone()]])
            .append_query_results([Vec::<review_entity::Model>::new()])
            .append_exec_results([exec(1)])
            .into_connection();
        let service = ReviewService::new(db);

        let review = service
            .create_review(review_request(b.id, 9, "en"))
            .await
            .unwrap();
        assert_eq!(review.rating, 5);
        assert!(!review.is_approved);
        assert_eq!(review.comment_en.as_deref(), Some("Soggiorno splendido"));
        assert!(review.comment_it.is_none());
        assert_eq!(review.room_id, "pozzo");
    }

    #[tokio::test]
    async fn test_second_review_conflicts() {
        let mut b = booking("pozzo", "2026-05-01", "2026-05-04");
        b.status = BookingStatus::Completed;
        let existing = review_entity::Model {
            id: Uuid::new_v4(),
            booking_id: b.id,
            room_id: "pozzo".to_string(),
            guest_name: b.guest_name.clone(),
            rating: 4,
            comment_it: Some("Bello".to_string()),
            comment_en: None,
            is_approved: true,
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![b.clone()]])
            .append_query_results([vec![existing]])
            .into_connection();
        let service = ReviewService::new(db);
        let err = service
            .create_review(review_request(b.id, 4, "it"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_approve_missing_review() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();
        let service = ReviewService::new(db);
        assert!(matches!(
            service.approve_review(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
