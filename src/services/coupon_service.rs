use crate::domain::{check_coupon, normalize_coupon_code};
use crate::entities::{DiscountType, coupon_entity};
use crate::error::{AppError, AppResult};
use crate::models::{
    CouponResponse, CouponValidationResponse, CreateCouponRequest, UpdateCouponRequest,
};
use crate::services::map_unique_violation;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CouponService {
    pool: DatabaseConnection,
}

pub async fn find_coupon_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> AppResult<Option<coupon_entity::Model>> {
    Ok(coupon_entity::Entity::find()
        .filter(coupon_entity::Column::Code.eq(normalize_coupon_code(code)))
        .one(db)
        .await?)
}

/// Consumes one use. Returns false when a concurrent redemption took the
/// last use or the coupon was disabled in the meantime.
pub async fn redeem_coupon<C: ConnectionTrait>(db: &C, coupon_id: Uuid) -> AppResult<bool> {
    let result = coupon_entity::Entity::update_many()
        .col_expr(
            coupon_entity::Column::UsesCount,
            Expr::col(coupon_entity::Column::UsesCount).add(1),
        )
        .col_expr(coupon_entity::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(coupon_entity::Column::Id.eq(coupon_id))
        .filter(coupon_entity::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(coupon_entity::Column::MaxUses.is_null())
                .add(
                    Expr::col(coupon_entity::Column::UsesCount)
                        .lt(Expr::col(coupon_entity::Column::MaxUses)),
                ),
        )
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

struct CouponTerms {
    discount_type: DiscountType,
    discount_value: Decimal,
    min_nights: i32,
    max_uses: Option<i32>,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
}

impl CouponTerms {
    fn validate(&self) -> AppResult<()> {
        if self.discount_value <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "discount_value must be greater than zero".to_string(),
            ));
        }
        if self.discount_type == DiscountType::Percentage
            && self.discount_value > Decimal::ONE_HUNDRED
        {
            return Err(AppError::ValidationError(
                "A percentage discount cannot exceed 100".to_string(),
            ));
        }
        if self.min_nights < 1 {
            return Err(AppError::ValidationError(
                "min_nights must be at least 1".to_string(),
            ));
        }
        if let Some(max_uses) = self.max_uses
            && max_uses < 1
        {
            return Err(AppError::ValidationError(
                "max_uses must be at least 1".to_string(),
            ));
        }
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until)
            && from > until
        {
            return Err(AppError::ValidationError(
                "valid_from must not be after valid_until".to_string(),
            ));
        }
        Ok(())
    }
}

impl CouponService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_coupons(&self) -> AppResult<Vec<CouponResponse>> {
        let coupons = coupon_entity::Entity::find()
            .order_by_desc(coupon_entity::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(coupons.into_iter().map(Into::into).collect())
    }

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> AppResult<CouponResponse> {
        let code = normalize_coupon_code(&request.code);
        if code.is_empty() {
            return Err(AppError::ValidationError("code is required".to_string()));
        }
        CouponTerms {
            discount_type: request.discount_type,
            discount_value: request.discount_value,
            min_nights: request.min_nights,
            max_uses: request.max_uses,
            valid_from: request.valid_from,
            valid_until: request.valid_until,
        }
        .validate()?;

        if find_coupon_by_code(&self.pool, &code).await?.is_some() {
            return Err(AppError::Conflict(format!("Coupon {code} already exists")));
        }

        let now = Utc::now();
        let coupon = coupon_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.clone()),
            discount_type: Set(request.discount_type),
            discount_value: Set(request.discount_value),
            min_nights: Set(request.min_nights),
            max_uses: Set(request.max_uses),
            uses_count: Set(0),
            valid_from: Set(request.valid_from),
            valid_until: Set(request.valid_until),
            is_active: Set(request.is_active),
            description_it: Set(request.description_it),
            description_en: Set(request.description_en),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Coupon {code} already exists")))?;

        log::info!("Coupon {} created ({})", coupon.code, coupon.discount_type);
        Ok(coupon.into())
    }

    pub async fn update_coupon(
        &self,
        id: Uuid,
        request: UpdateCouponRequest,
    ) -> AppResult<CouponResponse> {
        let current = coupon_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Coupon {id} not found")))?;

        let terms = CouponTerms {
            discount_type: request.discount_type.unwrap_or(current.discount_type),
            discount_value: request.discount_value.unwrap_or(current.discount_value),
            min_nights: request.min_nights.unwrap_or(current.min_nights),
            max_uses: request.max_uses.unwrap_or(current.max_uses),
            valid_from: request.valid_from.unwrap_or(current.valid_from),
            valid_until: request.valid_until.unwrap_or(current.valid_until),
        };
        terms.validate()?;
        if let Some(max_uses) = terms.max_uses
            && max_uses < current.uses_count
        {
            return Err(AppError::ValidationError(format!(
                "max_uses cannot be below the {} uses already recorded",
                current.uses_count
            )));
        }

        let mut coupon = current.into_active_model();
        coupon.discount_type = Set(terms.discount_type);
        coupon.discount_value = Set(terms.discount_value);
        coupon.min_nights = Set(terms.min_nights);
        coupon.max_uses = Set(terms.max_uses);
        coupon.valid_from = Set(terms.valid_from);
        coupon.valid_until = Set(terms.valid_until);
        if let Some(v) = request.is_active {
            coupon.is_active = Set(v);
        }
        if let Some(v) = request.description_it {
            coupon.description_it = Set(Some(v));
        }
        if let Some(v) = request.description_en {
            coupon.description_en = Set(Some(v));
        }
        coupon.updated_at = Set(Utc::now());

        Ok(coupon.update(&self.pool).await?.into())
    }

    pub async fn delete_coupon(&self, id: Uuid) -> AppResult<()> {
        let result = coupon_entity::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Coupon {id} not found")));
        }
        Ok(())
    }

    /// Public check used by the booking form. Never consumes a use.
    pub async fn validate_coupon(
        &self,
        code: &str,
        nights: Option<i64>,
    ) -> AppResult<CouponValidationResponse> {
        let normalized = normalize_coupon_code(code);
        let coupon = find_coupon_by_code(&self.pool, &normalized)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Coupon {normalized} not found")))?;

        let today = Utc::now().date_naive();
        let nights = nights.unwrap_or_else(|| i64::from(coupon.min_nights));
        let verdict = check_coupon(&coupon, nights, today);

        Ok(CouponValidationResponse {
            valid: verdict.is_ok(),
            code: coupon.code,
            discount_type: Some(coupon.discount_type),
            discount_value: Some(coupon.discount_value),
            min_nights: Some(coupon.min_nights),
            description_it: coupon.description_it,
            description_en: coupon.description_en,
            message: verdict.err().map(|r| r.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{coupon, exec};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_request(code: &str, discount_type: DiscountType, value: Decimal) -> CreateCouponRequest {
        CreateCouponRequest {
            code: code.to_string(),
            discount_type,
            discount_value: value,
            min_nights: 1,
            max_uses: None,
            valid_from: None,
            valid_until: None,
            is_active: true,
            description_it: None,
            description_en: None,
        }
    }

    #[tokio::test]
    async fn test_create_uppercases_code() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<coupon_entity::Model>::new()])
            .append_query_results([vec![coupon("ESTATE10", DiscountType::Percentage, dec!(10))]])
            .into_connection();
        let service = CouponService::new(db);

        let created = service
            .create_coupon(create_request(" estate10 ", DiscountType::Percentage, dec!(10)))
            .await
            .unwrap();
        assert_eq!(created.code, "ESTATE10");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![coupon("ESTATE10", DiscountType::Fixed, dec!(20))]])
            .into_connection();
        let service = CouponService::new(db);

        let result = service
            .create_coupon(create_request("estate10", DiscountType::Fixed, dec!(20)))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_percentage_above_hundred_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = CouponService::new(db);
        let result = service
            .create_coupon(create_request("TROPPO", DiscountType::Percentage, dec!(150)))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_validate_reports_min_nights() {
        let mut c = coupon("SETTIMANA", DiscountType::Percentage, dec!(15));
        c.min_nights = 7;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![c]])
            .into_connection();
        let service = CouponService::new(db);

        let response = service.validate_coupon("settimana", Some(3)).await.unwrap();
        assert!(!response.valid);
        assert!(response.message.unwrap().contains('7'));
    }

    #[tokio::test]
    async fn test_redeem_reports_lost_race() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let id = Uuid::new_v4();
        assert!(redeem_coupon(&db, id).await.unwrap());
        assert!(!redeem_coupon(&db, id).await.unwrap());
    }
}
