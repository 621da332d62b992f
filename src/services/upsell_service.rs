use crate::entities::upsell_entity;
use crate::error::{AppError, AppResult};
use crate::models::{CreateUpsellRequest, UpdateUpsellRequest, UpsellResponse};
use crate::services::map_unique_violation;
use crate::utils::require_non_empty;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct UpsellService {
    pool: DatabaseConnection,
}

fn validate_amounts(price: Decimal, min_nights: i32) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "price cannot be negative".to_string(),
        ));
    }
    if min_nights < 0 {
        return Err(AppError::ValidationError(
            "min_nights cannot be negative".to_string(),
        ));
    }
    Ok(())
}

impl UpsellService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_upsells(&self, active_only: bool) -> AppResult<Vec<UpsellResponse>> {
        let mut query = upsell_entity::Entity::find();
        if active_only {
            query = query.filter(upsell_entity::Column::IsActive.eq(true));
        }
        let upsells = query
            .order_by_asc(upsell_entity::Column::Order)
            .order_by_asc(upsell_entity::Column::Slug)
            .all(&self.pool)
            .await?;
        Ok(upsells.into_iter().map(Into::into).collect())
    }

    pub async fn create_upsell(&self, request: CreateUpsellRequest) -> AppResult<UpsellResponse> {
        let slug = request.slug.trim().to_lowercase();
        require_non_empty("slug", &slug)?;
        require_non_empty("title_it", &request.title_it)?;
        require_non_empty("title_en", &request.title_en)?;
        validate_amounts(request.price, request.min_nights)?;

        self.ensure_slug_free(&slug, None).await?;

        let now = Utc::now();
        let upsell = upsell_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(slug.clone()),
            title_it: Set(request.title_it),
            title_en: Set(request.title_en),
            description_it: Set(request.description_it),
            description_en: Set(request.description_en),
            price: Set(request.price),
            min_nights: Set(request.min_nights),
            is_active: Set(request.is_active),
            order: Set(request.order),
            icon: Set(request.icon.unwrap_or_else(|| "gift".to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Upsell slug '{slug}' already exists")))?;

        log::info!("Upsell {} created", upsell.slug);
        Ok(upsell.into())
    }

    pub async fn update_upsell(
        &self,
        id: Uuid,
        request: UpdateUpsellRequest,
    ) -> AppResult<UpsellResponse> {
        let current = upsell_entity::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Upsell {id} not found")))?;

        validate_amounts(
            request.price.unwrap_or(current.price),
            request.min_nights.unwrap_or(current.min_nights),
        )?;

        let mut upsell = current.into_active_model();
        if let Some(slug) = request.slug {
            let slug = slug.trim().to_lowercase();
            require_non_empty("slug", &slug)?;
            self.ensure_slug_free(&slug, Some(id)).await?;
            upsell.slug = Set(slug);
        }
        if let Some(v) = request.title_it {
            upsell.title_it = Set(v);
        }
        if let Some(v) = request.title_en {
            upsell.title_en = Set(v);
        }
        if let Some(v) = request.description_it {
            upsell.description_it = Set(v);
        }
        if let Some(v) = request.description_en {
            upsell.description_en = Set(v);
        }
        if let Some(v) = request.price {
            upsell.price = Set(v);
        }
        if let Some(v) = request.min_nights {
            upsell.min_nights = Set(v);
        }
        if let Some(v) = request.is_active {
            upsell.is_active = Set(v);
        }
        if let Some(v) = request.order {
            upsell.order = Set(v);
        }
        if let Some(v) = request.icon {
            upsell.icon = Set(v);
        }
        upsell.updated_at = Set(Utc::now());

        let updated = upsell
            .update(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Upsell slug already exists"))?;
        Ok(updated.into())
    }

    pub async fn delete_upsell(&self, id: Uuid) -> AppResult<()> {
        let result = upsell_entity::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Upsell {id} not found")));
        }
        log::info!("Upsell {id} deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, except: Option<Uuid>) -> AppResult<()> {
        let mut query =
            upsell_entity::Entity::find().filter(upsell_entity::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(upsell_entity::Column::Id.ne(id));
        }
        if query.one(&self.pool).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Upsell slug '{slug}' already exists"
            )));
        }
        Ok(())
    }
}
