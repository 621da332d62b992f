use crate::entities::room_entity;
use crate::error::{AppError, AppResult};
use crate::models::{RoomResponse, UpdateRoomRequest};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryOrder, Set,
};
use serde_json::json;

#[derive(Clone)]
pub struct RoomService {
    pool: DatabaseConnection,
}

pub async fn find_room<C: ConnectionTrait>(db: &C, room_id: &str) -> AppResult<room_entity::Model> {
    room_entity::Entity::find_by_id(room_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {room_id} not found")))
}

impl RoomService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_rooms(&self) -> AppResult<Vec<RoomResponse>> {
        let rooms = room_entity::Entity::find()
            .order_by_asc(room_entity::Column::CreatedAt)
            .order_by_asc(room_entity::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rooms.into_iter().map(RoomResponse::from).collect())
    }

    pub async fn get_room(&self, room_id: &str) -> AppResult<RoomResponse> {
        Ok(find_room(&self.pool, room_id).await?.into())
    }

    pub async fn update_room(
        &self,
        room_id: &str,
        request: UpdateRoomRequest,
    ) -> AppResult<RoomResponse> {
        if let Some(price) = request.price_per_night
            && price <= Decimal::ZERO
        {
            return Err(AppError::ValidationError(
                "price_per_night must be greater than zero".to_string(),
            ));
        }
        if let Some(max_guests) = request.max_guests
            && max_guests < 1
        {
            return Err(AppError::ValidationError(
                "max_guests must be at least 1".to_string(),
            ));
        }

        let mut room = find_room(&self.pool, room_id).await?.into_active_model();
        if let Some(v) = request.name_it {
            room.name_it = Set(v);
        }
        if let Some(v) = request.name_en {
            room.name_en = Set(v);
        }
        if let Some(v) = request.description_it {
            room.description_it = Set(v);
        }
        if let Some(v) = request.description_en {
            room.description_en = Set(v);
        }
        if let Some(v) = request.price_per_night {
            room.price_per_night = Set(v);
        }
        if let Some(v) = request.max_guests {
            room.max_guests = Set(v);
        }
        if let Some(v) = request.images {
            room.images = Set(json!(v));
        }
        if let Some(v) = request.amenities {
            room.amenities = Set(json!(v));
        }
        room.updated_at = Set(Utc::now());

        let updated = room.update(&self.pool).await?;
        log::info!("Room {room_id} updated");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::room;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_room_sorts_images() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("nonna", dec!(80))]])
            .into_connection();
        let service = RoomService::new(db);

        let room = service.get_room("nonna").await.unwrap();
        assert_eq!(room.images[0].id, "a");
        assert_eq!(room.amenities, vec!["wifi", "ac"]);
    }

    #[tokio::test]
    async fn test_get_unknown_room() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<room_entity::Model>::new()])
            .into_connection();
        let service = RoomService::new(db);

        assert!(matches!(
            service.get_room("soffitta").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_non_positive_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = RoomService::new(db);
        let request = UpdateRoomRequest {
            price_per_night: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            service.update_room("nonna", request).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_room_price() {
        let mut updated = room("pozzo", dec!(80));
        updated.price_per_night = dec!(95);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![room("pozzo", dec!(80))], vec![updated]])
            .into_connection();
        let service = RoomService::new(db);
        let request = UpdateRoomRequest {
            price_per_night: Some(dec!(95)),
            ..Default::default()
        };

        let room = service.update_room("pozzo", request).await.unwrap();
        assert_eq!(room.price_per_night, dec!(95));
    }
}
