use crate::entities::{room_entity, settings_entity, upsell_entity};
use crate::error::AppResult;
use crate::models::RoomImage;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set,
};
use serde_json::json;
use uuid::Uuid;

const AMENITIES: [&str; 6] = ["wifi", "ac", "kitchen", "tv", "bathroom", "breakfast"];

fn image(id: &str, url: &str, alt_it: &str, alt_en: &str, order: i32) -> RoomImage {
    RoomImage {
        id: id.to_string(),
        url: url.to_string(),
        alt_it: alt_it.to_string(),
        alt_en: alt_en.to_string(),
        order,
    }
}

fn default_rooms() -> Vec<room_entity::ActiveModel> {
    let now = Utc::now();
    let room = |id: &str,
                slug: &str,
                names: (&str, &str),
                descriptions: (&str, &str),
                images: Vec<RoomImage>| room_entity::ActiveModel {
        id: Set(id.to_string()),
        slug: Set(slug.to_string()),
        name_it: Set(names.0.to_string()),
        name_en: Set(names.1.to_string()),
        description_it: Set(descriptions.0.to_string()),
        description_en: Set(descriptions.1.to_string()),
        price_per_night: Set(Decimal::from(80)),
        max_guests: Set(3),
        images: Set(json!(images)),
        amenities: Set(json!(AMENITIES)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    vec![
        room(
            "nonna",
            "stanza-della-nonna",
            ("Stanza della Nonna", "Grandmother's Room"),
            (
                "Un rifugio intimo che celebra la tradizione pugliese. Pareti in pietra locale, arredi d'epoca restaurati e tessuti pregiati creano un'atmosfera di calore autentico.",
                "An intimate retreat celebrating Apulian tradition. Local stone walls, restored antique furnishings and fine fabrics create an atmosphere of authentic warmth.",
            ),
            vec![
                image(
                    "nonna-1",
                    "https://images.unsplash.com/photo-1730322011993-592266c14831?w=1200",
                    "Camera con pareti in pietra",
                    "Room with stone walls",
                    0,
                ),
                image(
                    "nonna-2",
                    "https://images.unsplash.com/photo-1522771739844-6a9f6d5f14af?w=800",
                    "Letto matrimoniale",
                    "Double bed",
                    1,
                ),
                image(
                    "nonna-3",
                    "https://images.unsplash.com/photo-1584622650111-993a426fbf0a?w=800",
                    "Bagno privato",
                    "Private bathroom",
                    2,
                ),
            ],
        ),
        room(
            "pozzo",
            "stanza-del-pozzo",
            ("Stanza del Pozzo", "Well Room"),
            (
                "Un'oasi di pace dove storia e comfort si incontrano. Soffitti a volta, pietra a vista e un design contemporaneo si fondono in un equilibrio perfetto.",
                "An oasis of peace where history and comfort meet. Vaulted ceilings, exposed stone and contemporary design blend in perfect balance.",
            ),
            vec![
                image(
                    "pozzo-1",
                    "https://images.unsplash.com/photo-1730322046135-a754d71b7ec0?w=1200",
                    "Camera rustica di lusso",
                    "Rustic luxury room",
                    0,
                ),
                image(
                    "pozzo-2",
                    "https://images.unsplash.com/photo-1560185007-cde436f6a4d0?w=800",
                    "Zona soggiorno",
                    "Living area",
                    1,
                ),
                image(
                    "pozzo-3",
                    "https://images.unsplash.com/photo-1552321554-5fefe8c9ef14?w=800",
                    "Cucina attrezzata",
                    "Equipped kitchen",
                    2,
                ),
            ],
        ),
    ]
}

fn default_upsells() -> Vec<upsell_entity::ActiveModel> {
    let now = Utc::now();
    let upsell = |slug: &str,
                  titles: (&str, &str),
                  descriptions: (&str, &str),
                  price: i64,
                  min_nights: i32,
                  order: i32,
                  icon: &str| upsell_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        slug: Set(slug.to_string()),
        title_it: Set(titles.0.to_string()),
        title_en: Set(titles.1.to_string()),
        description_it: Set(descriptions.0.to_string()),
        description_en: Set(descriptions.1.to_string()),
        price: Set(Decimal::from(price)),
        min_nights: Set(min_nights),
        is_active: Set(true),
        order: Set(order),
        icon: Set(icon.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    vec![
        upsell(
            "cena-tipica",
            ("Cena tipica pugliese", "Traditional Apulian dinner"),
            (
                "Cena per due con prodotti locali",
                "Dinner for two with local produce",
            ),
            45,
            0,
            0,
            "utensils",
        ),
        upsell(
            "transfer-aeroporto",
            ("Transfer aeroporto", "Airport transfer"),
            ("Da e per l'aeroporto di Bari", "To and from Bari airport"),
            60,
            0,
            1,
            "car",
        ),
        upsell(
            "late-checkout",
            ("Late check-out", "Late check-out"),
            ("Partenza fino alle 14:00", "Departure until 2 pm"),
            20,
            0,
            2,
            "clock",
        ),
        upsell(
            "pulizia-extra",
            ("Pulizia infrasettimanale", "Mid-stay cleaning"),
            (
                "Cambio biancheria e pulizia a metà soggiorno",
                "Fresh linen and cleaning halfway through the stay",
            ),
            40,
            7,
            3,
            "sparkles",
        ),
    ]
}

/// Inserts the room catalog, the upsell catalog and the settings row when
/// they are missing. Safe to run on every startup.
pub async fn seed_defaults<C: ConnectionTrait>(db: &C) -> AppResult<()> {
    if room_entity::Entity::find().count(db).await? == 0 {
        room_entity::Entity::insert_many(default_rooms())
            .exec_without_returning(db)
            .await?;
        log::info!("Default rooms initialized");
    }

    if upsell_entity::Entity::find().count(db).await? == 0 {
        upsell_entity::Entity::insert_many(default_upsells())
            .exec_without_returning(db)
            .await?;
        log::info!("Default upsells initialized");
    }

    if settings_entity::Entity::find_by_id(settings_entity::SETTINGS_ID)
        .one(db)
        .await?
        .is_none()
    {
        settings_entity::ActiveModel {
            id: Set(settings_entity::SETTINGS_ID.to_string()),
            min_nights: Set(1),
            check_in_time: Set("13:00".to_string()),
            check_out_time: Set("10:30".to_string()),
            contact_email: Set(None),
            contact_phone: Set(None),
            updated_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
        log::info!("Default settings initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let rooms = default_rooms();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id.clone().unwrap(), "nonna");
        assert_eq!(rooms[1].id.clone().unwrap(), "pozzo");

        let upsells = default_upsells();
        let cleaning = upsells
            .iter()
            .find(|u| u.slug.clone().unwrap() == "pulizia-extra")
            .unwrap();
        assert_eq!(cleaning.min_nights.clone().unwrap(), 7);
    }
}
