pub use sea_orm_migration::prelude::*;

mod m20250105_000001_create_rooms_and_bookings;
mod m20250119_000001_add_custom_prices_and_upsells;
mod m20250126_000001_add_coupons;
mod m20250202_000001_add_reviews_contact_settings;
mod m20250216_000001_add_admin_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250105_000001_create_rooms_and_bookings::Migration),
            Box::new(m20250119_000001_add_custom_prices_and_upsells::Migration),
            Box::new(m20250126_000001_add_coupons::Migration),
            Box::new(m20250202_000001_add_reviews_contact_settings::Migration),
            Box::new(m20250216_000001_add_admin_sessions::Migration),
        ]
    }
}
