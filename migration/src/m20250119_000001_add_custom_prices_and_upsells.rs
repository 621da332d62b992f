use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    RoomPrice,
    UpsellsTotal,
    UpsellIds,
    StayReason,
}

#[derive(DeriveIden)]
enum CustomPrices {
    Table,
    Id,
    RoomId,
    Date,
    Price,
    Reason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Upsells {
    Table,
    Id,
    Slug,
    TitleIt,
    TitleEn,
    DescriptionIt,
    DescriptionEn,
    Price,
    MinNights,
    IsActive,
    Order,
    Icon,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomPrices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CustomPrices::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CustomPrices::RoomId).string_len(64).not_null())
                    .col(ColumnDef::new(CustomPrices::Date).date().not_null())
                    .col(ColumnDef::new(CustomPrices::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(CustomPrices::Reason).string().null())
                    .col(
                        ColumnDef::new(CustomPrices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(CustomPrices::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_custom_prices_room")
                            .from(CustomPrices::Table, CustomPrices::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // upsert target for bulk price updates
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_custom_prices_room_date")
                    .table(CustomPrices::Table)
                    .col(CustomPrices::RoomId)
                    .col(CustomPrices::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Upsells::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Upsells::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Upsells::Slug).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Upsells::TitleIt).string().not_null())
                    .col(ColumnDef::new(Upsells::TitleEn).string().not_null())
                    .col(ColumnDef::new(Upsells::DescriptionIt).text().not_null())
                    .col(ColumnDef::new(Upsells::DescriptionEn).text().not_null())
                    .col(ColumnDef::new(Upsells::Price).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Upsells::MinNights).integer().not_null().default(0))
                    .col(ColumnDef::new(Upsells::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Upsells::Order).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Upsells::Icon)
                            .string_len(50)
                            .not_null()
                            .default("gift"),
                    )
                    .col(
                        ColumnDef::new(Upsells::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Upsells::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Bookings::Table)
                    .add_column(
                        ColumnDef::new(Bookings::RoomPrice)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .add_column(
                        ColumnDef::new(Bookings::UpsellsTotal)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
                    .add_column(
                        ColumnDef::new(Bookings::UpsellIds)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .add_column(ColumnDef::new(Bookings::StayReason).string_len(50).null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Bookings::Table)
                    .drop_column(Bookings::RoomPrice)
                    .drop_column(Bookings::UpsellsTotal)
                    .drop_column(Bookings::UpsellIds)
                    .drop_column(Bookings::StayReason)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Upsells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(CustomPrices::Table).to_owned())
            .await?;
        Ok(())
    }
}
