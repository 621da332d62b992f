use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    Slug,
    NameIt,
    NameEn,
    DescriptionIt,
    DescriptionEn,
    PricePerNight,
    MaxGuests,
    Images,
    Amenities,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    RoomId,
    GuestEmail,
    GuestName,
    GuestPhone,
    CheckIn,
    CheckOut,
    NumGuests,
    TotalPrice,
    Status,
    PaymentStatus,
    StripeSessionId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BlockedDates {
    Table,
    Id,
    RoomId,
    Date,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentTransactions {
    Table,
    Id,
    BookingId,
    SessionId,
    Amount,
    Currency,
    Status,
    PaymentStatus,
    Metadata,
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
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rooms::Id).string_len(64).not_null().primary_key())
                    .col(ColumnDef::new(Rooms::Slug).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Rooms::NameIt).string().not_null())
                    .col(ColumnDef::new(Rooms::NameEn).string().not_null())
                    .col(ColumnDef::new(Rooms::DescriptionIt).text().not_null())
                    .col(ColumnDef::new(Rooms::DescriptionEn).text().not_null())
                    .col(
                        ColumnDef::new(Rooms::PricePerNight)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(80),
                    )
                    .col(ColumnDef::new(Rooms::MaxGuests).integer().not_null().default(3))
                    .col(
                        ColumnDef::new(Rooms::Images)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Rooms::Amenities)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::RoomId).string_len(64).not_null())
                    .col(ColumnDef::new(Bookings::GuestEmail).string().not_null())
                    .col(ColumnDef::new(Bookings::GuestName).string().not_null())
                    .col(ColumnDef::new(Bookings::GuestPhone).string_len(50).null())
                    .col(ColumnDef::new(Bookings::CheckIn).date().not_null())
                    .col(ColumnDef::new(Bookings::CheckOut).date().not_null())
                    .col(ColumnDef::new(Bookings::NumGuests).integer().not_null())
                    .col(ColumnDef::new(Bookings::TotalPrice).decimal_len(10, 2).not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::StripeSessionId)
                            .string_len(255)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::Notes).text().null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_room")
                            .from(Bookings::Table, Bookings::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookings_room_dates")
                    .table(Bookings::Table)
                    .col(Bookings::RoomId)
                    .col(Bookings::CheckIn)
                    .col(Bookings::CheckOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlockedDates::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BlockedDates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BlockedDates::RoomId).string_len(64).not_null())
                    .col(ColumnDef::new(BlockedDates::Date).date().not_null())
                    .col(ColumnDef::new(BlockedDates::Reason).string().null())
                    .col(
                        ColumnDef::new(BlockedDates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blocked_dates_room")
                            .from(BlockedDates::Table, BlockedDates::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // one block per room and day
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_blocked_dates_room_date")
                    .table(BlockedDates::Table)
                    .col(BlockedDates::RoomId)
                    .col(BlockedDates::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentTransactions::BookingId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentTransactions::SessionId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::Currency)
                            .string_len(10)
                            .not_null()
                            .default("eur"),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::Status)
                            .string_len(20)
                            .not_null()
                            .default("initiated"),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::PaymentStatus)
                            .string_len(50)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::Metadata)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_transactions_booking")
                            .from(PaymentTransactions::Table, PaymentTransactions::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payment_transactions_session")
                    .table(PaymentTransactions::Table)
                    .col(PaymentTransactions::SessionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(PaymentTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(BlockedDates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Rooms::Table).to_owned())
            .await?;
        Ok(())
    }
}
