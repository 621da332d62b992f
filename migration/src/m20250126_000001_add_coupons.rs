use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Bookings {
    Table,
    CouponCode,
    DiscountAmount,
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    DiscountType,
    DiscountValue,
    MinNights,
    MaxUses,
    UsesCount,
    ValidFrom,
    ValidUntil,
    IsActive,
    DescriptionIt,
    DescriptionEn,
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
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Coupons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Coupons::Code).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Coupons::DiscountType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Coupons::DiscountValue)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Coupons::MinNights).integer().not_null().default(1))
                    .col(ColumnDef::new(Coupons::MaxUses).integer().null())
                    .col(ColumnDef::new(Coupons::UsesCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Coupons::ValidFrom).date().null())
                    .col(ColumnDef::new(Coupons::ValidUntil).date().null())
                    .col(ColumnDef::new(Coupons::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Coupons::DescriptionIt).string().null())
                    .col(ColumnDef::new(Coupons::DescriptionEn).string().null())
                    .col(
                        ColumnDef::new(Coupons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Coupons::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .check(Expr::cust("max_uses IS NULL OR uses_count <= max_uses"))
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Bookings::Table)
                    .add_column(ColumnDef::new(Bookings::CouponCode).string_len(64).null())
                    .add_column(
                        ColumnDef::new(Bookings::DiscountAmount)
                            .decimal_len(10, 2)
                            .not_null()
                            .default(0),
                    )
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
                    .drop_column(Bookings::CouponCode)
                    .drop_column(Bookings::DiscountAmount)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Coupons::Table).to_owned())
            .await?;
        Ok(())
    }
}
