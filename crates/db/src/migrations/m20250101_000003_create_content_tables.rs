//! Create category, city and advertisement tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Category::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Category::Name).string_len(128).not_null().unique_key())
                    .col(ColumnDef::new(Category::Description).text())
                    .col(ColumnDef::new(Category::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Category::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(City::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(City::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(City::Name).string_len(128).not_null())
                    .col(ColumnDef::new(City::State).string_len(128).not_null())
                    .col(ColumnDef::new(City::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(City::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (name, state)
        manager
            .create_index(
                Index::create()
                    .name("idx_city_name_state")
                    .table(City::Table)
                    .col(City::Name)
                    .col(City::State)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Advertisement::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Advertisement::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Advertisement::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Advertisement::ImageUrl).string_len(1024).not_null())
                    .col(ColumnDef::new(Advertisement::LinkUrl).string_len(1024))
                    .col(ColumnDef::new(Advertisement::VendorId).string_len(32))
                    .col(
                        ColumnDef::new(Advertisement::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Advertisement::IsVisible)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Advertisement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Advertisement::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(City::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum City {
    Table,
    Id,
    Name,
    State,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Advertisement {
    Table,
    Id,
    Title,
    ImageUrl,
    LinkUrl,
    VendorId,
    IsApproved,
    IsVisible,
    CreatedAt,
}
