//! Create the platform settings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlatformSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlatformSettings::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlatformSettings::SiteName).string_len(256).not_null())
                    .col(ColumnDef::new(PlatformSettings::SupportEmail).string_len(256))
                    .col(ColumnDef::new(PlatformSettings::SupportPhone).string_len(32))
                    .col(
                        ColumnDef::new(PlatformSettings::RegistrationFee)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlatformSettings::VendorRegistrationOpen)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PlatformSettings::LeadPostingOpen)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PlatformSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlatformSettings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PlatformSettings {
    Table,
    Id,
    SiteName,
    SupportEmail,
    SupportPhone,
    RegistrationFee,
    VendorRegistrationOpen,
    LeadPostingOpen,
    UpdatedAt,
}
