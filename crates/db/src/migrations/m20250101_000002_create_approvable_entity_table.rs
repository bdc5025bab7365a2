//! Create the shared approvable entity table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApprovableEntity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApprovableEntity::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApprovableEntity::Family).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ApprovableEntity::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ApprovableEntity::RejectionReason).text())
                    .col(ColumnDef::new(ApprovableEntity::AdminComments).text())
                    .col(
                        ColumnDef::new(ApprovableEntity::IsBusinessApplicationSubmitted)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ApprovableEntity::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ApprovableEntity::Payload)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(ApprovableEntity::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(ApprovableEntity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(ApprovableEntity::ReviewedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ApprovableEntity::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(ApprovableEntity::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // A rejected row always carries a non-empty reason
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE approvable_entity ADD CONSTRAINT chk_rejection_reason \
                 CHECK (status <> 'rejected' OR \
                 (rejection_reason IS NOT NULL AND length(trim(rejection_reason)) > 0))",
            )
            .await?;

        // A verified vendor is always approved
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE approvable_entity ADD CONSTRAINT chk_verified_approved \
                 CHECK (NOT is_verified OR status = 'approved')",
            )
            .await?;

        // Index: (family, created_at) for listing one family
        manager
            .create_index(
                Index::create()
                    .name("idx_approvable_entity_family_created_at")
                    .table(ApprovableEntity::Table)
                    .col(ApprovableEntity::Family)
                    .col(ApprovableEntity::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (family, status) for status filters
        manager
            .create_index(
                Index::create()
                    .name("idx_approvable_entity_family_status")
                    .table(ApprovableEntity::Table)
                    .col(ApprovableEntity::Family)
                    .col(ApprovableEntity::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApprovableEntity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ApprovableEntity {
    Table,
    Id,
    Family,
    Status,
    RejectionReason,
    AdminComments,
    IsBusinessApplicationSubmitted,
    IsVerified,
    Payload,
    Version,
    CreatedAt,
    ReviewedAt,
    ReviewedBy,
    UpdatedAt,
}
