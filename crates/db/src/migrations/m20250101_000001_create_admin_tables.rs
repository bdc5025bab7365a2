//! Create super-admin, sub-admin and admin session tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SuperAdmin::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SuperAdmin::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(SuperAdmin::Email).string_len(256).not_null().unique_key())
                    .col(ColumnDef::new(SuperAdmin::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(SuperAdmin::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(SuperAdmin::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        let mut sub_admin = Table::create();
        sub_admin
            .table(SubAdmin::Table)
            .if_not_exists()
            .col(ColumnDef::new(SubAdmin::Id).string_len(32).not_null().primary_key())
            .col(ColumnDef::new(SubAdmin::FullName).string_len(256).not_null())
            .col(ColumnDef::new(SubAdmin::Email).string_len(256).not_null().unique_key())
            .col(ColumnDef::new(SubAdmin::Mobile).string_len(32).not_null())
            .col(ColumnDef::new(SubAdmin::PasswordHash).string_len(256).not_null())
            .col(ColumnDef::new(SubAdmin::IsActive).boolean().not_null().default(true));

        // One boolean column per capability flag, all off by default
        for flag in SubAdmin::FLAGS {
            sub_admin.col(ColumnDef::new(flag).boolean().not_null().default(false));
        }

        sub_admin
            .col(ColumnDef::new(SubAdmin::CreatedBy).string_len(32).not_null())
            .col(ColumnDef::new(SubAdmin::LastLogin).timestamp_with_time_zone())
            .col(
                ColumnDef::new(SubAdmin::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(ColumnDef::new(SubAdmin::UpdatedAt).timestamp_with_time_zone())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_sub_admin_created_by")
                    .from(SubAdmin::Table, SubAdmin::CreatedBy)
                    .to(SuperAdmin::Table, SuperAdmin::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );

        manager.create_table(sub_admin.to_owned()).await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminSession::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminSession::Token)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminSession::ActorKind).string_len(16).not_null())
                    .col(ColumnDef::new(AdminSession::ActorId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(AdminSession::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminSession::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (actor_kind, actor_id) for revoking all sessions of an account
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_session_actor")
                    .table(AdminSession::Table)
                    .col(AdminSession::ActorKind)
                    .col(AdminSession::ActorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminSession::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubAdmin::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SuperAdmin::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SuperAdmin {
    Table,
    Id,
    Email,
    PasswordHash,
    LastLogin,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
enum SubAdmin {
    Table,
    Id,
    FullName,
    Email,
    Mobile,
    PasswordHash,
    IsActive,
    CanViewUsers,
    CanEditUsers,
    CanDeleteUsers,
    CanApproveUsers,
    CanViewVendors,
    CanEditVendors,
    CanDeleteVendors,
    CanApproveVendors,
    CanViewLeads,
    CanEditLeads,
    CanDeleteLeads,
    CanApproveLeads,
    CanManageContent,
    CanViewSettings,
    CanEditSettings,
    CreatedBy,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

impl SubAdmin {
    const FLAGS: [Self; 15] = [
        Self::CanViewUsers,
        Self::CanEditUsers,
        Self::CanDeleteUsers,
        Self::CanApproveUsers,
        Self::CanViewVendors,
        Self::CanEditVendors,
        Self::CanDeleteVendors,
        Self::CanApproveVendors,
        Self::CanViewLeads,
        Self::CanEditLeads,
        Self::CanDeleteLeads,
        Self::CanApproveLeads,
        Self::CanManageContent,
        Self::CanViewSettings,
        Self::CanEditSettings,
    ];
}

#[derive(Iden)]
enum AdminSession {
    Table,
    Token,
    ActorKind,
    ActorId,
    CreatedAt,
    ExpiresAt,
}
