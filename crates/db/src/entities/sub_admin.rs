//! Sub-admin account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A restricted administrator whose actions are gated by capability flags.
///
/// Each `can_*` column gates exactly one action; no flag implies another.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sub_admin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub mobile: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Inactive sub-admins cannot sign in and fail every authorization.
    pub is_active: bool,

    pub can_view_users: bool,
    pub can_edit_users: bool,
    pub can_delete_users: bool,
    pub can_approve_users: bool,

    pub can_view_vendors: bool,
    pub can_edit_vendors: bool,
    pub can_delete_vendors: bool,
    pub can_approve_vendors: bool,

    pub can_view_leads: bool,
    pub can_edit_leads: bool,
    pub can_delete_leads: bool,
    pub can_approve_leads: bool,

    pub can_manage_content: bool,
    pub can_view_settings: bool,
    pub can_edit_settings: bool,

    /// Super-admin who created the account.
    pub created_by: String,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::super_admin::Entity",
        from = "Column::CreatedBy",
        to = "super::super_admin::Column::Id"
    )]
    Creator,
}

impl Related<super::super_admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
