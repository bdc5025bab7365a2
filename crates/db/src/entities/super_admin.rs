//! Super-admin account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Unrestricted administrator, stored apart from sub-admins.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "super_admin")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sub_admin::Entity")]
    SubAdmin,
}

impl Related<super::sub_admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubAdmin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
