//! Platform settings entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed ID of the singleton settings row.
pub const PLATFORM_SETTINGS_ID: &str = "platform";

/// Platform-wide settings edited from the admin console.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platform_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub site_name: String,

    #[sea_orm(nullable)]
    pub support_email: Option<String>,

    #[sea_orm(nullable)]
    pub support_phone: Option<String>,

    /// Membership fee in the smallest currency unit.
    pub registration_fee: i64,

    /// Whether the public vendor registration form is open.
    pub vendor_registration_open: bool,

    /// Whether the public lead forms are open.
    pub lead_posting_open: bool,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
