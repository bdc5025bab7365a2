//! Advertisement entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A banner advertisement.
///
/// An ad is publicly shown only when it is both approved and visible.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "advertisement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    pub image_url: String,

    #[sea_orm(nullable)]
    pub link_url: Option<String>,

    /// Advertising vendor, if any.
    #[sea_orm(nullable)]
    pub vendor_id: Option<String>,

    pub is_approved: bool,

    pub is_visible: bool,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether the ad appears in the public "active ads" view.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_approved && self.is_visible
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
