//! Approvable entity: user registrations, vendor accounts and buy/sell leads.
//!
//! All four families share the same lifecycle columns. Family-specific
//! details live in the typed JSON `payload`, which the approval logic carries
//! but never interprets.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entity family an approvable row belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "vendor")]
    Vendor,
    #[sea_orm(string_value = "buy_lead")]
    BuyLead,
    #[sea_orm(string_value = "sell_lead")]
    SellLead,
}

impl EntityFamily {
    /// Every family, in display order.
    pub const ALL: [Self; 4] = [Self::User, Self::Vendor, Self::BuyLead, Self::SellLead];

    /// Lowercase label used in logs and messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Vendor => "vendor",
            Self::BuyLead => "buy lead",
            Self::SellLead => "sell lead",
        }
    }
}

/// Lifecycle status of an approvable entity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ApprovalStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "under_review" => Some(Self::UnderReview),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether the status is `approved` or `rejected`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// An entity moving through the approval workflow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "approvable_entity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub family: EntityFamily,

    pub status: ApprovalStatus,

    /// Set when the entity is rejected; kept after a later approval.
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub admin_comments: Option<String>,

    /// Vendor application gate. Always `true` for the other families.
    pub is_business_application_submitted: bool,

    /// Vendor "approved" projection. Always `false` for the other families.
    pub is_verified: bool,

    /// Family-specific details (registration, business, lead).
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: Json,

    /// Optimistic concurrency counter, bumped by every write.
    pub version: i32,

    pub created_at: DateTimeWithTimeZone,

    /// First set when the entity reaches a terminal status; never cleared.
    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeWithTimeZone>,

    /// ID of the admin or sub-admin who last reviewed the entity.
    #[sea_orm(nullable)]
    pub reviewed_by: Option<String>,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Model {
    /// Whether a vendor may (re)submit its business application: only before
    /// the first submission, or after a rejection.
    #[must_use]
    pub fn accepts_application(&self) -> bool {
        !self.is_business_application_submitted || self.status == ApprovalStatus::Rejected
    }
}

impl ActiveModelBehavior for ActiveModel {}
