//! Approval state machine shared by users, vendors and leads.
//!
//! ```text
//! pending ──► under_review ──► approved | rejected
//!    └───────────────────────────▲
//! ```
//!
//! `under_review` exists for vendors only. Each family differs in the
//! capability flags it checks and in whether the application gate applies;
//! see [`FamilyConfig`]. Planning a transition is pure: [`plan`] looks at the
//! current row and returns the columns to write, which the repository applies
//! in one version-guarded `UPDATE`.

use abcd_common::{AppError, AppResult};
use abcd_db::{
    entities::approvable_entity::{self, ApprovalStatus, EntityFamily},
    repositories::TransitionWrite,
};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::permission::Action;

/// Per-family configuration of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyConfig {
    pub family: EntityFamily,
    pub view: Action,
    pub edit: Action,
    pub delete: Action,
    pub approve: Action,
    pub supports_under_review: bool,
    /// Approve/reject require a submitted business application.
    pub has_application_gate: bool,
    /// Maintains the `is_verified` projection of `approved`.
    pub tracks_verification: bool,
}

const USER: FamilyConfig = FamilyConfig {
    family: EntityFamily::User,
    view: Action::ViewUsers,
    edit: Action::EditUsers,
    delete: Action::DeleteUsers,
    approve: Action::ApproveUsers,
    supports_under_review: false,
    has_application_gate: false,
    tracks_verification: false,
};

const VENDOR: FamilyConfig = FamilyConfig {
    family: EntityFamily::Vendor,
    view: Action::ViewVendors,
    edit: Action::EditVendors,
    delete: Action::DeleteVendors,
    approve: Action::ApproveVendors,
    supports_under_review: true,
    has_application_gate: true,
    tracks_verification: true,
};

const BUY_LEAD: FamilyConfig = FamilyConfig {
    family: EntityFamily::BuyLead,
    view: Action::ViewLeads,
    edit: Action::EditLeads,
    delete: Action::DeleteLeads,
    approve: Action::ApproveLeads,
    supports_under_review: false,
    has_application_gate: false,
    tracks_verification: false,
};

const SELL_LEAD: FamilyConfig = FamilyConfig {
    family: EntityFamily::SellLead,
    ..BUY_LEAD
};

impl FamilyConfig {
    /// Configuration for `family`.
    #[must_use]
    pub const fn of(family: EntityFamily) -> Self {
        match family {
            EntityFamily::User => USER,
            EntityFamily::Vendor => VENDOR,
            EntityFamily::BuyLead => BUY_LEAD,
            EntityFamily::SellLead => SELL_LEAD,
        }
    }
}

/// An administrative review requested on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject { reason: String },
    MarkUnderReview,
}

impl Transition {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
            Self::MarkUnderReview => "mark_under_review",
        }
    }
}

/// Outcome of planning a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// The entity is already in the requested state; nothing is written.
    NoOp,
    Apply(TransitionWrite),
}

/// Plan `transition` on `entity`, reviewed by `reviewer` at `now`.
///
/// Validation failures leave the entity untouched. Rules:
/// - a reject reason must contain non-whitespace text and is stored trimmed;
/// - approve and reject on a gated family need a submitted application;
/// - approving an approved entity is a no-op, so `reviewed_at` is not
///   refreshed;
/// - a later approval keeps the previous `rejection_reason`;
/// - `reviewed_at` is written on every terminal transition;
/// - `is_verified` follows `status == approved` for vendors.
pub fn plan(
    entity: &approvable_entity::Model,
    transition: &Transition,
    reviewer: &str,
    now: DateTimeWithTimeZone,
) -> AppResult<Plan> {
    let config = FamilyConfig::of(entity.family);
    let label = entity.family.label();

    if let Transition::Reject { reason } = transition {
        if reason.trim().is_empty() {
            return Err(AppError::Validation("rejectionReason required".to_string()));
        }
    }

    if config.has_application_gate && !entity.is_business_application_submitted {
        return Err(AppError::Validation(format!(
            "This {label} has not submitted a business application yet"
        )));
    }

    let verified = |value: bool| config.tracks_verification.then_some(value);

    let write = match transition {
        Transition::Approve => {
            if entity.status == ApprovalStatus::Approved {
                return Ok(Plan::NoOp);
            }
            TransitionWrite {
                status: ApprovalStatus::Approved,
                rejection_reason: None,
                reviewed_at: Some(now),
                reviewed_by: Some(reviewer.to_string()),
                is_verified: verified(true),
            }
        }
        Transition::Reject { reason } => TransitionWrite {
            status: ApprovalStatus::Rejected,
            rejection_reason: Some(reason.trim().to_string()),
            reviewed_at: Some(now),
            reviewed_by: Some(reviewer.to_string()),
            is_verified: verified(false),
        },
        Transition::MarkUnderReview => {
            if !config.supports_under_review {
                return Err(AppError::Validation(format!(
                    "A {label} cannot be put under review"
                )));
            }
            match entity.status {
                ApprovalStatus::UnderReview => return Ok(Plan::NoOp),
                ApprovalStatus::Pending => TransitionWrite {
                    status: ApprovalStatus::UnderReview,
                    rejection_reason: None,
                    reviewed_at: None,
                    reviewed_by: Some(reviewer.to_string()),
                    is_verified: verified(false),
                },
                ApprovalStatus::Approved | ApprovalStatus::Rejected => {
                    return Err(AppError::Validation(format!(
                        "Only a pending {label} can be put under review"
                    )));
                }
            }
        }
    };

    Ok(Plan::Apply(write))
}
