//! Actor and permission model.
//!
//! Authorization is a pure function of the acting [`Actor`] and the requested
//! [`Action`]. Super-admins are exempt from every check; sub-admins need the
//! single capability flag the action maps to, and must be active.

use abcd_common::{AppError, AppResult};
use abcd_db::entities::sub_admin;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// An action that requires authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewUsers,
    EditUsers,
    DeleteUsers,
    ApproveUsers,
    ViewVendors,
    EditVendors,
    DeleteVendors,
    ApproveVendors,
    ViewLeads,
    EditLeads,
    DeleteLeads,
    ApproveLeads,
    ManageContent,
    ViewSettings,
    EditSettings,
    /// Creating and editing sub-admin accounts. No flag grants this.
    ManageSubAdmins,
}

impl Action {
    /// Short name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewUsers => "view_users",
            Self::EditUsers => "edit_users",
            Self::DeleteUsers => "delete_users",
            Self::ApproveUsers => "approve_users",
            Self::ViewVendors => "view_vendors",
            Self::EditVendors => "edit_vendors",
            Self::DeleteVendors => "delete_vendors",
            Self::ApproveVendors => "approve_vendors",
            Self::ViewLeads => "view_leads",
            Self::EditLeads => "edit_leads",
            Self::DeleteLeads => "delete_leads",
            Self::ApproveLeads => "approve_leads",
            Self::ManageContent => "manage_content",
            Self::ViewSettings => "view_settings",
            Self::EditSettings => "edit_settings",
            Self::ManageSubAdmins => "manage_sub_admins",
        }
    }
}

/// Capability flags of a sub-admin.
///
/// Every flag is independent. [`Permissions::all`] and [`Permissions::none`]
/// only fill a draft record; there is no runtime wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
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
}

impl Permissions {
    /// Every flag set.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            can_view_users: true,
            can_edit_users: true,
            can_delete_users: true,
            can_approve_users: true,
            can_view_vendors: true,
            can_edit_vendors: true,
            can_delete_vendors: true,
            can_approve_vendors: true,
            can_view_leads: true,
            can_edit_leads: true,
            can_delete_leads: true,
            can_approve_leads: true,
            can_manage_content: true,
            can_view_settings: true,
            can_edit_settings: true,
        }
    }

    /// No flag set.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            can_view_users: false,
            can_edit_users: false,
            can_delete_users: false,
            can_approve_users: false,
            can_view_vendors: false,
            can_edit_vendors: false,
            can_delete_vendors: false,
            can_approve_vendors: false,
            can_view_leads: false,
            can_edit_leads: false,
            can_delete_leads: false,
            can_approve_leads: false,
            can_manage_content: false,
            can_view_settings: false,
            can_edit_settings: false,
        }
    }

    /// Whether the flag mapped to `action` is set.
    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::ViewUsers => self.can_view_users,
            Action::EditUsers => self.can_edit_users,
            Action::DeleteUsers => self.can_delete_users,
            Action::ApproveUsers => self.can_approve_users,
            Action::ViewVendors => self.can_view_vendors,
            Action::EditVendors => self.can_edit_vendors,
            Action::DeleteVendors => self.can_delete_vendors,
            Action::ApproveVendors => self.can_approve_vendors,
            Action::ViewLeads => self.can_view_leads,
            Action::EditLeads => self.can_edit_leads,
            Action::DeleteLeads => self.can_delete_leads,
            Action::ApproveLeads => self.can_approve_leads,
            Action::ManageContent => self.can_manage_content,
            Action::ViewSettings => self.can_view_settings,
            Action::EditSettings => self.can_edit_settings,
            Action::ManageSubAdmins => false,
        }
    }

    /// Copy the flags onto a sub-admin row.
    pub fn write_to(&self, model: &mut sub_admin::ActiveModel) {
        model.can_view_users = Set(self.can_view_users);
        model.can_edit_users = Set(self.can_edit_users);
        model.can_delete_users = Set(self.can_delete_users);
        model.can_approve_users = Set(self.can_approve_users);
        model.can_view_vendors = Set(self.can_view_vendors);
        model.can_edit_vendors = Set(self.can_edit_vendors);
        model.can_delete_vendors = Set(self.can_delete_vendors);
        model.can_approve_vendors = Set(self.can_approve_vendors);
        model.can_view_leads = Set(self.can_view_leads);
        model.can_edit_leads = Set(self.can_edit_leads);
        model.can_delete_leads = Set(self.can_delete_leads);
        model.can_approve_leads = Set(self.can_approve_leads);
        model.can_manage_content = Set(self.can_manage_content);
        model.can_view_settings = Set(self.can_view_settings);
        model.can_edit_settings = Set(self.can_edit_settings);
    }
}

impl From<&sub_admin::Model> for Permissions {
    fn from(m: &sub_admin::Model) -> Self {
        Self {
            can_view_users: m.can_view_users,
            can_edit_users: m.can_edit_users,
            can_delete_users: m.can_delete_users,
            can_approve_users: m.can_approve_users,
            can_view_vendors: m.can_view_vendors,
            can_edit_vendors: m.can_edit_vendors,
            can_delete_vendors: m.can_delete_vendors,
            can_approve_vendors: m.can_approve_vendors,
            can_view_leads: m.can_view_leads,
            can_edit_leads: m.can_edit_leads,
            can_delete_leads: m.can_delete_leads,
            can_approve_leads: m.can_approve_leads,
            can_manage_content: m.can_manage_content,
            can_view_settings: m.can_view_settings,
            can_edit_settings: m.can_edit_settings,
        }
    }
}

/// The authenticated party performing an action.
///
/// Always derived server-side from the session, never from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    SuperAdmin {
        id: String,
        email: String,
    },
    SubAdmin {
        id: String,
        full_name: String,
        email: String,
        is_active: bool,
        permissions: Permissions,
    },
}

impl Actor {
    /// Account ID of the actor.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::SuperAdmin { id, .. } | Self::SubAdmin { id, .. } => id,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::SuperAdmin { email, .. } | Self::SubAdmin { email, .. } => email,
        }
    }

    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin { .. })
    }

    /// Role name used in logs and the `me` response.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self {
            Self::SuperAdmin { .. } => "super_admin",
            Self::SubAdmin { .. } => "sub_admin",
        }
    }
}

impl From<&sub_admin::Model> for Actor {
    fn from(m: &sub_admin::Model) -> Self {
        Self::SubAdmin {
            id: m.id.clone(),
            full_name: m.full_name.clone(),
            email: m.email.clone(),
            is_active: m.is_active,
            permissions: Permissions::from(m),
        }
    }
}

/// Check whether `actor` may perform `action`.
///
/// Failures are always [`AppError::Forbidden`], whichever check failed.
pub fn authorize(actor: &Actor, action: Action) -> AppResult<()> {
    match actor {
        Actor::SuperAdmin { .. } => Ok(()),
        Actor::SubAdmin {
            id,
            is_active,
            permissions,
            ..
        } => {
            if !is_active {
                tracing::debug!(actor = %id, action = action.as_str(), "Inactive sub-admin denied");
                return Err(AppError::Forbidden);
            }
            if !permissions.allows(action) {
                tracing::debug!(actor = %id, action = action.as_str(), "Missing capability flag");
                return Err(AppError::Forbidden);
            }
            Ok(())
        }
    }
}
