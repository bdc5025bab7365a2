//! Business logic services.

#![allow(missing_docs)]

pub mod approval;
pub mod auth;
pub mod content;
pub mod intake;
pub mod settings;
pub mod sub_admin;

pub use approval::{ApprovalService, DashboardStats, EntityList};
pub use auth::{AuthService, LoginInput, LoginOutcome};
pub use content::{AdFlag, AdInput, CategoryInput, CityInput, ContentService};
pub use intake::{BusinessApplication, IntakeService, LeadDetails, UserRegistration, VendorSignup};
pub use settings::{SettingsService, UpdateSettingsInput};
pub use sub_admin::{CreateSubAdminInput, SubAdminService, UpdateSubAdminInput};
