//! Core business logic for the ABCD admin backend.
//!
//! - [`permission`]: actors, capability flags and the authorization check
//! - [`approval`]: the approval state machine shared by all entity families
//! - [`stats`]: counts derived from an entity collection
//! - [`hooks`]: notifications to external collaborators
//! - [`services`]: database-backed services used by the API

#![allow(missing_docs)]

pub mod approval;
pub mod hooks;
pub mod permission;
pub mod services;
pub mod stats;

pub use permission::{Action, Actor, Permissions, authorize};
pub use services::{
    AdFlag, AdInput, ApprovalService, AuthService, BusinessApplication, CategoryInput, CityInput,
    ContentService, CreateSubAdminInput, DashboardStats, EntityList, IntakeService, LeadDetails,
    LoginInput, LoginOutcome, SettingsService, SubAdminService, UpdateSettingsInput,
    UpdateSubAdminInput, UserRegistration, VendorSignup,
};
