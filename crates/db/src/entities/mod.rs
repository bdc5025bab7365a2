//! Database entities.

pub mod admin_session;
pub mod advertisement;
pub mod approvable_entity;
pub mod category;
pub mod city;
pub mod platform_settings;
pub mod sub_admin;
pub mod super_admin;

pub use admin_session::Entity as AdminSession;
pub use advertisement::Entity as Advertisement;
pub use approvable_entity::Entity as ApprovableEntity;
pub use category::Entity as Category;
pub use city::Entity as City;
pub use platform_settings::Entity as PlatformSettings;
pub use sub_admin::Entity as SubAdmin;
pub use super_admin::Entity as SuperAdmin;
