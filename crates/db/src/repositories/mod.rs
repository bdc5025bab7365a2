//! Database repositories.

pub mod admin;
pub mod approvable;
pub mod content;
pub mod session;

pub use admin::AdminRepository;
pub use approvable::{ApprovableRepository, TransitionWrite};
pub use content::ContentRepository;
pub use session::SessionRepository;
