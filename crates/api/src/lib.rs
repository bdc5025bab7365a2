//! HTTP API layer for the ABCD admin backend.
//!
//! - **Endpoints**: approval, intake, auth, sub-admin, content and settings routes
//! - **Extractors**: the authenticated actor and JSON bodies with enveloped rejections
//! - **Middleware**: session cookie resolution, the error envelope for bare
//!   responses, and shared application state
//! - **Response**: the `{success, message?, data}` envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware, envelope_errors};
pub use response::ApiResponse;
