//! API endpoints.

mod approvals;
mod auth;
mod content;
mod intake;
mod settings;
mod sub_admins;

use abcd_common::AppError;
use abcd_db::entities::approvable_entity::EntityFamily;
use axum::Router;

use crate::middleware::AppState;

pub use approvals::{EntityListResponse, EntityResponse};
pub use auth::MeResponse;
pub use sub_admins::SubAdminResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest(
            "/admin",
            approvals::admin_router().nest("/subadmins", sub_admins::router()),
        )
        .nest(
            "/users",
            approvals::router(EntityFamily::User).merge(intake::user_router()),
        )
        .nest(
            "/vendors",
            approvals::router(EntityFamily::Vendor).merge(intake::vendor_router()),
        )
        .nest(
            "/buy-leads",
            approvals::router(EntityFamily::BuyLead).merge(intake::buy_lead_router()),
        )
        .nest(
            "/sell-leads",
            approvals::router(EntityFamily::SellLead).merge(intake::sell_lead_router()),
        )
        .nest("/categories", content::category_router())
        .nest("/cities", content::city_router())
        .nest("/ads", content::ad_router())
        .nest("/settings", settings::router())
        .nest("/subadmin", console_router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// The admin console surface without intake or sub-admin management.
///
/// Served again under `/subadmin`; every operation checks the actor's
/// capability flags in the service layer, so both prefixes share handlers.
fn console_router() -> Router<AppState> {
    Router::new()
        .nest("/admin", approvals::admin_router())
        .nest("/users", approvals::router(EntityFamily::User))
        .nest("/vendors", approvals::router(EntityFamily::Vendor))
        .nest("/buy-leads", approvals::router(EntityFamily::BuyLead))
        .nest("/sell-leads", approvals::router(EntityFamily::SellLead))
        .nest("/categories", content::category_router())
        .nest("/cities", content::city_router())
        .nest("/ads", content::ad_router())
        .nest("/settings", settings::router())
}
