//! Platform settings endpoints.

use abcd_common::AppResult;
use abcd_core::UpdateSettingsInput;
use abcd_db::entities::platform_settings;
use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::{
    extractors::{AppJson, AuthActor},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub site_name: String,
    pub support_email: Option<String>,
    pub support_phone: Option<String>,
    pub registration_fee: i64,
    pub vendor_registration_open: bool,
    pub lead_posting_open: bool,
    pub updated_at: String,
}

impl From<platform_settings::Model> for SettingsResponse {
    fn from(m: platform_settings::Model) -> Self {
        Self {
            site_name: m.site_name,
            support_email: m.support_email,
            support_phone: m.support_phone,
            registration_fee: m.registration_fee,
            vendor_registration_open: m.vendor_registration_open,
            lead_posting_open: m.lead_posting_open,
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

async fn show(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SettingsResponse>> {
    let settings = state.settings_service.get(&actor).await?;
    Ok(ApiResponse::ok(settings.into()))
}

async fn update(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    AppJson(req): AppJson<UpdateSettingsInput>,
) -> AppResult<ApiResponse<SettingsResponse>> {
    let settings = state.settings_service.update(&actor, req).await?;
    Ok(ApiResponse::ok(settings.into()).with_message("Settings updated"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).put(update))
}
