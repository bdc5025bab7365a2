//! Sub-admin management endpoints, reserved to super-admins.

use abcd_common::AppResult;
use abcd_core::{CreateSubAdminInput, Permissions, UpdateSubAdminInput};
use abcd_db::entities::sub_admin;
use axum::{
    Router,
    extract::{Path, State},
    routing::{get, patch, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::approvals::checked_id,
    extractors::{AppJson, AuthActor},
    middleware::AppState,
    response::ApiResponse,
};

/// Sub-admin response. The password hash never leaves the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAdminResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub is_active: bool,
    pub permissions: Permissions,
    pub created_by: String,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<sub_admin::Model> for SubAdminResponse {
    fn from(m: sub_admin::Model) -> Self {
        Self {
            permissions: Permissions::from(&m),
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            mobile: m.mobile,
            is_active: m.is_active,
            created_by: m.created_by,
            last_login: m.last_login.map(|t| t.to_rfc3339()),
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

async fn list(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<SubAdminResponse>>> {
    let admins = state.sub_admin_service.list(&actor).await?;
    Ok(ApiResponse::ok(admins.into_iter().map(Into::into).collect()))
}

async fn create(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateSubAdminInput>,
) -> AppResult<ApiResponse<SubAdminResponse>> {
    let admin = state.sub_admin_service.create(&actor, req).await?;
    Ok(ApiResponse::created(admin.into()).with_message("Sub-admin created"))
}

async fn show(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SubAdminResponse>> {
    let admin = state.sub_admin_service.get(&actor, checked_id(&id)?).await?;
    Ok(ApiResponse::ok(admin.into()))
}

async fn update(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateSubAdminInput>,
) -> AppResult<ApiResponse<SubAdminResponse>> {
    let admin = state
        .sub_admin_service
        .update(&actor, checked_id(&id)?, req)
        .await?;
    Ok(ApiResponse::ok(admin.into()).with_message("Sub-admin updated"))
}

async fn toggle_active(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SubAdminResponse>> {
    let admin = state
        .sub_admin_service
        .toggle_active(&actor, checked_id(&id)?)
        .await?;
    let message = if admin.is_active {
        "Sub-admin activated"
    } else {
        "Sub-admin deactivated"
    };
    Ok(ApiResponse::ok(admin.into()).with_message(message))
}

async fn reset_password(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .sub_admin_service
        .reset_password(&actor, checked_id(&id)?, &req.password)
        .await?;
    Ok(ApiResponse::message("Password reset"))
}

async fn remove(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .sub_admin_service
        .delete(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::message("Sub-admin deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/toggle-active", patch(toggle_active))
        .route("/{id}/password", put(reset_password))
}
