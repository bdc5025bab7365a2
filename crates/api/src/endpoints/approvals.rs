//! Approval endpoints shared by users, vendors, buy leads and sell leads.
//!
//! The family is bound per router with an `Extension` layer, so one set of
//! handlers serves all four.

use abcd_common::{AppError, AppResult, IdGenerator};
use abcd_core::{services::DashboardStats, stats::ApprovalStats};
use abcd_db::entities::approvable_entity::{self, ApprovalStatus, EntityFamily};
use axum::{
    Extension, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AppJson, AuthActor},
    middleware::AppState,
    response::ApiResponse,
};

/// Approvable entity response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityResponse {
    pub id: String,
    pub family: EntityFamily,
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub admin_comments: Option<String>,
    pub details: serde_json::Value,
    pub version: i32,
    pub created_at: String,
    pub reviewed_at: Option<String>,
    pub reviewed_by: Option<String>,
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_business_application_submitted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_rejected: Option<bool>,
}

impl From<approvable_entity::Model> for EntityResponse {
    fn from(e: approvable_entity::Model) -> Self {
        let vendor = e.family == EntityFamily::Vendor;
        let user = e.family == EntityFamily::User;

        Self {
            is_business_application_submitted: vendor
                .then_some(e.is_business_application_submitted),
            is_verified: vendor.then_some(e.is_verified),
            payment_verified: user.then_some(e.status == ApprovalStatus::Approved),
            is_rejected: user.then_some(e.status == ApprovalStatus::Rejected),
            id: e.id,
            family: e.family,
            status: e.status,
            rejection_reason: e.rejection_reason,
            admin_comments: e.admin_comments,
            details: e.payload,
            version: e.version,
            created_at: e.created_at.to_rfc3339(),
            reviewed_at: e.reviewed_at.map(|t| t.to_rfc3339()),
            reviewed_by: e.reviewed_by,
            updated_at: e.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Entity list response.
#[derive(Serialize)]
pub struct EntityListResponse {
    pub items: Vec<EntityResponse>,
    pub stats: ApprovalStats,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    #[serde(default, alias = "rejectionReason")]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsRequest {
    #[serde(alias = "comments")]
    pub admin_comments: Option<String>,
}

pub(crate) fn checked_id(id: &str) -> AppResult<&str> {
    if IdGenerator::is_well_formed(id) {
        Ok(id)
    } else {
        Err(AppError::Validation(format!("Malformed id: {id}")))
    }
}

async fn list_entities(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<EntityListResponse>> {
    let status = match query.status.as_deref() {
        None | Some("" | "all") => None,
        Some(s) => Some(
            ApprovalStatus::parse(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {s}")))?,
        ),
    };

    let list = state.approval_service.list(&actor, family, status).await?;

    Ok(ApiResponse::ok(EntityListResponse {
        items: list.items.into_iter().map(Into::into).collect(),
        stats: list.stats,
    }))
}

async fn get_entity(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EntityResponse>> {
    let entity = state
        .approval_service
        .get(&actor, family, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(entity.into()))
}

async fn approve(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EntityResponse>> {
    let entity = state
        .approval_service
        .approve(&actor, family, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(entity.into()).with_message(format!("{} approved", capitalized(family))))
}

async fn reject(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
    AppJson(req): AppJson<RejectRequest>,
) -> AppResult<ApiResponse<EntityResponse>> {
    let reason = req.reason.unwrap_or_default();
    let entity = state
        .approval_service
        .reject(&actor, family, checked_id(&id)?, &reason)
        .await?;
    Ok(ApiResponse::ok(entity.into()).with_message(format!("{} rejected", capitalized(family))))
}

async fn mark_under_review(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EntityResponse>> {
    let entity = state
        .approval_service
        .mark_under_review(&actor, family, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(entity.into()))
}

async fn set_comments(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CommentsRequest>,
) -> AppResult<ApiResponse<EntityResponse>> {
    let entity = state
        .approval_service
        .set_admin_comments(&actor, family, checked_id(&id)?, req.admin_comments.as_deref())
        .await?;
    Ok(ApiResponse::ok(entity.into()))
}

async fn delete_entity(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Extension(family): Extension<EntityFamily>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .approval_service
        .delete(&actor, family, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::message(format!("{} deleted", capitalized(family))))
}

async fn dashboard(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.approval_service.dashboard(&actor).await?;
    Ok(ApiResponse::ok(stats))
}

fn capitalized(family: EntityFamily) -> String {
    let label = family.label();
    let mut chars = label.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Review routes of one family, nested under the family's path.
pub fn router(family: EntityFamily) -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_entity))
        .route("/admin/approve/{id}", put(approve).post(approve))
        .route("/admin/reject/{id}", put(reject).post(reject))
        .route(
            "/admin/under-review/{id}",
            put(mark_under_review).post(mark_under_review),
        )
        .route("/admin/comments/{id}", put(set_comments))
        .route("/admin/delete/{id}", delete(delete_entity))
        .layer(Extension(family))
}

/// Admin collection routes: `/admin/{family}` lists and the dashboard.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .nest("/users", list_router(EntityFamily::User))
        .nest("/vendors", list_router(EntityFamily::Vendor))
        .nest("/buy-leads", list_router(EntityFamily::BuyLead))
        .nest("/sell-leads", list_router(EntityFamily::SellLead))
}

fn list_router(family: EntityFamily) -> Router<AppState> {
    Router::new()
        .route("/", get(list_entities))
        .layer(Extension(family))
}
