//! Category, city and advertisement endpoints.

use abcd_common::AppResult;
use abcd_core::{AdFlag, AdInput, CategoryInput, CityInput};
use abcd_db::entities::{advertisement, category, city};
use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, patch},
};
use serde::Serialize;

use crate::{
    endpoints::approvals::checked_id,
    extractors::{AppJson, AuthActor},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub id: String,
    pub name: String,
    pub state: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<city::Model> for CityResponse {
    fn from(m: city::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            state: m.state,
            is_active: m.is_active,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Advertisement response. `isActive` is derived from the two flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResponse {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub vendor_id: Option<String>,
    pub is_approved: bool,
    pub is_visible: bool,
    pub is_active: bool,
    pub created_at: String,
}

impl From<advertisement::Model> for AdResponse {
    fn from(m: advertisement::Model) -> Self {
        Self {
            is_active: m.is_active(),
            id: m.id,
            title: m.title,
            image_url: m.image_url,
            link_url: m.link_url,
            vendor_id: m.vendor_id,
            is_approved: m.is_approved,
            is_visible: m.is_visible,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

fn collect<M, R: From<M>>(models: Vec<M>) -> Vec<R> {
    models.into_iter().map(R::from).collect()
}

// ==================== Categories ====================

async fn list_categories(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.content_service.list_categories(&actor).await?;
    Ok(ApiResponse::ok(collect(categories)))
}

async fn create_category(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    AppJson(req): AppJson<CategoryInput>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state.content_service.create_category(&actor, req).await?;
    Ok(ApiResponse::created(category.into()))
}

async fn toggle_category(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = state
        .content_service
        .toggle_category_active(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(category.into()))
}

async fn delete_category(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .content_service
        .delete_category(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::message("Category deleted"))
}

async fn active_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.content_service.active_categories().await?;
    Ok(ApiResponse::ok(collect(categories)))
}

// ==================== Cities ====================

async fn list_cities(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CityResponse>>> {
    let cities = state.content_service.list_cities(&actor).await?;
    Ok(ApiResponse::ok(collect(cities)))
}

async fn create_city(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    AppJson(req): AppJson<CityInput>,
) -> AppResult<ApiResponse<CityResponse>> {
    let city = state.content_service.create_city(&actor, req).await?;
    Ok(ApiResponse::created(city.into()))
}

async fn toggle_city(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CityResponse>> {
    let city = state
        .content_service
        .toggle_city_active(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(city.into()))
}

async fn delete_city(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .content_service
        .delete_city(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::message("City deleted"))
}

async fn active_cities(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<CityResponse>>> {
    let cities = state.content_service.active_cities().await?;
    Ok(ApiResponse::ok(collect(cities)))
}

// ==================== Advertisements ====================

async fn list_ads(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AdResponse>>> {
    let ads = state.content_service.list_ads(&actor).await?;
    Ok(ApiResponse::ok(collect(ads)))
}

async fn create_ad(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    AppJson(req): AppJson<AdInput>,
) -> AppResult<ApiResponse<AdResponse>> {
    let ad = state.content_service.create_ad(&actor, req).await?;
    Ok(ApiResponse::created(ad.into()))
}

async fn toggle_ad_approved(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AdResponse>> {
    let ad = state
        .content_service
        .toggle_ad(&actor, checked_id(&id)?, AdFlag::Approved)
        .await?;
    Ok(ApiResponse::ok(ad.into()))
}

async fn toggle_ad_visible(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AdResponse>> {
    let ad = state
        .content_service
        .toggle_ad(&actor, checked_id(&id)?, AdFlag::Visible)
        .await?;
    Ok(ApiResponse::ok(ad.into()))
}

async fn delete_ad(
    AuthActor(actor): AuthActor,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .content_service
        .delete_ad(&actor, checked_id(&id)?)
        .await?;
    Ok(ApiResponse::message("Advertisement deleted"))
}

async fn active_ads(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<AdResponse>>> {
    let ads = state.content_service.active_ads().await?;
    Ok(ApiResponse::ok(collect(ads)))
}

// ==================== Routers ====================

/// Category routes. `/active` is public.
pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/active", get(active_categories))
        .route("/{id}/toggle-active", patch(toggle_category))
        .route("/{id}", delete(delete_category))
}

/// City routes. `/active` is public.
pub fn city_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cities).post(create_city))
        .route("/active", get(active_cities))
        .route("/{id}/toggle-active", patch(toggle_city))
        .route("/{id}", delete(delete_city))
}

/// Advertisement routes. `/active` is public.
pub fn ad_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ads).post(create_ad))
        .route("/active", get(active_ads))
        .route("/{id}/toggle-approved", patch(toggle_ad_approved))
        .route("/{id}/toggle-visible", patch(toggle_ad_visible))
        .route("/{id}", delete(delete_ad))
}
