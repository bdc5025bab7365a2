//! Authentication endpoints.

use abcd_common::AppResult;
use abcd_core::{Actor, LoginInput, LoginOutcome, Permissions};
use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Serialize;

use crate::{
    extractors::{AppJson, AuthActor},
    middleware::AppState,
    response::ApiResponse,
};

/// The signed-in admin.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

impl From<Actor> for MeResponse {
    fn from(actor: Actor) -> Self {
        let role = actor.role();
        match actor {
            Actor::SuperAdmin { id, email } => Self {
                id,
                email,
                role,
                full_name: None,
                is_active: None,
                permissions: None,
            },
            Actor::SubAdmin {
                id,
                full_name,
                email,
                is_active,
                permissions,
            } => Self {
                id,
                email,
                role,
                full_name: Some(full_name),
                is_active: Some(is_active),
                permissions: Some(permissions),
            },
        }
    }
}

fn session_cookie(state: &AppState, outcome: &LoginOutcome) -> Cookie<'static> {
    Cookie::build((state.session.cookie_name.clone(), outcome.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.session.secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Sign in as super-admin.
async fn super_admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginInput>,
) -> AppResult<(CookieJar, ApiResponse<MeResponse>)> {
    let outcome = state.auth_service.login_super_admin(req).await?;
    let jar = jar.add(session_cookie(&state, &outcome));

    Ok((jar, ApiResponse::ok(outcome.actor.into()).with_message("Signed in")))
}

/// Sign in as sub-admin.
async fn sub_admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginInput>,
) -> AppResult<(CookieJar, ApiResponse<MeResponse>)> {
    let outcome = state.auth_service.login_sub_admin(req).await?;
    let jar = jar.add(session_cookie(&state, &outcome));

    Ok((jar, ApiResponse::ok(outcome.actor.into()).with_message("Signed in")))
}

/// End the current session.
async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<()>)> {
    if let Some(cookie) = jar.get(&state.session.cookie_name) {
        state.auth_service.logout(cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build((state.session.cookie_name.clone(), "")).path("/"));

    Ok((jar, ApiResponse::message("Signed out")))
}

/// Get the signed-in admin.
async fn me(AuthActor(actor): AuthActor) -> ApiResponse<MeResponse> {
    ApiResponse::ok(actor.into())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(super_admin_login))
        .route("/subadmin/login", post(sub_admin_login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
