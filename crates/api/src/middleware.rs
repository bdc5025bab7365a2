//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use abcd_common::{AppError, config::SessionConfig};
use abcd_core::{
    ApprovalService, AuthService, ContentService, IntakeService, SettingsService, SubAdminService,
    hooks::ApprovalHooks,
};
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use sea_orm::DatabaseConnection;
use serde_json::json;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub approval_service: ApprovalService,
    pub intake_service: IntakeService,
    pub auth_service: AuthService,
    pub sub_admin_service: SubAdminService,
    pub content_service: ContentService,
    pub settings_service: SettingsService,
    pub session: SessionConfig,
}

impl AppState {
    /// Build every service over one connection pool.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        session: SessionConfig,
        hooks: Arc<dyn ApprovalHooks>,
    ) -> Self {
        Self {
            approval_service: ApprovalService::new(Arc::clone(&db)).with_hooks(hooks),
            intake_service: IntakeService::new(Arc::clone(&db)),
            auth_service: AuthService::new(Arc::clone(&db), &session),
            sub_admin_service: SubAdminService::new(Arc::clone(&db)),
            content_service: ContentService::new(Arc::clone(&db)),
            settings_service: SettingsService::new(db),
            session,
        }
    }
}

/// Authentication middleware.
///
/// Resolves the session cookie into an `Actor` request extension. Requests
/// without a valid session pass through unauthenticated; handlers that need
/// an actor reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    if let Some(cookie) = jar.get(&state.session.cookie_name) {
        match state.auth_service.resolve_session(cookie.value()).await {
            Ok(actor) => {
                req.extensions_mut().insert(actor);
            }
            Err(AppError::Unauthorized) => {
                tracing::debug!("Ignoring unknown or expired session cookie");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to resolve session");
            }
        }
    }

    next.run(req).await
}

/// Wrap error responses that never reached a handler in the failure envelope.
///
/// Covers the bare bodies produced by the timeout and body-limit layers and
/// by routing (405). JSON error bodies from `AppError` pass through as-is.
pub async fn envelope_errors(response: Response) -> Response {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));
    if is_json {
        return response;
    }

    tracing::debug!(status = %status, "Wrapping bare error response");

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);

    let body = Json(json!({
        "success": false,
        "message": status.canonical_reason().unwrap_or("Request failed"),
    }));

    (parts, body).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bare_payload_too_large_is_enveloped() {
        let bare = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();

        let response = envelope_errors(bare).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Payload Too Large");
    }

    #[tokio::test]
    async fn test_empty_timeout_is_enveloped() {
        let bare = StatusCode::REQUEST_TIMEOUT.into_response();

        let body = body_json(envelope_errors(bare).await).await;

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Request Timeout");
    }

    #[tokio::test]
    async fn test_app_error_passes_through() {
        let conflict = AppError::Conflict("stale".to_string()).into_response();

        let response = envelope_errors(conflict).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["message"], "stale");
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let response = envelope_errors((StatusCode::OK, "pong").into_response()).await;

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"pong");
    }
}
