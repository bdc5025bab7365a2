//! API integration tests.
//!
//! These tests drive the full router, including the session middleware,
//! against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use abcd_api::{AppState, auth_middleware, envelope_errors, router as api_router};
use abcd_common::config::SessionConfig;
use abcd_core::hooks::NoOpApprovalHooks;
use abcd_db::entities::{
    admin_session::{self, ActorKind},
    advertisement,
    approvable_entity::{self, ApprovalStatus, EntityFamily},
    sub_admin, super_admin,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::{from_fn_with_state, map_response},
};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use tower::ServiceExt;

const TOKEN: &str = "0b3f6c1e9d2a4f7e8c5b1a0d9e8f7a6b";
const ROOT_ID: &str = "01jc8x5m2q0000000000000000";
const VENDOR_ID: &str = "01jc8x5m2q0000000000000001";

fn create_test_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(
        Arc::new(db),
        SessionConfig::default(),
        Arc::new(NoOpApprovalHooks),
    );

    api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .layer(map_response(envelope_errors))
        .with_state(state)
}

fn session(kind: ActorKind, actor_id: &str) -> admin_session::Model {
    admin_session::Model {
        token: TOKEN.to_string(),
        actor_kind: kind,
        actor_id: actor_id.to_string(),
        created_at: Utc::now().into(),
        expires_at: (Utc::now() + Duration::hours(1)).into(),
    }
}

fn root() -> super_admin::Model {
    super_admin::Model {
        id: ROOT_ID.to_string(),
        email: "root@abcd.in".to_string(),
        password_hash: String::new(),
        last_login: None,
        created_at: Utc::now().into(),
    }
}

fn viewer_sub_admin(id: &str) -> sub_admin::Model {
    sub_admin::Model {
        id: id.to_string(),
        full_name: "Support Desk".to_string(),
        email: "support@abcd.in".to_string(),
        mobile: "9876543210".to_string(),
        password_hash: String::new(),
        is_active: true,
        can_view_users: true,
        can_edit_users: false,
        can_delete_users: false,
        can_approve_users: false,
        can_view_vendors: true,
        can_edit_vendors: false,
        can_delete_vendors: false,
        can_approve_vendors: false,
        can_view_leads: false,
        can_edit_leads: false,
        can_delete_leads: false,
        can_approve_leads: false,
        can_manage_content: false,
        can_view_settings: false,
        can_edit_settings: false,
        created_by: ROOT_ID.to_string(),
        last_login: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn vendor(status: ApprovalStatus, gate: bool) -> approvable_entity::Model {
    approvable_entity::Model {
        id: VENDOR_ID.to_string(),
        family: EntityFamily::Vendor,
        status,
        rejection_reason: None,
        admin_comments: None,
        is_business_application_submitted: gate,
        is_verified: false,
        payload: serde_json::json!({"businessName": "Shree Traders"}),
        version: 1,
        created_at: Utc::now().into(),
        reviewed_at: None,
        reviewed_by: None,
        updated_at: None,
    }
}

fn cookie() -> String {
    format!("{}={TOKEN}", SessionConfig::default().cookie_name)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_unauthenticated_approve_returns_401() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/vendors/admin/approve/{VENDOR_ID}"))
                .method("PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");
}

#[tokio::test]
async fn test_wrong_method_is_enveloped() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/logout")
                .method("DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

fn application_body() -> Body {
    Body::from(
        serde_json::json!({
            "category": "Textiles",
            "address": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
        })
        .to_string(),
    )
}

#[tokio::test]
async fn test_application_cannot_reopen_approved_vendor() {
    let mut approved = vendor(ApprovalStatus::Approved, true);
    approved.is_verified = true;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[approved]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/vendors/{VENDOR_ID}/application"))
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(application_body())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_application_response_hides_review_fields() {
    let mut submitted = vendor(ApprovalStatus::Pending, true);
    submitted.version = 2;
    submitted.admin_comments = Some("Asked for GST certificate".to_string());
    submitted.reviewed_by = Some(ROOT_ID.to_string());

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[vendor(ApprovalStatus::Pending, false)], [submitted]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/vendors/{VENDOR_ID}/application"))
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(application_body())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["isBusinessApplicationSubmitted"], true);
    assert!(body["data"].get("reviewedBy").is_none());
    assert!(body["data"].get("adminComments").is_none());
    assert!(body["data"].get("version").is_none());
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_400() {
    let app = create_test_router(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/users/register")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_login_unknown_email_returns_401() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<super_admin::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/admin/login")
                .method("POST")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"nobody@abcd.in","password":"wrong-password"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_public_active_ads() {
    let ad = advertisement::Model {
        id: "01jc8x5m2q00000000000000a1".to_string(),
        title: "Monsoon sale".to_string(),
        image_url: "https://cdn.abcd.in/ads/monsoon.png".to_string(),
        link_url: None,
        vendor_id: None,
        is_approved: true,
        is_visible: true,
        created_at: Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![ad]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ads/active")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["isActive"], true);
}

#[tokio::test]
async fn test_me_resolves_session_cookie() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[session(ActorKind::SuperAdmin, ROOT_ID)]])
        .append_query_results([[root()]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .method("GET")
                .header(header::COOKIE, cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "super_admin");
    assert_eq!(body["data"]["email"], "root@abcd.in");
}

#[tokio::test]
async fn test_sub_admin_without_approve_flag_is_forbidden() {
    let sub_id = "01jc8x5m2q00000000000000s1";
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[session(ActorKind::SubAdmin, sub_id)]])
        .append_query_results([[viewer_sub_admin(sub_id)]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/subadmin/vendors/admin/approve/{VENDOR_ID}"))
                .method("PUT")
                .header(header::COOKIE, cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not authorized");
}

#[tokio::test]
async fn test_reject_without_reason_returns_400() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[session(ActorKind::SuperAdmin, ROOT_ID)]])
        .append_query_results([[root()]])
        .append_query_results([[vendor(ApprovalStatus::Pending, true)]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/vendors/admin/reject/{VENDOR_ID}"))
                .method("POST")
                .header(header::COOKIE, cookie())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"reason":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_vendor_approval_blocked_without_application() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[session(ActorKind::SuperAdmin, ROOT_ID)]])
        .append_query_results([[root()]])
        .append_query_results([[vendor(ApprovalStatus::Pending, false)]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/vendors/admin/approve/{VENDOR_ID}"))
                .method("PUT")
                .header(header::COOKIE, cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_list_reports_stats() {
    let mut approved = vendor(ApprovalStatus::Approved, true);
    approved.id = "01jc8x5m2q0000000000000002".to_string();
    approved.is_verified = true;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[session(ActorKind::SuperAdmin, ROOT_ID)]])
        .append_query_results([[root()]])
        .append_query_results([vec![vendor(ApprovalStatus::Pending, true), approved]])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/vendors?status=pending")
                .method("GET")
                .header(header::COOKIE, cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["stats"]["total"], 2);
    assert_eq!(body["data"]["stats"]["verified"], 1);
}
