//! Public submission endpoints that create approvable entities.

use abcd_common::AppResult;
use abcd_core::{BusinessApplication, LeadDetails, UserRegistration, VendorSignup};
use abcd_db::entities::approvable_entity::{self, ApprovalStatus, EntityFamily};
use axum::{
    Router,
    extract::{Path, State},
    routing::post,
};
use serde::Serialize;

use crate::{
    endpoints::approvals::checked_id,
    extractors::AppJson,
    middleware::AppState,
    response::ApiResponse,
};

/// What an anonymous submitter gets back: enough to track the submission,
/// none of the review bookkeeping.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub family: EntityFamily,
    pub status: ApprovalStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_business_application_submitted: Option<bool>,
}

impl From<approvable_entity::Model> for SubmissionResponse {
    fn from(e: approvable_entity::Model) -> Self {
        Self {
            is_business_application_submitted: (e.family == EntityFamily::Vendor)
                .then_some(e.is_business_application_submitted),
            id: e.id,
            family: e.family,
            status: e.status,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

async fn register_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<UserRegistration>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let user = state.intake_service.register_user(req).await?;
    Ok(ApiResponse::created(user.into()).with_message("Registration submitted for approval"))
}

async fn register_vendor(
    State(state): State<AppState>,
    AppJson(req): AppJson<VendorSignup>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let vendor = state.intake_service.register_vendor(req).await?;
    Ok(ApiResponse::created(vendor.into()))
}

async fn submit_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<BusinessApplication>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let vendor = state
        .intake_service
        .submit_vendor_application(checked_id(&id)?, req)
        .await?;
    Ok(ApiResponse::ok(vendor.into()).with_message("Business application submitted"))
}

async fn post_buy_lead(
    State(state): State<AppState>,
    AppJson(req): AppJson<LeadDetails>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let lead = state.intake_service.post_buy_lead(req).await?;
    Ok(ApiResponse::created(lead.into()))
}

async fn post_sell_lead(
    State(state): State<AppState>,
    AppJson(req): AppJson<LeadDetails>,
) -> AppResult<ApiResponse<SubmissionResponse>> {
    let lead = state.intake_service.post_sell_lead(req).await?;
    Ok(ApiResponse::created(lead.into()))
}

pub fn user_router() -> Router<AppState> {
    Router::new().route("/register", post(register_user))
}

pub fn vendor_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_vendor))
        .route("/{id}/application", post(submit_application))
}

pub fn buy_lead_router() -> Router<AppState> {
    Router::new().route("/", post(post_buy_lead))
}

pub fn sell_lead_router() -> Router<AppState> {
    Router::new().route("/", post(post_sell_lead))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reviewed_vendor() -> approvable_entity::Model {
        approvable_entity::Model {
            id: "v1".to_string(),
            family: EntityFamily::Vendor,
            status: ApprovalStatus::Rejected,
            rejection_reason: Some("Blurry PAN scan".to_string()),
            admin_comments: Some("Called twice, no answer".to_string()),
            is_business_application_submitted: true,
            is_verified: false,
            payload: serde_json::json!({"businessName": "Shree Traders"}),
            version: 4,
            created_at: Utc::now().into(),
            reviewed_at: Some(Utc::now().into()),
            reviewed_by: Some("01jc8x5m2q0000000000000009".to_string()),
            updated_at: Some(Utc::now().into()),
        }
    }

    #[test]
    fn test_submission_response_hides_review_fields() {
        let json = serde_json::to_value(SubmissionResponse::from(reviewed_vendor())).unwrap();

        assert_eq!(json["id"], "v1");
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["isBusinessApplicationSubmitted"], true);
        for field in [
            "reviewedBy",
            "reviewedAt",
            "adminComments",
            "rejectionReason",
            "version",
            "details",
            "isVerified",
        ] {
            assert!(json.get(field).is_none(), "{field} leaked");
        }
    }

    #[test]
    fn test_lead_submission_has_no_gate_field() {
        let mut lead = reviewed_vendor();
        lead.family = EntityFamily::BuyLead;

        let json = serde_json::to_value(SubmissionResponse::from(lead)).unwrap();

        assert_eq!(json["family"], "buy_lead");
        assert!(json.get("isBusinessApplicationSubmitted").is_none());
    }
}
