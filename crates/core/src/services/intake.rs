//! Intake of new approvable entities from the public site.
//!
//! Every submission arrives as a typed, validated record and is stored as the
//! entity payload in `pending`.

use std::sync::Arc;

use abcd_common::{AppError, AppResult, IdGenerator};
use abcd_db::{
    entities::approvable_entity::{self, ApprovalStatus, EntityFamily},
    repositories::ApprovableRepository,
};
use sea_orm::{DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::settings::SettingsService;

/// Details of a member registration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, max = 15))]
    pub mobile: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(max = 256))]
    pub business_name: Option<String>,

    #[validate(length(max = 128))]
    pub business_category: Option<String>,

    #[validate(length(max = 128))]
    pub referred_by: Option<String>,
}

/// Account details of a vendor signing up.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VendorSignup {
    #[validate(length(min = 1, max = 256))]
    pub business_name: String,

    #[validate(length(min = 1, max = 128))]
    pub owner_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, max = 15))]
    pub mobile: String,
}

/// Business (KYC) application submitted by a registered vendor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessApplication {
    #[validate(length(min = 1, max = 128))]
    pub category: String,

    #[validate(length(min = 1, max = 512))]
    pub address: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(min = 1, max = 128))]
    pub state: String,

    #[validate(length(equal = 15))]
    pub gst_number: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(url)]
    pub website: Option<String>,
}

/// Details of a buy or sell lead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetails {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 128))]
    pub category: String,

    #[validate(length(min = 1, max = 128))]
    pub city: String,

    #[validate(length(max = 64))]
    pub quantity: Option<String>,

    /// Budget (buy) or asking price (sell), in rupees.
    #[validate(range(min = 0))]
    pub amount: Option<i64>,

    #[validate(length(min = 1, max = 128))]
    pub contact_name: String,

    #[validate(length(min = 10, max = 15))]
    pub contact_mobile: String,
}

/// Service creating approvable entities.
#[derive(Clone)]
pub struct IntakeService {
    repo: ApprovableRepository,
    settings: SettingsService,
    id_gen: IdGenerator,
}

impl IntakeService {
    /// Create a new intake service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: ApprovableRepository::new(Arc::clone(&db)),
            settings: SettingsService::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a member.
    pub async fn register_user(
        &self,
        input: UserRegistration,
    ) -> AppResult<approvable_entity::Model> {
        input.validate()?;
        self.insert(EntityFamily::User, &input, true).await
    }

    /// Register a vendor account. The application gate starts closed.
    pub async fn register_vendor(
        &self,
        input: VendorSignup,
    ) -> AppResult<approvable_entity::Model> {
        input.validate()?;

        if !self.settings.current().await?.vendor_registration_open {
            return Err(AppError::BadRequest(
                "Vendor registration is currently closed".to_string(),
            ));
        }

        self.insert(EntityFamily::Vendor, &input, false).await
    }

    /// Attach a business application to a vendor and open the gate.
    ///
    /// Accepted only while the gate is closed, or as a resubmission after a
    /// rejection, which sends the vendor back to `pending`.
    pub async fn submit_vendor_application(
        &self,
        vendor_id: &str,
        input: BusinessApplication,
    ) -> AppResult<approvable_entity::Model> {
        input.validate()?;

        let vendor = self.repo.get_by_id(EntityFamily::Vendor, vendor_id).await?;
        if !vendor.accepts_application() {
            return Err(AppError::Conflict(format!(
                "Business application already submitted (vendor is {})",
                vendor.status.as_str()
            )));
        }

        let mut payload = match vendor.payload {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        payload.insert("application".to_string(), to_payload(&input)?);

        let updated = self
            .repo
            .submit_application(vendor_id, vendor.version, serde_json::Value::Object(payload))
            .await?;

        tracing::info!(id = %vendor_id, "Vendor business application submitted");

        Ok(updated)
    }

    /// Post a buy lead.
    pub async fn post_buy_lead(&self, input: LeadDetails) -> AppResult<approvable_entity::Model> {
        self.post_lead(EntityFamily::BuyLead, input).await
    }

    /// Post a sell lead.
    pub async fn post_sell_lead(&self, input: LeadDetails) -> AppResult<approvable_entity::Model> {
        self.post_lead(EntityFamily::SellLead, input).await
    }

    async fn post_lead(
        &self,
        family: EntityFamily,
        input: LeadDetails,
    ) -> AppResult<approvable_entity::Model> {
        input.validate()?;

        if !self.settings.current().await?.lead_posting_open {
            return Err(AppError::BadRequest(
                "Lead posting is currently closed".to_string(),
            ));
        }

        self.insert(family, &input, true).await
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        family: EntityFamily,
        payload: &T,
        application_submitted: bool,
    ) -> AppResult<approvable_entity::Model> {
        let model = approvable_entity::ActiveModel {
            id: Set(self.id_gen.generate()),
            family: Set(family),
            status: Set(ApprovalStatus::Pending),
            rejection_reason: Set(None),
            admin_comments: Set(None),
            is_business_application_submitted: Set(application_submitted),
            is_verified: Set(false),
            payload: Set(to_payload(payload)?),
            version: Set(1),
            created_at: Set(chrono::Utc::now().into()),
            reviewed_at: Set(None),
            reviewed_by: Set(None),
            updated_at: Set(None),
        };

        let created = self.repo.create(model).await?;

        tracing::info!(entity = family.label(), id = %created.id, "Entity submitted for approval");

        Ok(created)
    }
}

fn to_payload<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("Invalid payload: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use abcd_db::entities::platform_settings;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn lead() -> LeadDetails {
        LeadDetails {
            title: "Need 500 cotton bags".to_string(),
            description: None,
            category: "Packaging".to_string(),
            city: "Pune".to_string(),
            quantity: Some("500".to_string()),
            amount: Some(12_000),
            contact_name: "Asha".to_string(),
            contact_mobile: "9876543210".to_string(),
        }
    }

    fn settings(lead_posting_open: bool) -> platform_settings::Model {
        platform_settings::Model {
            id: platform_settings::PLATFORM_SETTINGS_ID.to_string(),
            site_name: "ABCD".to_string(),
            support_email: None,
            support_phone: None,
            registration_fee: 0,
            vendor_registration_open: true,
            lead_posting_open,
            updated_at: Utc::now().into(),
        }
    }

    fn stored(family: EntityFamily, gate: bool) -> approvable_entity::Model {
        approvable_entity::Model {
            id: "e1".to_string(),
            family,
            status: ApprovalStatus::Pending,
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

    #[test]
    fn test_invalid_registration_rejected() {
        let input = UserRegistration {
            full_name: String::new(),
            email: "not-an-email".to_string(),
            mobile: "123".to_string(),
            city: "Pune".to_string(),
            business_name: None,
            business_category: None,
            referred_by: None,
        };
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_post_lead_when_closed() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[settings(false)]])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let result = service.post_buy_lead(lead()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_post_sell_lead_starts_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[settings(true)]])
                .append_query_results([[stored(EntityFamily::SellLead, true)]])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let created = service.post_sell_lead(lead()).await.unwrap();

        assert_eq!(created.family, EntityFamily::SellLead);
        assert_eq!(created.status, ApprovalStatus::Pending);
    }

    fn application() -> BusinessApplication {
        BusinessApplication {
            category: "Textiles".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            gst_number: Some("27ABCDE1234F1Z5".to_string()),
            description: None,
            website: None,
        }
    }

    #[tokio::test]
    async fn test_submit_application_opens_gate() {
        let mut submitted = stored(EntityFamily::Vendor, true);
        submitted.version = 2;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored(EntityFamily::Vendor, false)], [submitted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let result = service
            .submit_vendor_application("e1", application())
            .await
            .unwrap();

        assert!(result.is_business_application_submitted);
        assert_eq!(result.status, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn test_resubmission_after_rejection_returns_to_pending() {
        let mut rejected = stored(EntityFamily::Vendor, true);
        rejected.status = ApprovalStatus::Rejected;
        rejected.rejection_reason = Some("GST number missing".to_string());
        let mut resubmitted = rejected.clone();
        resubmitted.status = ApprovalStatus::Pending;
        resubmitted.version = 2;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[rejected], [resubmitted]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let result = service
            .submit_vendor_application("e1", application())
            .await
            .unwrap();

        assert_eq!(result.status, ApprovalStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_application_keeps_approved_vendor() {
        let mut approved = stored(EntityFamily::Vendor, true);
        approved.status = ApprovalStatus::Approved;
        approved.is_verified = true;

        // No exec result: the vendor row must not be written
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[approved]])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let result = service.submit_vendor_application("e1", application()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_submit_application_while_under_review_is_conflict() {
        let mut reviewing = stored(EntityFamily::Vendor, true);
        reviewing.status = ApprovalStatus::UnderReview;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reviewing]])
                .into_connection(),
        );
        let service = IntakeService::new(db);

        let result = service.submit_vendor_application("e1", application()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
