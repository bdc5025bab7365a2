//! Platform settings service.

use abcd_common::{AppError, AppResult};
use abcd_db::entities::{platform_settings, platform_settings::PLATFORM_SETTINGS_ID};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::permission::{Action, Actor, authorize};

/// Input for updating platform settings. Absent fields are left unchanged.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsInput {
    #[validate(length(min = 1, max = 256))]
    pub site_name: Option<String>,
    #[validate(email)]
    pub support_email: Option<String>,
    #[validate(length(min = 10, max = 15))]
    pub support_phone: Option<String>,
    #[validate(range(min = 0))]
    pub registration_fee: Option<i64>,
    pub vendor_registration_open: Option<bool>,
    pub lead_posting_open: Option<bool>,
}

/// Service for the singleton settings record.
#[derive(Clone)]
pub struct SettingsService {
    db: Arc<DatabaseConnection>,
}

impl SettingsService {
    /// Create a new settings service.
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get settings for an admin.
    pub async fn get(&self, actor: &Actor) -> AppResult<platform_settings::Model> {
        authorize(actor, Action::ViewSettings)?;
        self.current().await
    }

    /// Current settings, creating the defaults on first use.
    pub async fn current(&self) -> AppResult<platform_settings::Model> {
        let settings = platform_settings::Entity::find_by_id(PLATFORM_SETTINGS_ID)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(s) = settings {
            return Ok(s);
        }

        let model = platform_settings::ActiveModel {
            id: Set(PLATFORM_SETTINGS_ID.to_string()),
            site_name: Set("ABCD".to_string()),
            support_email: Set(None),
            support_phone: Set(None),
            registration_fee: Set(0),
            vendor_registration_open: Set(true),
            lead_posting_open: Set(true),
            updated_at: Set(chrono::Utc::now().into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update settings.
    pub async fn update(
        &self,
        actor: &Actor,
        input: UpdateSettingsInput,
    ) -> AppResult<platform_settings::Model> {
        authorize(actor, Action::EditSettings)?;
        input.validate()?;

        let current = self.current().await?;
        let mut model: platform_settings::ActiveModel = current.into();

        if let Some(site_name) = input.site_name {
            model.site_name = Set(site_name);
        }
        if let Some(email) = input.support_email {
            model.support_email = Set(Some(email));
        }
        if let Some(phone) = input.support_phone {
            model.support_phone = Set(Some(phone));
        }
        if let Some(fee) = input.registration_fee {
            model.registration_fee = Set(fee);
        }
        if let Some(open) = input.vendor_registration_open {
            model.vendor_registration_open = Set(open);
        }
        if let Some(open) = input.lead_posting_open {
            model.lead_posting_open = Set(open);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        let updated = model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(actor = %actor.id(), "Platform settings updated");

        Ok(updated)
    }
}
