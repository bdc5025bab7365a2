//! Content service: categories, cities and advertisements.
//!
//! Each record carries soft flags that admins toggle. Public listings only
//! show active records; an advertisement is active when it is both approved
//! and visible.

use std::sync::Arc;

use abcd_common::{AppResult, IdGenerator};
use abcd_db::{
    entities::{advertisement, category, city},
    repositories::ContentRepository,
};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use validator::Validate;

use crate::permission::{Action, Actor, authorize};

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input for creating a city.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CityInput {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    #[validate(length(min = 1, max = 128))]
    pub state: String,
}

/// Input for creating an advertisement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(url)]
    pub image_url: String,

    #[validate(url)]
    pub link_url: Option<String>,

    pub vendor_id: Option<String>,
}

/// Soft flag of an advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdFlag {
    Approved,
    Visible,
}

/// Service for admin-managed content.
#[derive(Clone)]
pub struct ContentService {
    repo: ContentRepository,
    id_gen: IdGenerator,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: ContentRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    // ========== Categories ==========

    pub async fn create_category(
        &self,
        actor: &Actor,
        input: CategoryInput,
    ) -> AppResult<category::Model> {
        authorize(actor, Action::ManageContent)?;
        input.validate()?;

        let model = category::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.repo.create_category(model).await
    }

    pub async fn list_categories(&self, actor: &Actor) -> AppResult<Vec<category::Model>> {
        authorize(actor, Action::ManageContent)?;
        self.repo.list_categories(false).await
    }

    pub async fn toggle_category_active(
        &self,
        actor: &Actor,
        id: &str,
    ) -> AppResult<category::Model> {
        authorize(actor, Action::ManageContent)?;

        let updated = self.repo.toggle_category_active(id).await?;

        tracing::info!(
            actor = %actor.id(),
            category = %id,
            is_active = updated.is_active,
            "Category toggled"
        );
        Ok(updated)
    }

    pub async fn delete_category(&self, actor: &Actor, id: &str) -> AppResult<()> {
        authorize(actor, Action::ManageContent)?;
        self.repo.delete_category(id).await
    }

    // ========== Cities ==========

    pub async fn create_city(&self, actor: &Actor, input: CityInput) -> AppResult<city::Model> {
        authorize(actor, Action::ManageContent)?;
        input.validate()?;

        let model = city::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            state: Set(input.state.trim().to_string()),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.repo.create_city(model).await
    }

    pub async fn list_cities(&self, actor: &Actor) -> AppResult<Vec<city::Model>> {
        authorize(actor, Action::ManageContent)?;
        self.repo.list_cities(false).await
    }

    pub async fn toggle_city_active(&self, actor: &Actor, id: &str) -> AppResult<city::Model> {
        authorize(actor, Action::ManageContent)?;

        let updated = self.repo.toggle_city_active(id).await?;

        tracing::info!(
            actor = %actor.id(),
            city = %id,
            is_active = updated.is_active,
            "City toggled"
        );
        Ok(updated)
    }

    pub async fn delete_city(&self, actor: &Actor, id: &str) -> AppResult<()> {
        authorize(actor, Action::ManageContent)?;
        self.repo.delete_city(id).await
    }

    // ========== Advertisements ==========

    /// Create an advertisement. New ads are visible but await approval.
    pub async fn create_ad(
        &self,
        actor: &Actor,
        input: AdInput,
    ) -> AppResult<advertisement::Model> {
        authorize(actor, Action::ManageContent)?;
        input.validate()?;

        let model = advertisement::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.trim().to_string()),
            image_url: Set(input.image_url),
            link_url: Set(input.link_url),
            vendor_id: Set(input.vendor_id),
            is_approved: Set(false),
            is_visible: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.repo.create_ad(model).await
    }

    pub async fn list_ads(&self, actor: &Actor) -> AppResult<Vec<advertisement::Model>> {
        authorize(actor, Action::ManageContent)?;
        self.repo.list_ads().await
    }

    /// Flip one soft flag of an advertisement, leaving the other as is.
    pub async fn toggle_ad(
        &self,
        actor: &Actor,
        id: &str,
        flag: AdFlag,
    ) -> AppResult<advertisement::Model> {
        authorize(actor, Action::ManageContent)?;

        let column = match flag {
            AdFlag::Approved => advertisement::Column::IsApproved,
            AdFlag::Visible => advertisement::Column::IsVisible,
        };
        let updated = self.repo.toggle_ad_flag(id, column).await?;

        tracing::info!(
            actor = %actor.id(),
            ad = %id,
            is_approved = updated.is_approved,
            is_visible = updated.is_visible,
            "Advertisement toggled"
        );
        Ok(updated)
    }

    pub async fn delete_ad(&self, actor: &Actor, id: &str) -> AppResult<()> {
        authorize(actor, Action::ManageContent)?;
        self.repo.delete_ad(id).await
    }

    // ========== Public listings ==========

    pub async fn active_categories(&self) -> AppResult<Vec<category::Model>> {
        self.repo.list_categories(true).await
    }

    pub async fn active_cities(&self) -> AppResult<Vec<city::Model>> {
        self.repo.list_cities(true).await
    }

    /// Ads that are approved and visible.
    pub async fn active_ads(&self) -> AppResult<Vec<advertisement::Model>> {
        let ads = self.repo.list_active_ads().await?;
        Ok(ads.into_iter().filter(advertisement::Model::is_active).collect())
    }
}
