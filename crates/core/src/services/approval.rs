//! Approval service: reviews, deletion and listing of approvable entities.

use std::sync::Arc;

use abcd_common::AppResult;
use abcd_db::{
    entities::approvable_entity::{self, ApprovalStatus, EntityFamily},
    repositories::ApprovableRepository,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::{
    approval::{FamilyConfig, Plan, Transition, plan},
    hooks::{ApprovalHooks, NoOpApprovalHooks, TransitionEvent},
    permission::{Actor, authorize},
    stats::{self, ApprovalStats},
};

/// A family's entities together with stats derived from the same read.
#[derive(Debug, Clone)]
pub struct EntityList {
    pub items: Vec<approvable_entity::Model>,
    pub stats: ApprovalStats,
}

/// Stats for every family the actor may view.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<ApprovalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendors: Option<ApprovalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_leads: Option<ApprovalStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_leads: Option<ApprovalStats>,
}

/// Service running the approval state machine for all four families.
#[derive(Clone)]
pub struct ApprovalService {
    repo: ApprovableRepository,
    hooks: Arc<dyn ApprovalHooks>,
}

impl ApprovalService {
    /// Create a new approval service with no-op hooks.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            repo: ApprovableRepository::new(db),
            hooks: Arc::new(NoOpApprovalHooks),
        }
    }

    /// Replace the external collaborator hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn ApprovalHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// List a family with its stats, optionally filtered by status.
    ///
    /// Stats always cover the whole family, whatever the filter.
    pub async fn list(
        &self,
        actor: &Actor,
        family: EntityFamily,
        status: Option<ApprovalStatus>,
    ) -> AppResult<EntityList> {
        authorize(actor, FamilyConfig::of(family).view)?;

        let mut items = self.repo.list(family).await?;
        let stats = stats::compute(family, &items);

        if let Some(status) = status {
            items.retain(|e| e.status == status);
        }

        Ok(EntityList { items, stats })
    }

    /// Get one entity.
    pub async fn get(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
    ) -> AppResult<approvable_entity::Model> {
        authorize(actor, FamilyConfig::of(family).view)?;
        self.repo.get_by_id(family, id).await
    }

    /// Approve an entity.
    pub async fn approve(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
    ) -> AppResult<approvable_entity::Model> {
        self.review(actor, family, id, Transition::Approve).await
    }

    /// Reject an entity with a reason.
    pub async fn reject(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
        reason: &str,
    ) -> AppResult<approvable_entity::Model> {
        let transition = Transition::Reject {
            reason: reason.to_string(),
        };
        self.review(actor, family, id, transition).await
    }

    /// Move a vendor application to `under_review`.
    pub async fn mark_under_review(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
    ) -> AppResult<approvable_entity::Model> {
        self.review(actor, family, id, Transition::MarkUnderReview)
            .await
    }

    async fn review(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
        transition: Transition,
    ) -> AppResult<approvable_entity::Model> {
        authorize(actor, FamilyConfig::of(family).approve)?;

        let current = self.repo.get_by_id(family, id).await?;
        let write = match plan(&current, &transition, actor.id(), chrono::Utc::now().into())? {
            Plan::NoOp => {
                tracing::debug!(
                    entity = family.label(),
                    id = %id,
                    action = transition.name(),
                    "Entity already in requested state"
                );
                return Ok(current);
            }
            Plan::Apply(write) => write,
        };

        let updated = self
            .repo
            .apply_transition(family, id, current.version, write)
            .await?;

        tracing::info!(
            entity = family.label(),
            id = %id,
            actor = %actor.id(),
            from = current.status.as_str(),
            to = updated.status.as_str(),
            "Approval transition applied"
        );

        let event = TransitionEvent {
            family,
            id: updated.id.clone(),
            actor_id: actor.id().to_string(),
            from: current.status,
            to: updated.status,
            rejection_reason: updated.rejection_reason.clone(),
        };
        if let Err(e) = self.hooks.on_transition(&event).await {
            tracing::warn!(error = %e, entity = family.label(), id = %id, "Approval hook failed");
        }

        Ok(updated)
    }

    /// Replace the admin comments; blank comments clear them.
    pub async fn set_admin_comments(
        &self,
        actor: &Actor,
        family: EntityFamily,
        id: &str,
        comments: Option<&str>,
    ) -> AppResult<approvable_entity::Model> {
        authorize(actor, FamilyConfig::of(family).edit)?;

        let comments = comments
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);

        self.repo.set_admin_comments(family, id, comments).await
    }

    /// Delete an entity from any status.
    pub async fn delete(&self, actor: &Actor, family: EntityFamily, id: &str) -> AppResult<()> {
        authorize(actor, FamilyConfig::of(family).delete)?;

        self.repo.delete(family, id).await?;

        tracing::info!(entity = family.label(), id = %id, actor = %actor.id(), "Entity deleted");

        if let Err(e) = self.hooks.on_deleted(family, id, actor.id()).await {
            tracing::warn!(error = %e, entity = family.label(), id = %id, "Cleanup hook failed");
        }

        Ok(())
    }

    /// Stats of every family the actor may view; the others are omitted.
    pub async fn dashboard(&self, actor: &Actor) -> AppResult<DashboardStats> {
        let mut dashboard = DashboardStats::default();

        for family in EntityFamily::ALL {
            if authorize(actor, FamilyConfig::of(family).view).is_err() {
                continue;
            }
            let rows = self.repo.list(family).await?;
            let family_stats = Some(stats::compute(family, &rows));
            match family {
                EntityFamily::User => dashboard.users = family_stats,
                EntityFamily::Vendor => dashboard.vendors = family_stats,
                EntityFamily::BuyLead => dashboard.buy_leads = family_stats,
                EntityFamily::SellLead => dashboard.sell_leads = family_stats,
            }
        }

        Ok(dashboard)
    }
}
