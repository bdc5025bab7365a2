//! Notifications sent to external collaborators after approval changes.
//!
//! Messaging, certificate generation and photo cleanup live outside this
//! service. They are notified after the change is committed; a failing hook
//! is logged and never undoes or fails the action.

use async_trait::async_trait;
use abcd_common::AppResult;
use abcd_db::entities::approvable_entity::{ApprovalStatus, EntityFamily};

/// A committed status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEvent {
    pub family: EntityFamily,
    pub id: String,
    pub actor_id: String,
    pub from: ApprovalStatus,
    pub to: ApprovalStatus,
    pub rejection_reason: Option<String>,
}

/// Receiver of approval events.
#[async_trait]
pub trait ApprovalHooks: Send + Sync {
    /// Called after a transition was written.
    async fn on_transition(&self, event: &TransitionEvent) -> AppResult<()>;

    /// Called after an entity was deleted, to clean up owned artifacts.
    async fn on_deleted(&self, family: EntityFamily, id: &str, actor_id: &str) -> AppResult<()>;
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Default)]
pub struct NoOpApprovalHooks;

#[async_trait]
impl ApprovalHooks for NoOpApprovalHooks {
    async fn on_transition(&self, _event: &TransitionEvent) -> AppResult<()> {
        Ok(())
    }

    async fn on_deleted(&self, _family: EntityFamily, _id: &str, _actor_id: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Hooks that emit a structured log event per change.
#[derive(Debug, Clone, Default)]
pub struct TracingApprovalHooks;

#[async_trait]
impl ApprovalHooks for TracingApprovalHooks {
    async fn on_transition(&self, event: &TransitionEvent) -> AppResult<()> {
        tracing::info!(
            target: "abcd::hooks",
            entity = event.family.label(),
            id = %event.id,
            actor = %event.actor_id,
            from = event.from.as_str(),
            to = event.to.as_str(),
            "Approval status changed"
        );
        Ok(())
    }

    async fn on_deleted(&self, family: EntityFamily, id: &str, actor_id: &str) -> AppResult<()> {
        tracing::info!(
            target: "abcd::hooks",
            entity = family.label(),
            id = %id,
            actor = %actor_id,
            "Entity deleted, owned artifacts released"
        );
        Ok(())
    }
}
