//! Admin session repository.

use std::sync::Arc;

use crate::entities::{
    AdminSession,
    admin_session::{self, ActorKind},
};
use abcd_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    prelude::DateTimeWithTimeZone,
};

/// Session repository for database operations.
#[derive(Clone)]
pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Store a new session.
    pub async fn create(
        &self,
        model: admin_session::ActiveModel,
    ) -> AppResult<admin_session::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a session that has not expired at `now`.
    pub async fn find_valid(
        &self,
        token: &str,
        now: DateTimeWithTimeZone,
    ) -> AppResult<Option<admin_session::Model>> {
        let session = AdminSession::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(session.filter(|s| s.expires_at > now))
    }

    /// Delete one session.
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        AdminSession::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete every session of one account.
    pub async fn delete_for_actor(&self, kind: ActorKind, actor_id: &str) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::ActorKind.eq(kind))
            .filter(admin_session::Column::ActorId.eq(actor_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Delete sessions that expired before `now`.
    pub async fn purge_expired(&self, now: DateTimeWithTimeZone) -> AppResult<u64> {
        let result = AdminSession::delete_many()
            .filter(admin_session::Column::ExpiresAt.lte(now))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
