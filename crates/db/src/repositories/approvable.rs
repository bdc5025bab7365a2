//! Approvable entity repository.

use std::sync::Arc;

use crate::entities::{
    ApprovableEntity,
    approvable_entity::{self, ApprovalStatus, EntityFamily},
};
use abcd_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Columns written together by one approval transition.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionWrite {
    pub status: ApprovalStatus,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    pub reviewed_by: Option<String>,
    pub is_verified: Option<bool>,
}

/// Repository for the shared approvable entity table.
#[derive(Clone)]
pub struct ApprovableRepository {
    db: Arc<DatabaseConnection>,
}

impl ApprovableRepository {
    /// Create a new approvable repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a new entity.
    pub async fn create(
        &self,
        model: approvable_entity::ActiveModel,
    ) -> AppResult<approvable_entity::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an entity of the given family by ID.
    pub async fn find_by_id(
        &self,
        family: EntityFamily,
        id: &str,
    ) -> AppResult<Option<approvable_entity::Model>> {
        ApprovableEntity::find_by_id(id)
            .filter(approvable_entity::Column::Family.eq(family))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an entity of the given family by ID.
    pub async fn get_by_id(
        &self,
        family: EntityFamily,
        id: &str,
    ) -> AppResult<approvable_entity::Model> {
        self.find_by_id(family, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {id} not found", family.label())))
    }

    /// List every entity of a family, newest first.
    ///
    /// Always returns the whole family so stats can be derived from the
    /// same read.
    pub async fn list(&self, family: EntityFamily) -> AppResult<Vec<approvable_entity::Model>> {
        ApprovableEntity::find()
            .filter(approvable_entity::Column::Family.eq(family))
            .order_by_desc(approvable_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a transition in a single `UPDATE`, guarded by the version read
    /// by the caller.
    ///
    /// Returns `Conflict` if the row changed since it was read.
    pub async fn apply_transition(
        &self,
        family: EntityFamily,
        id: &str,
        expected_version: i32,
        write: TransitionWrite,
    ) -> AppResult<approvable_entity::Model> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let mut update = ApprovableEntity::update_many()
            .col_expr(approvable_entity::Column::Status, Expr::value(write.status))
            .col_expr(
                approvable_entity::Column::Version,
                Expr::col(approvable_entity::Column::Version).add(1),
            )
            .col_expr(approvable_entity::Column::UpdatedAt, Expr::value(Some(now)));

        if let Some(reason) = write.rejection_reason {
            update = update.col_expr(
                approvable_entity::Column::RejectionReason,
                Expr::value(Some(reason)),
            );
        }
        if let Some(reviewed_at) = write.reviewed_at {
            update = update.col_expr(
                approvable_entity::Column::ReviewedAt,
                Expr::value(Some(reviewed_at)),
            );
        }
        if let Some(reviewer) = write.reviewed_by {
            update = update.col_expr(
                approvable_entity::Column::ReviewedBy,
                Expr::value(Some(reviewer)),
            );
        }
        if let Some(verified) = write.is_verified {
            update = update.col_expr(approvable_entity::Column::IsVerified, Expr::value(verified));
        }

        let result = update
            .filter(approvable_entity::Column::Id.eq(id))
            .filter(approvable_entity::Column::Family.eq(family))
            .filter(approvable_entity::Column::Version.eq(expected_version))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.missing_or_conflict(family, id).await);
        }

        self.get_by_id(family, id).await
    }

    /// Set the vendor application payload, open the gate and reset the
    /// entity to `pending`, in one guarded `UPDATE`.
    ///
    /// The row must still accept an application (gate closed, or rejected);
    /// otherwise nothing is written and a conflict is returned.
    pub async fn submit_application(
        &self,
        id: &str,
        expected_version: i32,
        payload: serde_json::Value,
    ) -> AppResult<approvable_entity::Model> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = ApprovableEntity::update_many()
            .col_expr(approvable_entity::Column::Payload, Expr::value(payload))
            .col_expr(
                approvable_entity::Column::IsBusinessApplicationSubmitted,
                Expr::value(true),
            )
            .col_expr(
                approvable_entity::Column::Status,
                Expr::value(ApprovalStatus::Pending),
            )
            .col_expr(approvable_entity::Column::IsVerified, Expr::value(false))
            .col_expr(
                approvable_entity::Column::Version,
                Expr::col(approvable_entity::Column::Version).add(1),
            )
            .col_expr(approvable_entity::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(approvable_entity::Column::Id.eq(id))
            .filter(approvable_entity::Column::Family.eq(EntityFamily::Vendor))
            .filter(approvable_entity::Column::Version.eq(expected_version))
            .filter(
                Condition::any()
                    .add(approvable_entity::Column::IsBusinessApplicationSubmitted.eq(false))
                    .add(approvable_entity::Column::Status.eq(ApprovalStatus::Rejected)),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(self.missing_or_conflict(EntityFamily::Vendor, id).await);
        }

        self.get_by_id(EntityFamily::Vendor, id).await
    }

    /// Replace the admin comments without touching the status.
    pub async fn set_admin_comments(
        &self,
        family: EntityFamily,
        id: &str,
        comments: Option<String>,
    ) -> AppResult<approvable_entity::Model> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = ApprovableEntity::update_many()
            .col_expr(approvable_entity::Column::AdminComments, Expr::value(comments))
            .col_expr(
                approvable_entity::Column::Version,
                Expr::col(approvable_entity::Column::Version).add(1),
            )
            .col_expr(approvable_entity::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(approvable_entity::Column::Id.eq(id))
            .filter(approvable_entity::Column::Family.eq(family))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("{} {id} not found", family.label())));
        }

        self.get_by_id(family, id).await
    }

    /// Delete an entity regardless of its status.
    pub async fn delete(&self, family: EntityFamily, id: &str) -> AppResult<()> {
        let result = ApprovableEntity::delete_many()
            .filter(approvable_entity::Column::Id.eq(id))
            .filter(approvable_entity::Column::Family.eq(family))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("{} {id} not found", family.label())));
        }

        Ok(())
    }

    async fn missing_or_conflict(&self, family: EntityFamily, id: &str) -> AppError {
        match self.find_by_id(family, id).await {
            Ok(Some(_)) => AppError::Conflict(format!(
                "{} {id} was modified by another admin, reload and retry",
                family.label()
            )),
            Ok(None) => AppError::NotFound(format!("{} {id} not found", family.label())),
            Err(e) => e,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_entity(id: &str, family: EntityFamily) -> approvable_entity::Model {
        approvable_entity::Model {
            id: id.to_string(),
            family,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            admin_comments: None,
            is_business_application_submitted: true,
            is_verified: false,
            payload: serde_json::json!({}),
            version: 1,
            created_at: Utc::now().into(),
            reviewed_at: None,
            reviewed_by: None,
            updated_at: None,
        }
    }

    fn approve_write() -> TransitionWrite {
        TransitionWrite {
            status: ApprovalStatus::Approved,
            rejection_reason: None,
            reviewed_at: Some(Utc::now().into()),
            reviewed_by: Some("admin1".to_string()),
            is_verified: None,
        }
    }

    #[tokio::test]
    async fn test_list_by_family() {
        let e1 = create_test_entity("e1", EntityFamily::BuyLead);
        let e2 = create_test_entity("e2", EntityFamily::BuyLead);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo.list(EntityFamily::BuyLead).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<approvable_entity::Model>::new()])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo.get_by_id(EntityFamily::User, "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_apply_transition_returns_updated_row() {
        let mut updated = create_test_entity("e1", EntityFamily::User);
        updated.status = ApprovalStatus::Approved;
        updated.version = 2;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo
            .apply_transition(EntityFamily::User, "e1", 1, approve_write())
            .await
            .unwrap();

        assert_eq!(result.status, ApprovalStatus::Approved);
        assert_eq!(result.version, 2);
    }

    #[tokio::test]
    async fn test_apply_transition_stale_version_is_conflict() {
        let current = create_test_entity("e1", EntityFamily::User);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[current]])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo
            .apply_transition(EntityFamily::User, "e1", 0, approve_write())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_apply_transition_missing_row_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([Vec::<approvable_entity::Model>::new()])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo
            .apply_transition(EntityFamily::User, "gone", 1, approve_write())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_application_on_approved_vendor_is_conflict() {
        // The guarded UPDATE matches nothing once the gate is open and the
        // vendor is not rejected
        let mut current = create_test_entity("e1", EntityFamily::Vendor);
        current.status = ApprovalStatus::Approved;
        current.is_verified = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[current]])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo
            .submit_application("e1", 1, serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_accepts_application() {
        let mut vendor = create_test_entity("e1", EntityFamily::Vendor);
        vendor.is_business_application_submitted = false;
        assert!(vendor.accepts_application());

        vendor.is_business_application_submitted = true;
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::UnderReview,
            ApprovalStatus::Approved,
        ] {
            vendor.status = status;
            assert!(!vendor.accepts_application(), "{status:?}");
        }

        vendor.status = ApprovalStatus::Rejected;
        assert!(vendor.accepts_application());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ApprovableRepository::new(db);
        let result = repo.delete(EntityFamily::SellLead, "gone").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
