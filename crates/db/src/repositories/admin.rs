//! Admin account repository for super-admins and sub-admins.

use std::sync::Arc;

use crate::entities::{SubAdmin, SuperAdmin, sub_admin, super_admin};
use abcd_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, prelude::DateTimeWithTimeZone,
};

/// Admin account repository for database operations.
#[derive(Clone)]
pub struct AdminRepository {
    db: Arc<DatabaseConnection>,
}

impl AdminRepository {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // ========== Super-admins ==========

    /// Create a super-admin.
    pub async fn create_super_admin(
        &self,
        model: super_admin::ActiveModel,
    ) -> AppResult<super_admin::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a super-admin by ID.
    pub async fn find_super_admin(&self, id: &str) -> AppResult<Option<super_admin::Model>> {
        SuperAdmin::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a super-admin by email (case-insensitive, stored lowercase).
    pub async fn find_super_admin_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<super_admin::Model>> {
        SuperAdmin::find()
            .filter(super_admin::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count super-admins.
    pub async fn count_super_admins(&self) -> AppResult<u64> {
        SuperAdmin::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a successful super-admin sign-in.
    pub async fn touch_super_admin_login(
        &self,
        admin: super_admin::Model,
        at: DateTimeWithTimeZone,
    ) -> AppResult<super_admin::Model> {
        let mut model: super_admin::ActiveModel = admin.into();
        model.last_login = Set(Some(at));
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ========== Sub-admins ==========

    /// Create a sub-admin.
    pub async fn create_sub_admin(
        &self,
        model: sub_admin::ActiveModel,
    ) -> AppResult<sub_admin::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a sub-admin by ID.
    pub async fn find_sub_admin(&self, id: &str) -> AppResult<Option<sub_admin::Model>> {
        SubAdmin::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a sub-admin by ID.
    pub async fn get_sub_admin(&self, id: &str) -> AppResult<sub_admin::Model> {
        self.find_sub_admin(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-admin {id} not found")))
    }

    /// Find a sub-admin by email (stored lowercase).
    pub async fn find_sub_admin_by_email(
        &self,
        email: &str,
    ) -> AppResult<Option<sub_admin::Model>> {
        SubAdmin::find()
            .filter(sub_admin::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all sub-admins, newest first.
    pub async fn list_sub_admins(&self) -> AppResult<Vec<sub_admin::Model>> {
        SubAdmin::find()
            .order_by_desc(sub_admin::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a sub-admin.
    pub async fn update_sub_admin(
        &self,
        model: sub_admin::ActiveModel,
    ) -> AppResult<sub_admin::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a sub-admin.
    pub async fn delete_sub_admin(&self, id: &str) -> AppResult<()> {
        let result = SubAdmin::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Sub-admin {id} not found")));
        }

        Ok(())
    }
}
