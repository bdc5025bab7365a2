//! Sub-admin account management, reserved to super-admins.

use std::sync::Arc;

use abcd_common::{AppError, AppResult, IdGenerator};
use abcd_db::{
    entities::{admin_session::ActorKind, sub_admin},
    repositories::{AdminRepository, SessionRepository},
};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;
use validator::Validate;

use crate::{
    permission::{Action, Actor, Permissions, authorize},
    services::auth::hash_password,
};

/// Input for creating a sub-admin.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubAdminInput {
    #[validate(length(min = 1, max = 128))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 10, max = 15))]
    pub mobile: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[serde(default)]
    pub permissions: Permissions,
}

/// Input for editing a sub-admin. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubAdminInput {
    #[validate(length(min = 1, max = 128))]
    pub full_name: Option<String>,

    #[validate(length(min = 10, max = 15))]
    pub mobile: Option<String>,

    pub permissions: Option<Permissions>,
}

/// Service managing sub-admin accounts.
#[derive(Clone)]
pub struct SubAdminService {
    admin_repo: AdminRepository,
    session_repo: SessionRepository,
    id_gen: IdGenerator,
}

impl SubAdminService {
    /// Create a new sub-admin service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            admin_repo: AdminRepository::new(Arc::clone(&db)),
            session_repo: SessionRepository::new(db),
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a sub-admin with its initial permissions.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateSubAdminInput,
    ) -> AppResult<sub_admin::Model> {
        authorize(actor, Action::ManageSubAdmins)?;
        input.validate()?;

        let email = input.email.trim().to_lowercase();
        if self.admin_repo.find_sub_admin_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A sub-admin with email {email} already exists"
            )));
        }

        let mut model = sub_admin::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name.trim().to_string()),
            email: Set(email),
            mobile: Set(input.mobile),
            password_hash: Set(hash_password(&input.password)?),
            is_active: Set(true),
            created_by: Set(actor.id().to_string()),
            last_login: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };
        input.permissions.write_to(&mut model);

        let created = self.admin_repo.create_sub_admin(model).await?;

        tracing::info!(actor = %actor.id(), sub_admin = %created.id, "Sub-admin created");

        Ok(created)
    }

    /// List sub-admins.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<sub_admin::Model>> {
        authorize(actor, Action::ManageSubAdmins)?;
        self.admin_repo.list_sub_admins().await
    }

    /// Get a sub-admin.
    pub async fn get(&self, actor: &Actor, id: &str) -> AppResult<sub_admin::Model> {
        authorize(actor, Action::ManageSubAdmins)?;
        self.admin_repo.get_sub_admin(id).await
    }

    /// Edit profile fields or replace the permission record.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        input: UpdateSubAdminInput,
    ) -> AppResult<sub_admin::Model> {
        authorize(actor, Action::ManageSubAdmins)?;
        input.validate()?;

        let sub = self.admin_repo.get_sub_admin(id).await?;
        let mut model: sub_admin::ActiveModel = sub.into();

        if let Some(full_name) = input.full_name {
            model.full_name = Set(full_name.trim().to_string());
        }
        if let Some(mobile) = input.mobile {
            model.mobile = Set(mobile);
        }
        if let Some(permissions) = input.permissions {
            permissions.write_to(&mut model);
        }
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.admin_repo.update_sub_admin(model).await?;

        tracing::info!(actor = %actor.id(), sub_admin = %id, "Sub-admin updated");

        Ok(updated)
    }

    /// Flip `is_active`. Deactivation also ends the account's sessions.
    pub async fn toggle_active(&self, actor: &Actor, id: &str) -> AppResult<sub_admin::Model> {
        authorize(actor, Action::ManageSubAdmins)?;

        let sub = self.admin_repo.get_sub_admin(id).await?;
        let is_active = !sub.is_active;

        let mut model: sub_admin::ActiveModel = sub.into();
        model.is_active = Set(is_active);
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        let updated = self.admin_repo.update_sub_admin(model).await?;

        if !is_active {
            self.session_repo
                .delete_for_actor(ActorKind::SubAdmin, id)
                .await?;
        }

        tracing::info!(actor = %actor.id(), sub_admin = %id, is_active, "Sub-admin toggled");

        Ok(updated)
    }

    /// Set a new password and end the account's sessions.
    pub async fn reset_password(&self, actor: &Actor, id: &str, password: &str) -> AppResult<()> {
        authorize(actor, Action::ManageSubAdmins)?;

        if password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let sub = self.admin_repo.get_sub_admin(id).await?;
        let mut model: sub_admin::ActiveModel = sub.into();
        model.password_hash = Set(hash_password(password)?);
        model.updated_at = Set(Some(chrono::Utc::now().into()));
        self.admin_repo.update_sub_admin(model).await?;

        self.session_repo
            .delete_for_actor(ActorKind::SubAdmin, id)
            .await?;

        tracing::info!(actor = %actor.id(), sub_admin = %id, "Sub-admin password reset");

        Ok(())
    }

    /// Delete a sub-admin and its sessions.
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        authorize(actor, Action::ManageSubAdmins)?;

        self.session_repo
            .delete_for_actor(ActorKind::SubAdmin, id)
            .await?;
        self.admin_repo.delete_sub_admin(id).await?;

        tracing::info!(actor = %actor.id(), sub_admin = %id, "Sub-admin deleted");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn root() -> Actor {
        Actor::SuperAdmin {
            id: "root".to_string(),
            email: "root@abcd.in".to_string(),
        }
    }

    fn row(is_active: bool) -> sub_admin::Model {
        sub_admin::Model {
            id: "s1".to_string(),
            full_name: "Ops".to_string(),
            email: "ops@abcd.in".to_string(),
            mobile: "9876543210".to_string(),
            password_hash: "hash".to_string(),
            is_active,
            can_view_users: false,
            can_edit_users: false,
            can_delete_users: false,
            can_approve_users: false,
            can_view_vendors: false,
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
            created_by: "root".to_string(),
            last_login: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn input() -> CreateSubAdminInput {
        CreateSubAdminInput {
            full_name: "Ops".to_string(),
            email: "Ops@abcd.in".to_string(),
            mobile: "9876543210".to_string(),
            password: "long-enough".to_string(),
            permissions: Permissions::none(),
        }
    }

    #[tokio::test]
    async fn test_sub_admin_cannot_create_sub_admins() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SubAdminService::new(db);

        let actor = Actor::from(&row(true));
        let result = service.create(&actor, input()).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row(true)]])
                .into_connection(),
        );
        let service = SubAdminService::new(db);

        let result = service.create(&root(), input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_with_permission_draft() {
        let mut created = row(true);
        created.can_view_users = true;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<sub_admin::Model>::new()])
                .append_query_results([[created]])
                .into_connection(),
        );
        let service = SubAdminService::new(db);

        let mut input = input();
        input.permissions = Permissions {
            can_view_users: true,
            ..Permissions::none()
        };
        let result = service.create(&root(), input).await.unwrap();

        assert!(result.can_view_users);
        assert!(!result.can_edit_users);
    }

    #[tokio::test]
    async fn test_deactivate_ends_sessions() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row(true)], [row(false)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );
        let service = SubAdminService::new(db);

        let result = service.toggle_active(&root(), "s1").await.unwrap();

        assert!(!result.is_active);
    }

    #[tokio::test]
    async fn test_reset_password_too_short() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SubAdminService::new(db);

        let result = service.reset_password(&root(), "s1", "short").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
