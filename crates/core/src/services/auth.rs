//! Admin authentication and cookie sessions.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use abcd_common::{AppError, AppResult, IdGenerator, config::SessionConfig};
use abcd_db::{
    entities::{admin_session, admin_session::ActorKind, super_admin},
    repositories::{AdminRepository, SessionRepository},
};
use sea_orm::{DatabaseConnection, Set, prelude::DateTimeWithTimeZone};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::permission::Actor;

/// Input for signing in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// A freshly created session.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_at: DateTimeWithTimeZone,
    pub actor: Actor,
}

/// Authentication service for super-admins and sub-admins.
#[derive(Clone)]
pub struct AuthService {
    admin_repo: AdminRepository,
    session_repo: SessionRepository,
    id_gen: IdGenerator,
    session_ttl: chrono::Duration,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, session: &SessionConfig) -> Self {
        Self {
            admin_repo: AdminRepository::new(Arc::clone(&db)),
            session_repo: SessionRepository::new(db),
            id_gen: IdGenerator::new(),
            session_ttl: chrono::Duration::hours(session.ttl_hours),
        }
    }

    /// Sign in a super-admin.
    pub async fn login_super_admin(&self, input: LoginInput) -> AppResult<LoginOutcome> {
        input.validate()?;

        let admin = self
            .admin_repo
            .find_super_admin_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &admin.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let now = chrono::Utc::now();
        let admin = self
            .admin_repo
            .touch_super_admin_login(admin, now.into())
            .await?;

        tracing::info!(actor = %admin.id, "Super-admin signed in");

        let actor = Actor::SuperAdmin {
            id: admin.id,
            email: admin.email,
        };
        self.open_session(ActorKind::SuperAdmin, actor).await
    }

    /// Sign in a sub-admin.
    ///
    /// A deactivated account is refused even with the right password.
    pub async fn login_sub_admin(&self, input: LoginInput) -> AppResult<LoginOutcome> {
        input.validate()?;

        let sub = self
            .admin_repo
            .find_sub_admin_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &sub.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !sub.is_active {
            tracing::info!(actor = %sub.id, "Deactivated sub-admin refused");
            return Err(AppError::Forbidden);
        }

        let mut model: abcd_db::entities::sub_admin::ActiveModel = sub.into();
        model.last_login = Set(Some(chrono::Utc::now().into()));
        let sub = self.admin_repo.update_sub_admin(model).await?;

        tracing::info!(actor = %sub.id, "Sub-admin signed in");

        self.open_session(ActorKind::SubAdmin, Actor::from(&sub))
            .await
    }

    async fn open_session(&self, kind: ActorKind, actor: Actor) -> AppResult<LoginOutcome> {
        let now = chrono::Utc::now();
        let expires_at: DateTimeWithTimeZone = (now + self.session_ttl).into();

        let session = admin_session::ActiveModel {
            token: Set(self.id_gen.generate_token()),
            actor_kind: Set(kind),
            actor_id: Set(actor.id().to_string()),
            created_at: Set(now.into()),
            expires_at: Set(expires_at),
        };
        let session = self.session_repo.create(session).await?;

        Ok(LoginOutcome {
            token: session.token,
            expires_at: session.expires_at,
            actor,
        })
    }

    /// End a session.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.session_repo.delete(token).await
    }

    /// Resolve a session token into the acting account.
    ///
    /// The account is re-read on every call, so deactivation and permission
    /// edits apply to sessions that are already open.
    pub async fn resolve_session(&self, token: &str) -> AppResult<Actor> {
        let session = self
            .session_repo
            .find_valid(token, chrono::Utc::now().into())
            .await?
            .ok_or(AppError::Unauthorized)?;

        match session.actor_kind {
            ActorKind::SuperAdmin => {
                let admin = self
                    .admin_repo
                    .find_super_admin(&session.actor_id)
                    .await?
                    .ok_or(AppError::Unauthorized)?;
                Ok(Actor::SuperAdmin {
                    id: admin.id,
                    email: admin.email,
                })
            }
            ActorKind::SubAdmin => {
                let sub = self
                    .admin_repo
                    .find_sub_admin(&session.actor_id)
                    .await?
                    .ok_or(AppError::Unauthorized)?;
                Ok(Actor::from(&sub))
            }
        }
    }

    /// Remove expired sessions.
    pub async fn purge_expired_sessions(&self) -> AppResult<u64> {
        self.session_repo
            .purge_expired(chrono::Utc::now().into())
            .await
    }

    /// Seed the first super-admin when none exists.
    pub async fn bootstrap_super_admin(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<Option<super_admin::Model>> {
        if self.admin_repo.count_super_admins().await? > 0 {
            return Ok(None);
        }

        let model = super_admin::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(hash_password(password)?),
            last_login: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        let admin = self.admin_repo.create_super_admin(model).await?;

        tracing::info!(actor = %admin.id, email = %admin.email, "Bootstrapped super-admin");

        Ok(Some(admin))
    }
}

/// Hash a password.
pub(crate) fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
