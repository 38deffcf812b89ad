//! Database-backed auth provider.
//!
//! Accounts live in the `accounts` table with an Argon2 hash and a JSON
//! metadata document carrying the role. The provider holds a single client
//! session, like a browser tab does.

use super::{AccountAdmin, AuthClient, PasswordHasher, Session, normalize_email};
use crate::{
    config::settings::AccountSettings,
    entities::{Account, account},
    errors::{Error, Result},
    models::{Role, UserAccount},
};
use async_trait::async_trait;
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Local implementation of [`AuthClient`] and [`AccountAdmin`].
#[derive(Debug, Clone)]
pub struct LocalAuthProvider {
    db: DatabaseConnection,
    hasher: PasswordHasher,
    min_password_length: usize,
    session: Arc<RwLock<Option<Session>>>,
}

fn to_user_account(model: account::Model) -> UserAccount {
    UserAccount {
        role: Role::from_metadata(model.metadata.as_ref()),
        id: model.id,
        email: model.email,
        created_at: model.created_at,
    }
}

fn account_not_found(user_id: &str) -> Error {
    Error::NotFound {
        entity: "account",
        id: user_id.to_string(),
    }
}

fn map_unique_violation(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateEmail {
            email: email.to_string(),
        },
        _ => Error::Database(err),
    }
}

impl LocalAuthProvider {
    /// Provider over `db` with the default Argon2 cost.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: &AccountSettings) -> Self {
        Self {
            db,
            hasher: PasswordHasher::default(),
            min_password_length: settings.min_password_length,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the password hasher (tests use a low-cost one).
    #[must_use]
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    fn validate_email(email: &str) -> Result<String> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(Error::validation("email", "Email inválido"));
        }
        Ok(email)
    }

    fn validate_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.min_password_length {
            return Err(Error::validation(
                "password",
                format!(
                    "A senha deve ter pelo menos {} caracteres",
                    self.min_password_length
                ),
            ));
        }
        Ok(())
    }

    async fn find_account(&self, user_id: &str) -> Result<account::Model> {
        Account::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| account_not_found(user_id))
    }

    /// Looks up an account by (normalized) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(Account::find()
            .filter(account::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?
            .map(to_user_account))
    }

    /// Creates an account without touching the current session.
    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<UserAccount> {
        let email = Self::validate_email(email)?;
        self.validate_password(password)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::DuplicateEmail { email });
        }

        let now = chrono::Utc::now();
        let model = account::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.clone()),
            password_hash: Set(self.hasher.hash(password)?),
            metadata: Set(Some(role.to_metadata())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &email))?;
        info!("Registered account {} with role {:?}", inserted.email, role);
        Ok(to_user_account(inserted))
    }
}

#[async_trait]
impl AuthClient for LocalAuthProvider {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let email = normalize_email(email);
        let found = Account::find()
            .filter(account::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await?;

        let Some(model) = found else {
            debug!("Sign-in for unknown email");
            return Err(Error::InvalidCredentials);
        };
        if !self.hasher.verify(password, &model.password_hash) {
            debug!("Sign-in with wrong password");
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            user: to_user_account(model),
        };
        *self.session.write().await = Some(session.clone());
        info!("Signed in {} as {:?}", session.user.email, session.user.role);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<UserAccount> {
        self.register(email, password, role).await
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(previous) = self.session.write().await.take() {
            info!("Signed out {}", previous.user.email);
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<UserAccount>> {
        Ok(self.session.read().await.as_ref().map(|s| s.user.clone()))
    }
}

#[async_trait]
impl AccountAdmin for LocalAuthProvider {
    async fn list_accounts(&self) -> Result<Vec<UserAccount>> {
        let accounts = Account::find()
            .order_by_asc(account::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(accounts.into_iter().map(to_user_account).collect())
    }

    #[instrument(skip(self))]
    async fn set_role(&self, user_id: &str, role: Role) -> Result<()> {
        let model = self.find_account(user_id).await?;

        // Keep any other metadata keys intact.
        let mut metadata = match model.metadata.clone() {
            Some(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        metadata.insert("role".to_string(), serde_json::json!(role));

        let mut active: account::ActiveModel = model.into();
        active.metadata = Set(Some(serde_json::Value::Object(metadata)));
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_email(&self, user_id: &str, email: &str) -> Result<()> {
        let email = Self::validate_email(email)?;
        let model = self.find_account(user_id).await?;

        if let Some(existing) = self.find_by_email(&email).await? {
            if existing.id != user_id {
                return Err(Error::DuplicateEmail { email });
            }
        }

        let mut active: account::ActiveModel = model.into();
        active.email = Set(email.clone());
        active.updated_at = Set(chrono::Utc::now());
        active
            .update(&self.db)
            .await
            .map_err(|e| map_unique_violation(e, &email))?;
        Ok(())
    }

    #[instrument(skip(self, password))]
    async fn set_password(&self, user_id: &str, password: &str) -> Result<()> {
        self.validate_password(password)?;
        let model = self.find_account(user_id).await?;

        let mut active: account::ActiveModel = model.into();
        active.password_hash = Set(self.hasher.hash(password)?);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_account(&self, user_id: &str) -> Result<()> {
        let result = Account::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(account_not_found(user_id));
        }

        let mut session = self.session.write().await;
        if session.as_ref().is_some_and(|s| s.user.id == user_id) {
            warn!("Deleted the signed-in account, ending its session");
            *session = None;
        }
        Ok(())
    }
}
