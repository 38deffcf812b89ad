//! Auth client contract and the local database-backed provider.
//!
//! Repositories only see the two traits here. [`AuthClient`] is the
//! per-session view (sign in/out, who am I), [`AccountAdmin`] is the
//! provider-side primitive set the user administration screens call.

mod local;
mod password;

pub use local::LocalAuthProvider;
pub use password::PasswordHasher;

use crate::errors::{Error, Result};
use crate::models::{Caller, Role, UserAccount};
use async_trait::async_trait;

/// An established session. The role is resolved once at sign-in and cached
/// for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in account with its role
    pub user: UserAccount,
}

impl Session {
    /// The session as a [`Caller`] for repository writes.
    #[must_use]
    pub fn caller(&self) -> Caller {
        Caller::new(self.user.id.clone(), self.user.role)
    }
}

/// Normalizes an email the way the provider stores it.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Session-level view of the identity provider.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Establishes a session. Fails with `InvalidCredentials` on a bad pair.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Registers an account with `role` in its metadata. Does not touch the
    /// current session. Fails with `DuplicateEmail` if the email is taken.
    async fn sign_up(&self, email: &str, password: &str, role: Role) -> Result<UserAccount>;

    /// Ends the current session. A no-op when signed out.
    async fn sign_out(&self) -> Result<()>;

    /// The signed-in account, if any.
    async fn current_user(&self) -> Result<Option<UserAccount>>;

    /// The session's role, `Standard` when signed out or unset.
    async fn current_role(&self) -> Result<Role> {
        Ok(self
            .current_user()
            .await?
            .map(|user| user.role)
            .unwrap_or_default())
    }

    /// The signed-in caller, or `Unauthenticated`.
    async fn caller(&self) -> Result<Caller> {
        self.current_user()
            .await?
            .map(|user| Caller::new(user.id, user.role))
            .ok_or(Error::Unauthenticated)
    }
}

/// Provider-side account primitives used by user administration.
#[async_trait]
pub trait AccountAdmin: Send + Sync {
    /// Every account, oldest first.
    async fn list_accounts(&self) -> Result<Vec<UserAccount>>;
    /// Writes `role` into the account metadata.
    async fn set_role(&self, user_id: &str, role: Role) -> Result<()>;
    /// Changes the login email. Fails with `DuplicateEmail` if taken.
    async fn set_email(&self, user_id: &str, email: &str) -> Result<()>;
    /// Replaces the password, subject to the minimum length.
    async fn set_password(&self, user_id: &str, password: &str) -> Result<()>;
    /// Irreversible.
    async fn delete_account(&self, user_id: &str) -> Result<()>;
}
