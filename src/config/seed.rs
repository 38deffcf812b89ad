//! Admin account seeding.
//!
//! On a fresh database nobody can manage accounts, so the first admin comes
//! from `ADMIN_EMAIL` / `ADMIN_PASSWORD`. An existing account with that
//! email is left untouched.

use crate::{
    auth::LocalAuthProvider,
    errors::Result,
    models::{Role, UserAccount},
};
use std::env;
use tracing::{info, warn};

/// Credentials for the seeded admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    /// `ADMIN_EMAIL`
    pub email: String,
    /// `ADMIN_PASSWORD`
    pub password: String,
}

impl AdminSeed {
    /// Reads `ADMIN_EMAIL` and `ADMIN_PASSWORD`. `None` unless both are set
    /// and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let email = env::var("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty());
        let password = env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Some(Self { email, password }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must be set together; skipping admin seed");
                None
            }
            (None, None) => None,
        }
    }
}

/// Registers the admin unless an account with that email already exists.
/// Returns the created account, or `None` when nothing was written.
pub async fn seed_admin(
    provider: &LocalAuthProvider,
    seed: &AdminSeed,
) -> Result<Option<UserAccount>> {
    if let Some(existing) = provider.find_by_email(&seed.email).await? {
        info!("Admin seed skipped, {} already exists", existing.email);
        return Ok(None);
    }

    let account = provider
        .register(&seed.email, &seed.password, Role::Admin)
        .await?;
    info!("Seeded admin account {}", account.email);
    Ok(Some(account))
}
