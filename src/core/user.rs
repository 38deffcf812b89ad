//! User administration - admin-only account management.
//!
//! Every operation re-derives the caller's role from the auth client first
//! and fails with `Unauthorized` unless it is `admin`.

use crate::{
    auth::{AccountAdmin, AuthClient},
    errors::{Error, Result},
    models::{Role, UserAccount},
};
use tracing::{info, instrument, warn};

async fn require_admin<P>(provider: &P) -> Result<()>
where
    P: AuthClient + ?Sized,
{
    let role = provider.current_role().await?;
    if !role.is_admin() {
        warn!("Account management attempted with role {:?}", role);
        return Err(Error::Unauthorized {
            message: "Only administrators can manage users".to_string(),
        });
    }
    Ok(())
}

/// Lists every account with its role.
pub async fn list_users<P>(provider: &P) -> Result<Vec<UserAccount>>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    provider.list_accounts().await
}

/// Registers an account with `role`.
///
/// # Errors
/// `DuplicateEmail` if the email is taken, `Validation` if the password is
/// shorter than the provider's minimum.
#[instrument(skip(provider, password))]
pub async fn create_user<P>(
    provider: &P,
    email: &str,
    password: &str,
    role: Role,
) -> Result<UserAccount>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    let account = provider.sign_up(email, password, role).await?;
    info!("Admin created account {}", account.email);
    Ok(account)
}

/// Sets the account's role. Takes effect at its next sign-in.
#[instrument(skip(provider))]
pub async fn update_user_role<P>(provider: &P, user_id: &str, role: Role) -> Result<()>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    provider.set_role(user_id, role).await?;
    info!("Role of {} set to {:?}", user_id, role);
    Ok(())
}

/// Changes the account's login email.
#[instrument(skip(provider))]
pub async fn update_user_email<P>(provider: &P, user_id: &str, email: &str) -> Result<()>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    provider.set_email(user_id, email).await
}

/// Replaces the account's password.
#[instrument(skip(provider, password))]
pub async fn update_user_password<P>(provider: &P, user_id: &str, password: &str) -> Result<()>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    provider.set_password(user_id, password).await
}

/// Removes the account. Irreversible.
#[instrument(skip(provider))]
pub async fn delete_user<P>(provider: &P, user_id: &str) -> Result<()>
where
    P: AuthClient + AccountAdmin + ?Sized,
{
    require_admin(provider).await?;
    provider.delete_account(user_id).await?;
    info!("Deleted account {}", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_non_admin_is_unauthorized_everywhere() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = setup_test_auth(&db);

        // Signed out reads as standard
        assert!(matches!(
            list_users(&auth).await,
            Err(Error::Unauthorized { .. })
        ));

        let standard = register_and_sign_in(&auth, "ana@example.com", Role::Standard).await?;
        assert!(matches!(
            list_users(&auth).await,
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            create_user(&auth, "b@example.com", "segredo1", Role::Admin).await,
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            update_user_role(&auth, &standard.user_id, Role::Admin).await,
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            update_user_email(&auth, &standard.user_id, "x@example.com").await,
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            update_user_password(&auth, &standard.user_id, "novasenha").await,
            Err(Error::Unauthorized { .. })
        ));
        assert!(matches!(
            delete_user(&auth, &standard.user_id).await,
            Err(Error::Unauthorized { .. })
        ));

        // Nothing changed
        let stored = auth.find_by_email("ana@example.com").await?;
        assert_eq!(stored.map(|a| a.role), Some(Role::Standard));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_manages_accounts() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = setup_test_auth(&db);
        register_and_sign_in(&auth, "root@example.com", Role::Admin).await?;

        let created = create_user(&auth, "Novo@Example.com", "segredo1", Role::Standard).await?;
        assert_eq!(created.email, "novo@example.com");
        assert_eq!(created.role, Role::Standard);

        let duplicate = create_user(&auth, "novo@example.com", "segredo1", Role::Standard).await;
        assert!(matches!(duplicate, Err(Error::DuplicateEmail { .. })));

        let short = create_user(&auth, "curta@example.com", "123", Role::Standard).await;
        assert!(matches!(short, Err(Error::Validation { .. })));

        update_user_role(&auth, &created.id, Role::Admin).await?;
        update_user_email(&auth, &created.id, "renomeado@example.com").await?;
        update_user_password(&auth, &created.id, "outrasenha").await?;

        let users = list_users(&auth).await?;
        assert_eq!(users.len(), 2);
        let renamed = users.iter().find(|u| u.id == created.id);
        assert_eq!(
            renamed.map(|u| (u.email.as_str(), u.role)),
            Some(("renomeado@example.com", Role::Admin))
        );

        delete_user(&auth, &created.id).await?;
        assert_eq!(list_users(&auth).await?.len(), 1);
        let missing = delete_user(&auth, &created.id).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));
        assert_eq!(
            missing.map_err(|e| e.user_message()).err().as_deref(),
            Some("Usuário não encontrado")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_created_user_can_sign_in_with_new_password() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = setup_test_auth(&db);
        register_and_sign_in(&auth, "root@example.com", Role::Admin).await?;

        let created = create_user(&auth, "corretor@example.com", "segredo1", Role::Standard).await?;
        update_user_password(&auth, &created.id, "trocada1").await?;

        auth.sign_out().await?;
        let session = auth.sign_in("corretor@example.com", "trocada1").await?;
        assert_eq!(session.user.id, created.id);
        assert_eq!(session.user.role, Role::Standard);
        Ok(())
    }
}
