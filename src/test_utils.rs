//! Shared test utilities for `casa-catalog`.
//!
//! Helpers for an in-memory database, a cheap-to-hash auth provider and
//! listings with sensible defaults.

use crate::{
    auth::{AuthClient, LocalAuthProvider, PasswordHasher},
    config::{database, settings::AccountSettings},
    core::property,
    errors::Result,
    models::{Caller, NewProperty, PropertyFeatures, PropertyType, PropertyView, Role},
};
use argon2::Params;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing_subscriber::EnvFilter;

/// Password used by [`register_and_sign_in`].
pub const TEST_PASSWORD: &str = "segredo1";

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Auth provider over `db` with default account settings and minimal
/// Argon2 cost.
pub fn setup_test_auth(db: &DatabaseConnection) -> LocalAuthProvider {
    let params = Params::new(8, 1, 1, None).unwrap_or_default();
    LocalAuthProvider::new(db.clone(), &AccountSettings::default())
        .with_hasher(PasswordHasher::with_params(params))
}

/// Registers an account with [`TEST_PASSWORD`], signs it in and returns
/// the resulting caller.
pub async fn register_and_sign_in(
    auth: &LocalAuthProvider,
    email: &str,
    role: Role,
) -> Result<Caller> {
    auth.sign_up(email, TEST_PASSWORD, role).await?;
    let session = auth.sign_in(email, TEST_PASSWORD).await?;
    Ok(session.caller())
}

/// A sale listing with no images, default features and not featured.
///
/// # Defaults
/// * price: 450000.0
/// * location: "Asa Sul"
/// * 3 bedrooms, 2 bathrooms, 95 m²
pub fn sample_property(title: &str) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: format!("{title} bem localizada"),
        price: 450_000.0,
        location: "Asa Sul".to_string(),
        property_type: PropertyType::Sale,
        bedrooms: 3,
        bathrooms: 2,
        area: 95.0,
        images: Vec::new(),
        features: PropertyFeatures::default(),
        is_featured: false,
        broker_phone: None,
        broker_email: None,
    }
}

/// Creates [`sample_property`] owned by `caller`.
pub async fn create_test_property(
    db: &DatabaseConnection,
    caller: &Caller,
    title: &str,
) -> Result<PropertyView> {
    property::create(
        db,
        sample_property(title),
        caller,
        crate::config::settings::FeaturedPolicy::Unrestricted,
    )
    .await
}

/// Makes every later insert into `table` fail, to exercise partial writes.
pub async fn reject_inserts_into(db: &DatabaseConnection, table: &str) -> Result<()> {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_{table} BEFORE INSERT ON {table} \
         BEGIN SELECT RAISE(ABORT, 'insert rejected'); END;"
    ))
    .await?;
    Ok(())
}
