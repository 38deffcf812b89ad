#![allow(clippy::result_large_err)]

use casa_catalog::{
    auth::LocalAuthProvider,
    config::{
        database::{create_connection, create_tables, get_database_url},
        seed::{AdminSeed, seed_admin},
        settings::load_default_settings,
    },
    core::property,
    errors::Result,
    models::ListScope,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Settings from config.toml, defaults when absent
    let settings = load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(
        "Settings loaded: images in {:?}, max {} per listing",
        settings.storage.directory, settings.listing.max_images
    );

    // 4. Database and schema
    let db = create_connection(&get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. First admin account, if requested
    let auth = LocalAuthProvider::new(db.clone(), &settings.accounts);
    if let Some(seed) = AdminSeed::from_env() {
        seed_admin(&auth, &seed)
            .await
            .inspect_err(|e| error!("Failed to seed admin account: {}", e))?;
    }

    // 6. Catalog summary
    let featured = property::list_featured(&db).await?;
    let all = property::list(&db, &auth, ListScope::Public).await?;
    info!(
        "Catalog ready: {} listings, {} featured",
        all.len(),
        featured.len()
    );

    Ok(())
}
