//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Creation is idempotent and safe to run on every start.

use crate::entities::{Account, Property, PropertyFeature, PropertyImage};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/casa_catalog.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database: {}", database_url);
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table_for<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(builder.build(&index)).await?;
    }
    Ok(())
}

/// Creates all catalog tables (parents before children).
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table_for(db, &schema, Account).await?;
    create_table_for(db, &schema, Property).await?;
    create_table_for(db, &schema, PropertyFeature).await?;
    create_table_for(db, &schema, PropertyImage).await?;

    info!("Catalog tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        AccountModel, PropertyFeatureModel, PropertyImageModel, PropertyModel,
    };
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<AccountModel> = Account::find().limit(1).all(&db).await?;
        let _: Vec<PropertyModel> = Property::find().limit(1).all(&db).await?;
        let _: Vec<PropertyFeatureModel> = PropertyFeature::find().limit(1).all(&db).await?;
        let _: Vec<PropertyImageModel> = PropertyImage::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
