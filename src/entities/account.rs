//! Account entity - Identities managed by the local auth provider.
//!
//! The role lives in `metadata` as `{"role": "admin" | "standard"}`; an
//! absent or unreadable role means `standard`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// UUID v4 identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Lower-cased, trimmed email address
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Free-form user metadata, carries the role claim
    pub metadata: Option<Json>,
    /// Registration time
    pub created_at: DateTimeUtc,
    /// Last change to email, password or role
    pub updated_at: DateTimeUtc,
}

/// Accounts have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
