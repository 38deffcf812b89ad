//! Property image entity - (property, URL) pairs.
//!
//! `position` records insertion order, which is also the display order.
//! Duplicate URLs are allowed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Property image database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property_images")]
pub struct Model {
    /// Auto-increment row id
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning property
    #[sea_orm(indexed)]
    pub property_id: String,
    /// Public URL returned by the image store
    pub image_url: String,
    /// Zero-based display position
    pub position: i32,
    /// When the image was attached
    pub created_at: DateTimeUtc,
}

/// Defines relationships between PropertyImage and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each image belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
