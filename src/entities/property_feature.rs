//! Property features entity - Six amenity flags per property.
//!
//! `property_id` is the primary key, so a property can never have more than
//! one features row. A missing row reads as all flags false.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Property features database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property_features")]
pub struct Model {
    /// Owning property, also the primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub property_id: String,
    /// Swimming pool
    pub has_pool: bool,
    /// Garden or yard
    pub has_garden: bool,
    /// Covered parking
    pub has_garage: bool,
    /// Alarm or monitored security
    pub has_security_system: bool,
    /// Air conditioning
    pub has_air_conditioning: bool,
    /// High-end kitchen appliances
    pub has_premium_appliances: bool,
    /// When the row was first written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between PropertyFeature and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Features belong to one property
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
