//! Property entity - A listing for sale or rent.
//!
//! The owning `user_id` is stamped at creation and never rewritten afterwards.
//! Images and features live in their own tables keyed by `property_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for sale or for rent.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Listed for sale
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Listed for rent
    #[sea_orm(string_value = "rent")]
    Rent,
}

/// Property database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// UUID v4 identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Account id of the owner
    #[sea_orm(indexed)]
    pub user_id: String,
    /// Headline of the listing
    pub title: String,
    /// Free-text description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Asking price, or monthly rent for rentals
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    /// Neighborhood or address
    pub location: String,
    /// Sale or rent, stored in the `type` column
    #[sea_orm(column_name = "type")]
    pub property_type: PropertyType,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Number of bathrooms
    pub bathrooms: i32,
    /// Area in square meters
    #[sea_orm(column_type = "Double")]
    pub area: f64,
    /// Whether the listing appears in the featured carousel
    pub is_featured: bool,
    /// Broker phone as typed, if any
    pub broker_phone: Option<String>,
    /// Broker email, if any
    pub broker_email: Option<String>,
    /// When the listing was created
    pub created_at: DateTimeUtc,
    /// When the listing was last updated
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Property and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One property has many images
    #[sea_orm(has_many = "super::property_image::Entity")]
    Images,
    /// One property has at most one features row
    #[sea_orm(has_one = "super::property_feature::Entity")]
    Features,
}

impl Related<super::property_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::property_feature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Features.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
