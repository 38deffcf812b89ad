//! Entity module - SeaORM entity definitions for the catalog tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// Accounts of the local auth provider
pub mod account;
/// Listings
pub mod property;
/// Amenity flags, one row per listing
pub mod property_feature;
/// Ordered image URLs of listings
pub mod property_image;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use property::{
    Column as PropertyColumn, Entity as Property, Model as PropertyModel, PropertyType,
};
pub use property_feature::{
    Column as PropertyFeatureColumn, Entity as PropertyFeature, Model as PropertyFeatureModel,
};
pub use property_image::{
    Column as PropertyImageColumn, Entity as PropertyImage, Model as PropertyImageModel,
};
