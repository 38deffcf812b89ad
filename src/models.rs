//! View shapes returned to callers and the inputs they send.
//!
//! Repository reads always go through [`PropertyView::assemble`], so every
//! caller sees the same normalized entity: ordered image URLs, features with
//! defaults applied, and the stored featured flag.

use crate::entities::{property, property_feature, property_image};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::entities::PropertyType;

/// Account role claim. Absent means [`Role::Standard`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to every listing and to account management
    Admin,
    /// Access to own listings only
    #[default]
    Standard,
}

impl Role {
    /// Reads the role claim from account metadata, defaulting to standard.
    #[must_use]
    pub fn from_metadata(metadata: Option<&serde_json::Value>) -> Self {
        metadata
            .and_then(|m| m.get("role"))
            .and_then(|r| serde_json::from_value(r.clone()).ok())
            .unwrap_or_default()
    }

    /// Metadata document carrying this role.
    #[must_use]
    pub fn to_metadata(self) -> serde_json::Value {
        serde_json::json!({ "role": self })
    }

    /// `true` for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Identity of whoever is invoking a mutating operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    /// Account id of the caller
    pub user_id: String,
    /// Role cached in the caller's session
    pub role: Role,
}

impl Caller {
    /// Caller with an explicit id and role.
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// Owner or admin.
    #[must_use]
    pub fn may_modify(&self, owner_id: &str) -> bool {
        self.role.is_admin() || self.user_id == owner_id
    }
}

/// Which listings `core::property::list` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListScope {
    /// Every listing, no session required
    Public,
    /// The caller's listings, or every listing for an admin
    Owned,
}

/// The six amenity flags of a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFeatures {
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
}

impl From<&property_feature::Model> for PropertyFeatures {
    fn from(row: &property_feature::Model) -> Self {
        Self {
            has_pool: row.has_pool,
            has_garden: row.has_garden,
            has_garage: row.has_garage,
            has_security_system: row.has_security_system,
            has_air_conditioning: row.has_air_conditioning,
            has_premium_appliances: row.has_premium_appliances,
        }
    }
}

/// A fully assembled listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    /// Listing id
    pub id: String,
    /// Account id of the owner
    pub owner_id: String,
    /// Headline shown on cards
    pub title: String,
    /// Free text, may be empty
    pub description: String,
    /// Asking price, or monthly rent for rentals
    pub price: f64,
    /// Neighborhood or address
    pub location: String,
    /// Sale or rent
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Number of bathrooms
    pub bathrooms: i32,
    /// Area in square meters
    pub area: f64,
    /// Image URLs in display order
    pub images: Vec<String>,
    /// Amenity flags, all false when never set
    pub features: PropertyFeatures,
    /// Shown in the home page carousel
    pub is_featured: bool,
    /// Broker phone as typed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_phone: Option<String>,
    /// Broker email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker_email: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl PropertyView {
    /// Builds the view from a property row and its related rows.
    ///
    /// `images` must already be in display order. Empty broker contacts read
    /// as absent.
    #[must_use]
    pub fn assemble(
        row: property::Model,
        images: Vec<property_image::Model>,
        features: Option<&property_feature::Model>,
    ) -> Self {
        Self {
            id: row.id,
            owner_id: row.user_id,
            title: row.title,
            description: row.description,
            price: row.price,
            location: row.location,
            property_type: row.property_type,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            area: row.area,
            images: images.into_iter().map(|img| img.image_url).collect(),
            features: features.map(PropertyFeatures::from).unwrap_or_default(),
            is_featured: row.is_featured,
            broker_phone: row.broker_phone.filter(|p| !p.is_empty()),
            broker_email: row.broker_email.filter(|e| !e.is_empty()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    /// Required, trimmed
    pub title: String,
    /// May be empty
    pub description: String,
    /// Non-negative
    pub price: f64,
    /// Required, trimmed
    pub location: String,
    /// Sale or rent
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Non-negative
    pub bedrooms: i32,
    /// Non-negative
    pub bathrooms: i32,
    /// Non-negative, in square meters
    pub area: f64,
    /// Image URLs in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Amenity flags
    #[serde(default)]
    pub features: PropertyFeatures,
    /// Subject to the featured policy for non-admins
    #[serde(default)]
    pub is_featured: bool,
    /// Blank reads as absent
    #[serde(default)]
    pub broker_phone: Option<String>,
    /// Blank reads as absent
    #[serde(default)]
    pub broker_email: Option<String>,
}

/// Partial update. Only `Some` fields are written.
///
/// `images`, when present, replaces the whole image set in the given order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New price
    pub price: Option<f64>,
    /// New location
    pub location: Option<String>,
    /// New listing type
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    /// New bedroom count
    pub bedrooms: Option<i32>,
    /// New bathroom count
    pub bathrooms: Option<i32>,
    /// New area
    pub area: Option<f64>,
    /// New featured flag
    pub is_featured: Option<bool>,
    /// New broker phone, blank clears it
    pub broker_phone: Option<String>,
    /// New broker email, blank clears it
    pub broker_email: Option<String>,
    /// Upserted features row
    pub features: Option<PropertyFeatures>,
    /// Replacement image set
    pub images: Option<Vec<String>>,
}

/// Result of an update: the primary row was written, secondary writes may
/// have been skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateOutcome {
    /// The listing as stored after the update
    pub property: PropertyView,
    /// One entry per swallowed secondary failure, empty when fully applied
    pub warnings: Vec<String>,
}

impl UpdateOutcome {
    /// `true` when no secondary write was skipped.
    #[must_use]
    pub fn is_fully_applied(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// An account as seen by the administration screens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account id
    pub id: String,
    /// Normalized email
    pub email: String,
    /// Role from account metadata
    pub role: Role,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_role_defaults_to_standard() {
        assert_eq!(Role::from_metadata(None), Role::Standard);
        let no_role = serde_json::json!({ "name": "x" });
        assert_eq!(Role::from_metadata(Some(&no_role)), Role::Standard);
        let bogus = serde_json::json!({ "role": "superuser" });
        assert_eq!(Role::from_metadata(Some(&bogus)), Role::Standard);
    }

    #[test]
    fn test_role_metadata_roundtrip() {
        let meta = Role::Admin.to_metadata();
        assert_eq!(meta["role"], "admin");
        assert_eq!(Role::from_metadata(Some(&meta)), Role::Admin);
    }

    #[test]
    fn test_caller_may_modify() {
        let owner = Caller::new("u1", Role::Standard);
        let other = Caller::new("u2", Role::Standard);
        let admin = Caller::new("u3", Role::Admin);
        assert!(owner.may_modify("u1"));
        assert!(!other.may_modify("u1"));
        assert!(admin.may_modify("u1"));
    }

    #[test]
    fn test_patch_deserializes_partial_json() {
        let patch: PropertyPatch =
            serde_json::from_str(r#"{"title":"X","type":"rent","images":["a.jpg"]}"#)
                .unwrap();
        assert_eq!(patch.title.as_deref(), Some("X"));
        assert_eq!(patch.property_type, Some(PropertyType::Rent));
        assert_eq!(patch.images, Some(vec!["a.jpg".to_string()]));
        assert!(patch.price.is_none());
        assert!(patch.features.is_none());
    }
}
