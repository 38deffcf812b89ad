//! Catalog view: filtering and sorting of already-loaded listings.

use crate::models::{PropertyType, PropertyView};
use std::str::FromStr;

/// Type filter of the catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    /// Both sale and rent
    #[default]
    All,
    /// Only this type
    Only(PropertyType),
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "sale" => Ok(Self::Only(PropertyType::Sale)),
            "rent" => Ok(Self::Only(PropertyType::Rent)),
            other => Err(format!("unknown type filter: {other}")),
        }
    }
}

/// Catalog ordering, parsed from `price-asc`, `price-desc` or `newest`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
    /// Most recently created first
    #[default]
    Newest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "newest" => Ok(Self::Newest),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// What the visitor typed and picked on the catalog page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Sale, rent or both
    pub type_filter: TypeFilter,
    /// Matched case-insensitively against location and title; blank matches all
    pub search: String,
    /// Ordering of the result
    pub sort: SortOrder,
}

impl CatalogQuery {
    fn matches(&self, property: &PropertyView) -> bool {
        if let TypeFilter::Only(wanted) = self.type_filter {
            if property.property_type != wanted {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || property.location.to_lowercase().contains(&needle)
            || property.title.to_lowercase().contains(&needle)
    }

    /// Filters then sorts. Ties keep their incoming order.
    #[must_use]
    pub fn apply(&self, properties: &[PropertyView]) -> Vec<PropertyView> {
        let mut result: Vec<PropertyView> = properties
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect();

        match self.sort {
            SortOrder::PriceAsc => result.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceDesc => result.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortOrder::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::PropertyFeatures;
    use chrono::{Duration, TimeZone, Utc};

    fn listing(
        id: &str,
        title: &str,
        location: &str,
        kind: PropertyType,
        price: f64,
        age_days: i64,
    ) -> PropertyView {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() - Duration::days(age_days);
        PropertyView {
            id: id.to_string(),
            owner_id: "owner".to_string(),
            title: title.to_string(),
            description: String::new(),
            price,
            location: location.to_string(),
            property_type: kind,
            bedrooms: 2,
            bathrooms: 1,
            area: 70.0,
            images: Vec::new(),
            features: PropertyFeatures::default(),
            is_featured: false,
            broker_phone: None,
            broker_email: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn sample() -> Vec<PropertyView> {
        vec![
            listing("a", "Casa no Lago", "Lago Sul", PropertyType::Sale, 900_000.0, 3),
            listing("b", "Apartamento central", "Asa Norte", PropertyType::Rent, 3_500.0, 1),
            listing("c", "Kitnet", "Águas Claras", PropertyType::Rent, 1_200.0, 7),
            listing("d", "Sobrado", "Lago Norte", PropertyType::Sale, 1_500_000.0, 0),
        ]
    }

    fn ids(properties: &[PropertyView]) -> Vec<&str> {
        properties.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_query_sorts_newest_first() {
        let result = CatalogQuery::default().apply(&sample());
        assert_eq!(ids(&result), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_type_filter_and_price_sort() {
        let query = CatalogQuery {
            type_filter: "rent".parse().unwrap(),
            sort: "price-asc".parse().unwrap(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec!["c", "b"]);

        let query = CatalogQuery {
            type_filter: "sale".parse().unwrap(),
            sort: "price-desc".parse().unwrap(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec!["d", "a"]);
    }

    #[test]
    fn test_search_matches_location_or_title_case_insensitively() {
        let query = CatalogQuery {
            search: "  LAGO ".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec!["d", "a"]);

        let query = CatalogQuery {
            search: "kit".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query.apply(&sample())), vec!["c"]);

        let query = CatalogQuery {
            search: "inexistente".to_string(),
            ..CatalogQuery::default()
        };
        assert!(query.apply(&sample()).is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!("cheapest".parse::<SortOrder>().is_err());
        assert!("lease".parse::<TypeFilter>().is_err());
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
    }
}
