//! Application settings loading from config.toml
//!
//! Every section is optional. A missing file yields the defaults, which match
//! the hosted deployment: 12 images per listing, 6-character passwords, and
//! featured listings left unrestricted.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Who may store `is_featured = true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedPolicy {
    /// The flag is stored exactly as the caller sent it
    #[default]
    Unrestricted,
    /// Only admins may set the flag; others get `Unauthorized`
    AdminOnly,
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Image file storage
    pub storage: StorageSettings,
    /// Listing rules
    pub listing: ListingSettings,
    /// Account rules
    pub accounts: AccountSettings,
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory uploaded images are written to
    pub directory: PathBuf,
    /// URL prefix under which `directory` is served
    pub public_base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("uploads"),
            public_base_url: "/uploads".to_string(),
        }
    }
}

/// `[listing]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    /// Image cap enforced by the listing form
    pub max_images: usize,
    /// Who may mark a listing as featured
    pub featured_policy: FeaturedPolicy,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            max_images: 12,
            featured_policy: FeaturedPolicy::default(),
        }
    }
}

/// `[accounts]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    /// Shortest accepted password, in characters
    pub min_password_length: usize,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            min_password_length: 6,
        }
    }
}

/// Loads settings from a TOML file, falling back to defaults when the file
/// does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::info!("No settings file at {:?}, using defaults", path_ref);
        return Ok(Settings::default());
    }

    tracing::debug!("Loading settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {path_ref:?}: {e}"),
    })
}

/// Loads settings from the default location (./config.toml)
pub fn load_default_settings() -> Result<Settings> {
    load_settings("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            [storage]
            directory = "/var/lib/casa/images"
            public_base_url = "https://cdn.example.com/property-images"

            [listing]
            max_images = 8
            featured_policy = "admin_only"

            [accounts]
            min_password_length = 10
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(
            settings.storage.directory,
            PathBuf::from("/var/lib/casa/images")
        );
        assert_eq!(
            settings.storage.public_base_url,
            "https://cdn.example.com/property-images"
        );
        assert_eq!(settings.listing.max_images, 8);
        assert_eq!(settings.listing.featured_policy, FeaturedPolicy::AdminOnly);
        assert_eq!(settings.accounts.min_password_length, 10);
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings = toml::from_str("[listing]\nmax_images = 4\n").unwrap();
        assert_eq!(settings.listing.max_images, 4);
        assert_eq!(settings.listing.featured_policy, FeaturedPolicy::Unrestricted);
        assert_eq!(settings.accounts.min_password_length, 6);
        assert_eq!(settings.storage.public_base_url, "/uploads");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = load_settings("definitely/not/here/config.toml").unwrap();
        assert_eq!(settings.listing.max_images, 12);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[listing\nmax_images = ").unwrap();
        assert!(matches!(load_settings(&path), Err(Error::Config { .. })));
    }
}
