/// Database configuration and connection management
pub mod database;

/// Admin account seeding from environment variables
pub mod seed;

/// Application settings loaded from config.toml
pub mod settings;
