//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PIX_KEY` (required): the merchant's random PIX key (a UUID string),
///   embedded in every generated BR Code
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `MERCHANT_NAME` (optional): merchant name for field 59, defaults to "COMPIA STORE"
/// - `MERCHANT_CITY` (optional): merchant city for field 60, defaults to "SAO PAULO"
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pix_key: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,

    #[serde(default = "default_merchant_city")]
    pub merchant_city: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_merchant_name() -> String {
    "COMPIA STORE".to_string()
}

fn default_merchant_city() -> String {
    "SAO PAULO".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., PIX_KEY)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: pix_key -> PIX_KEY
        envy::from_env::<Config>()
    }
}
