/// Process configuration, resolved once at startup
///
/// The API credential is mandatory: construction fails closed and the
/// application refuses to initialize without it, rather than failing later
/// at call time. Everything else has a default and an env override.

use std::env;

use thiserror::Error;

/// Model used for every naming request
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Generation service API root
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Relay used to fetch remote image URLs; the target URL travels
/// percent-encoded in the `url` query parameter
pub const DEFAULT_RELAY_BASE: &str = "https://api.allorigins.win/raw";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY (or GOOGLE_API_KEY) is not set; refusing to start")]
    MissingApiKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub relay_base: String,
}

impl Config {
    /// Resolve configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_env("GEMINI_API_KEY")
            .or_else(|| non_empty_env("GOOGLE_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            model: non_empty_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: base_url_env("GEMINI_API_BASE", DEFAULT_API_BASE),
            relay_base: base_url_env("IMAGE_RELAY_BASE", DEFAULT_RELAY_BASE),
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn base_url_env(name: &str, default: &str) -> String {
    non_empty_env(name)
        .map(|value| value.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}
