//! Application configuration module
//!
//! One explicit configuration object, built at startup and injected into the
//! application state. Re-configuring means building a new `AppConfig` and a
//! new state from it; nothing reads configuration from globals after startup.

use std::time::Duration;
use thiserror::Error;

/// Default quiet period before a debounced state save fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

/// Default cap on users sampled per deck-build call.
pub const DEFAULT_DECK_SAMPLE_CAP: usize = 20;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Quiet period between the last state mutation and the persistence
    /// write it triggers.
    pub save_debounce: Duration,
    /// Bounded scan size for deck building.
    pub deck_sample_cap: usize,
    /// Secret used to verify bearer tokens minted by the auth collaborator.
    pub jwt_secret: String,
    /// Endpoint of the AI tagging collaborator, if configured.
    pub tagging_endpoint: Option<String>,
    /// API key sent to the tagging collaborator.
    pub tagging_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            save_debounce: DEFAULT_DEBOUNCE,
            deck_sample_cap: DEFAULT_DECK_SAMPLE_CAP,
            jwt_secret: "change-me-in-production".to_string(),
            tagging_endpoint: None,
            tagging_api_key: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Read configuration from the environment. Missing values fall back to
    /// defaults; nothing here prevents startup.
    pub fn from_env() -> Self {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Ok(ms) = std::env::var("SAVE_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                builder = builder.save_debounce(Duration::from_millis(ms));
            }
        }
        if let Ok(cap) = std::env::var("DECK_SAMPLE_CAP") {
            if let Ok(cap) = cap.parse::<usize>() {
                builder = builder.deck_sample_cap(cap);
            }
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        } else {
            tracing::warn!("JWT_SECRET not set, using insecure default");
        }
        if let Ok(endpoint) = std::env::var("TAGGING_ENDPOINT") {
            builder = builder.tagging_endpoint(endpoint);
        }
        if let Ok(key) = std::env::var("TAGGING_API_KEY") {
            builder = builder.tagging_api_key(key);
        }
        // Defaults are always valid and overrides are range-checked below.
        builder.build().unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deck_sample_cap == 0 {
            return Err(ConfigError::MissingValue("deck_sample_cap"));
        }
        if self.save_debounce.is_zero() {
            return Err(ConfigError::MissingValue("save_debounce"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    save_debounce: Option<Duration>,
    deck_sample_cap: Option<usize>,
    jwt_secret: Option<String>,
    tagging_endpoint: Option<String>,
    tagging_api_key: Option<String>,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: String) -> Self {
        self.database_url = Some(url);
        self
    }

    pub fn save_debounce(mut self, debounce: Duration) -> Self {
        self.save_debounce = Some(debounce);
        self
    }

    pub fn deck_sample_cap(mut self, cap: usize) -> Self {
        self.deck_sample_cap = Some(cap);
        self
    }

    pub fn jwt_secret(mut self, secret: String) -> Self {
        self.jwt_secret = Some(secret);
        self
    }

    pub fn tagging_endpoint(mut self, endpoint: String) -> Self {
        self.tagging_endpoint = Some(endpoint);
        self
    }

    pub fn tagging_api_key(mut self, key: String) -> Self {
        self.tagging_api_key = Some(key);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url,
            save_debounce: self.save_debounce.unwrap_or(defaults.save_debounce),
            deck_sample_cap: self.deck_sample_cap.unwrap_or(defaults.deck_sample_cap),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            tagging_endpoint: self.tagging_endpoint,
            tagging_api_key: self.tagging_api_key,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config.save_debounce, DEFAULT_DEBOUNCE);
        assert_eq!(config.deck_sample_cap, DEFAULT_DECK_SAMPLE_CAP);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::builder()
            .save_debounce(Duration::from_millis(50))
            .deck_sample_cap(5)
            .build()
            .unwrap();
        assert_eq!(config.save_debounce, Duration::from_millis(50));
        assert_eq!(config.deck_sample_cap, 5);
    }

    #[test]
    fn test_zero_cap_rejected() {
        let result = AppConfig::builder().deck_sample_cap(0).build();
        assert!(result.is_err());
    }
}
