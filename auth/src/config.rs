use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;

use crate::hasher::HasherError;

pub const DEFAULT_ITERATION_COUNT: u32 = 1000;
pub const DEFAULT_DERIVED_KEY_LENGTH: usize = 32;
pub const DEFAULT_TOKEN_AUDIENCE: &str = "Custom";
pub const DEFAULT_TOKEN_ISSUER: &str = "urn:microsoft:windows-azure:zumo";
pub const DEFAULT_TOKEN_VERSION: u32 = 2;
/// 20 minutes.
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: u64 = 20 * 60;

/// Hashing and token parameters.
///
/// Captured once by [`crate::Hasher::new`] and never mutated afterwards.
/// Every field has a default, so a configuration file only needs to name
/// what it overrides.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Root of the token signing key. Hashing works without it.
    pub secret_key: Option<String>,
    /// PBKDF2 work factor.
    pub iteration_count: u32,
    /// Bytes produced by key derivation, also the random salt size.
    pub derived_key_length: usize,
    pub token_audience: String,
    pub token_issuer: String,
    pub token_version: u32,
    /// Validity window used when the caller does not pass one.
    pub token_lifetime_seconds: u64,
}

impl AuthConfig {
    /// Create configuration with all defaults and no secret key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SECRET_KEY, AUTH__ITERATION_COUNT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// * `ConfigError` - A source could not be read or a value is invalid
    pub fn load() -> Result<Self, HasherError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("AUTH").separator("__"))
            .build()
            .map_err(|e| HasherError::ConfigError(e.to_string()))?;

        let config = Self::finish(configuration)?;

        tracing::info!(
            run_mode = %run_mode,
            iteration_count = config.iteration_count,
            derived_key_length = config.derived_key_length,
            token_lifetime_seconds = config.token_lifetime_seconds,
            has_secret_key = config.secret_key.is_some(),
            "Authentication configuration loaded"
        );

        Ok(config)
    }

    /// Load configuration from an in-memory TOML document.
    ///
    /// # Errors
    /// * `ConfigError` - The document is malformed or a value is invalid
    pub fn from_toml(document: &str) -> Result<Self, HasherError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()
            .map_err(|e| HasherError::ConfigError(e.to_string()))?;

        Self::finish(configuration)
    }

    fn finish(configuration: ConfigBuilder) -> Result<Self, HasherError> {
        let config: AuthConfig = configuration
            .try_deserialize()
            .map_err(|e| HasherError::ConfigError(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check parameters before they reach the hasher.
    ///
    /// A missing secret key is accepted (hashing-only use); a present but
    /// blank one is not.
    ///
    /// # Errors
    /// * `ConfigError` - First invalid field found
    pub fn validate(&self) -> Result<(), HasherError> {
        if matches!(&self.secret_key, Some(key) if key.is_empty()) {
            return Err(HasherError::ConfigError(
                "secret_key must not be empty".to_string(),
            ));
        }
        if self.iteration_count == 0 {
            return Err(HasherError::ConfigError(
                "iteration_count must be positive".to_string(),
            ));
        }
        if self.derived_key_length == 0 {
            return Err(HasherError::ConfigError(
                "derived_key_length must be positive".to_string(),
            ));
        }
        if self.token_audience.is_empty() {
            return Err(HasherError::ConfigError(
                "token_audience must not be empty".to_string(),
            ));
        }
        if self.token_issuer.is_empty() {
            return Err(HasherError::ConfigError(
                "token_issuer must not be empty".to_string(),
            ));
        }
        if self.token_lifetime_seconds == 0 {
            return Err(HasherError::ConfigError(
                "token_lifetime_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the signing secret.
    pub fn with_secret_key(mut self, secret_key: impl ToString) -> Self {
        self.secret_key = Some(secret_key.to_string());
        self
    }

    pub fn with_iteration_count(mut self, iteration_count: u32) -> Self {
        self.iteration_count = iteration_count;
        self
    }

    pub fn with_derived_key_length(mut self, derived_key_length: usize) -> Self {
        self.derived_key_length = derived_key_length;
        self
    }

    pub fn with_token_audience(mut self, audience: impl ToString) -> Self {
        self.token_audience = audience.to_string();
        self
    }

    pub fn with_token_issuer(mut self, issuer: impl ToString) -> Self {
        self.token_issuer = issuer.to_string();
        self
    }

    pub fn with_token_version(mut self, version: u32) -> Self {
        self.token_version = version;
        self
    }

    pub fn with_token_lifetime_seconds(mut self, seconds: u64) -> Self {
        self.token_lifetime_seconds = seconds;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            iteration_count: DEFAULT_ITERATION_COUNT,
            derived_key_length: DEFAULT_DERIVED_KEY_LENGTH,
            token_audience: DEFAULT_TOKEN_AUDIENCE.to_string(),
            token_issuer: DEFAULT_TOKEN_ISSUER.to_string(),
            token_version: DEFAULT_TOKEN_VERSION,
            token_lifetime_seconds: DEFAULT_TOKEN_LIFETIME_SECONDS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("iteration_count", &self.iteration_count)
            .field("derived_key_length", &self.derived_key_length)
            .field("token_audience", &self.token_audience)
            .field("token_issuer", &self.token_issuer)
            .field("token_version", &self.token_version)
            .field("token_lifetime_seconds", &self.token_lifetime_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new();

        assert!(config.secret_key.is_none());
        assert_eq!(config.iteration_count, 1000);
        assert_eq!(config.derived_key_length, 32);
        assert_eq!(config.token_audience, "Custom");
        assert_eq!(config.token_issuer, "urn:microsoft:windows-azure:zumo");
        assert_eq!(config.token_version, 2);
        assert_eq!(config.token_lifetime_seconds, 1200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = AuthConfig::from_toml(
            r#"
            secret_key = "topsecret"
            iteration_count = 5000
            token_audience = "mobile"
            "#,
        )
        .expect("Failed to load config");

        assert_eq!(config.secret_key.as_deref(), Some("topsecret"));
        assert_eq!(config.iteration_count, 5000);
        assert_eq!(config.token_audience, "mobile");
        // untouched fields keep their defaults
        assert_eq!(config.derived_key_length, 32);
        assert_eq!(config.token_lifetime_seconds, 1200);
    }

    #[test]
    fn test_from_toml_rejects_zero_iterations() {
        let result = AuthConfig::from_toml("iteration_count = 0");
        assert!(matches!(result, Err(HasherError::ConfigError(_))));
    }

    #[test]
    fn test_from_toml_rejects_malformed_document() {
        let result = AuthConfig::from_toml("iteration_count = \"many\"");
        assert!(matches!(result, Err(HasherError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_blank_secret() {
        let config = AuthConfig::new().with_secret_key("");
        assert!(matches!(
            config.validate(),
            Err(HasherError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_lengths() {
        assert!(AuthConfig::new()
            .with_derived_key_length(0)
            .validate()
            .is_err());
        assert!(AuthConfig::new()
            .with_token_lifetime_seconds(0)
            .validate()
            .is_err());
        assert!(AuthConfig::new().with_token_issuer("").validate().is_err());
    }

    // Environment variables are process-wide, so every `load` case lives in
    // this one test.
    #[test]
    fn test_load_from_environment() {
        env::set_var("AUTH__SECRET_KEY", "k");
        env::set_var("AUTH__ITERATION_COUNT", "5000");
        env::set_var("AUTH__TOKEN_LIFETIME_SECONDS", "60");

        let loaded = AuthConfig::load();

        env::set_var("AUTH__ITERATION_COUNT", "0");
        let rejected = AuthConfig::load();

        env::remove_var("AUTH__SECRET_KEY");
        env::remove_var("AUTH__ITERATION_COUNT");
        env::remove_var("AUTH__TOKEN_LIFETIME_SECONDS");

        let config = loaded.expect("Failed to load config");
        assert_eq!(config.secret_key.as_deref(), Some("k"));
        assert_eq!(config.iteration_count, 5000);
        assert_eq!(config.token_lifetime_seconds, 60);
        assert_eq!(config.derived_key_length, 32);
        assert_eq!(config.token_audience, "Custom");

        assert!(matches!(rejected, Err(HasherError::ConfigError(_))));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new().with_secret_key("topsecret");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("<redacted>"));
    }
}
