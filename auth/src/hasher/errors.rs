use thiserror::Error;

/// Error type for hashing and signing primitives.
#[derive(Debug, Clone, Error)]
pub enum HasherError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Key derivation failed: {0}")]
    DerivationError(String),

    #[error("Secure random source unavailable: {0}")]
    EntropyError(String),
}
