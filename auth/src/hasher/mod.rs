//! Cryptographic engine: key derivation, salts, comparison, and token signing.
//!
//! The only part of the crate that reads the secret key.

pub mod compare;
pub mod derivation;
pub mod errors;
pub mod signature;

use sha2::Digest;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::config::AuthConfig;

pub use compare::constant_time_equals;
pub use errors::HasherError;

/// Appended to the secret key before hashing it into the HMAC key.
///
/// Existing verifiers derive the same key, so this must not change.
pub const SIGNING_KEY_SUFFIX: &str = "JWTSig";

/// Immutable hashing and signing engine.
///
/// Holds no state beyond the configuration captured at construction and is
/// safe to share between threads.
pub struct Hasher {
    config: AuthConfig,
    signing_key: Option<Zeroizing<Vec<u8>>>,
}

impl Hasher {
    /// Create a hasher from configuration.
    ///
    /// Parameters are not checked here: derivation reports bad parameters as
    /// `DerivationError` and signing without a key as `ConfigError`. Use
    /// [`AuthConfig::validate`] to reject them up front.
    ///
    /// The secret key is moved out of the stored configuration and only the
    /// derived signing key is kept.
    pub fn new(mut config: AuthConfig) -> Self {
        let signing_key = config
            .secret_key
            .take()
            .map(Zeroizing::new)
            .filter(|key| !key.is_empty())
            .map(|key| derive_signing_key(&key));

        Self {
            config,
            signing_key,
        }
    }

    /// Configuration this hasher was built with, minus the secret key.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// `SHA-256(secret ++ "JWTSig")`.
fn derive_signing_key(secret: &str) -> Zeroizing<Vec<u8>> {
    let mut digest = Sha256::new();
    digest.update(secret.as_bytes());
    digest.update(SIGNING_KEY_SUFFIX.as_bytes());
    Zeroizing::new(digest.finalize().to_vec())
}
