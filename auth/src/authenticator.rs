use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::config::AuthConfig;
use crate::hasher::constant_time_equals;
use crate::hasher::Hasher;
use crate::hasher::HasherError;
use crate::token::TokenClaims;
use crate::token::TokenError;

/// Authentication coordinator over a [`Hasher`].
///
/// Provides the password and token use cases without touching
/// cryptographic primitives itself.
pub struct Authenticator {
    hasher: Hasher,
}

/// Stored password record. Owned and persisted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Credential {
    /// Base64 derived key
    pub hash: String,
    /// Base64 salt, fed to derivation as text
    pub salt: String,
}

/// Result of token issuance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssuedIdentity {
    /// Subject identifier the token was issued for
    pub id: String,
    /// Signed token
    pub token: String,
    /// Expiry in epoch milliseconds
    pub expires: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Hasher error: {0}")]
    HasherError(#[from] HasherError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Hashing and token parameters
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(config: AuthConfig) -> Self {
        Self::with_hasher(Hasher::new(config))
    }

    /// Create an authenticator around an existing hasher.
    pub fn with_hasher(hasher: Hasher) -> Self {
        Self { hasher }
    }

    /// Underlying hasher.
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `salt` - Salt stored with the hash
    /// * `expected_hash` - Stored hash
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `HasherError` - Key derivation failed
    pub fn validate_password(
        &self,
        password: &str,
        salt: &str,
        expected_hash: &str,
    ) -> Result<(), AuthenticationError> {
        let hashed = self
            .hasher
            .derive_hash(password.as_bytes(), salt.as_bytes())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                e
            })?;

        if !constant_time_equals(hashed.as_bytes(), expected_hash.as_bytes()) {
            tracing::debug!("Password mismatch");
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(())
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Existing salt to reuse, or `None` for a fresh random one
    ///
    /// # Returns
    /// Credential holding the hash and the salt it was derived with
    ///
    /// # Errors
    /// * `HasherError` - Salt generation or key derivation failed
    pub fn generate_credential(
        &self,
        password: &str,
        salt: Option<&str>,
    ) -> Result<Credential, AuthenticationError> {
        let salt = match salt {
            Some(salt) => salt.to_string(),
            None => self.hasher.random_salt()?,
        };

        let hash = self
            .hasher
            .derive_hash(password.as_bytes(), salt.as_bytes())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                e
            })?;

        tracing::debug!("Credential generated");

        Ok(Credential { hash, salt })
    }

    /// Issue a token valid from now.
    ///
    /// # Arguments
    /// * `subject_id` - Opaque principal identifier
    /// * `lifetime_seconds` - Validity window, or `None` for the configured default
    ///
    /// # Errors
    /// * `TokenError` - No secret key configured or encoding failed
    pub fn issue_token(
        &self,
        subject_id: &str,
        lifetime_seconds: Option<u64>,
    ) -> Result<IssuedIdentity, AuthenticationError> {
        self.issue_token_at(subject_id, lifetime_seconds, Utc::now())
    }

    /// Issue a token whose validity starts at `now`.
    ///
    /// `expires = now + lifetime` in epoch milliseconds.
    pub fn issue_token_at(
        &self,
        subject_id: &str,
        lifetime_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<IssuedIdentity, AuthenticationError> {
        let lifetime = lifetime_seconds.unwrap_or(self.hasher.config().token_lifetime_seconds);
        let lifetime = i64::try_from(lifetime)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                TokenError::InvalidClaim(format!("lifetime of {} seconds is too long", lifetime))
            })?;
        let expires = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| TokenError::InvalidClaim("expiry out of range".to_string()))?
            .timestamp_millis();

        let token = self.hasher.build_token(expires, subject_id)?;

        tracing::debug!(subject_id = %subject_id, expires, "Identity token issued");

        Ok(IssuedIdentity {
            id: subject_id.to_string(),
            token,
            expires,
        })
    }

    /// Verify password and issue a token with the default lifetime.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `HasherError` - Key derivation failed
    /// * `TokenError` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        credential: &Credential,
        subject_id: &str,
    ) -> Result<IssuedIdentity, AuthenticationError> {
        self.validate_password(password, &credential.salt, &credential.hash)?;
        self.issue_token(subject_id, None)
    }

    /// Validate a token against the current time.
    ///
    /// # Errors
    /// * `TokenError` - Token invalid, expired, or not verifiable
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.hasher.verify_token(token, Utc::now().timestamp_millis())
    }
}
