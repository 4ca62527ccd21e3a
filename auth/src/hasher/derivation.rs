use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::errors::HasherError;
use super::Hasher;

impl Hasher {
    /// Derive a password hash with PBKDF2-HMAC-SHA256.
    ///
    /// # Arguments
    /// * `secret` - Plaintext secret
    /// * `salt` - Salt bytes (callers pass the stored salt string's bytes)
    ///
    /// # Returns
    /// Standard base64 of exactly `derived_key_length` derived bytes
    ///
    /// # Errors
    /// * `DerivationError` - Zero iteration count or zero output length
    pub fn derive_hash(&self, secret: &[u8], salt: &[u8]) -> Result<String, HasherError> {
        let iterations = self.config.iteration_count;
        if iterations == 0 {
            return Err(HasherError::DerivationError(
                "PBKDF2 iterations must be non-zero".to_string(),
            ));
        }
        let length = self.checked_output_length()?;

        let mut output = Zeroizing::new(vec![0u8; length]);
        pbkdf2::pbkdf2_hmac::<Sha256>(secret, salt, iterations, &mut output);

        Ok(STANDARD.encode(output.as_slice()))
    }

    /// Generate a random salt of `derived_key_length` bytes.
    ///
    /// Draws from the operating system CSPRNG only.
    ///
    /// # Returns
    /// Standard base64 of the random bytes
    ///
    /// # Errors
    /// * `DerivationError` - Zero output length
    /// * `EntropyError` - The OS random source failed
    pub fn random_salt(&self) -> Result<String, HasherError> {
        let length = self.checked_output_length()?;

        let mut bytes = vec![0u8; length];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| HasherError::EntropyError(e.to_string()))?;

        Ok(STANDARD.encode(&bytes))
    }

    fn checked_output_length(&self) -> Result<usize, HasherError> {
        match self.config.derived_key_length {
            0 => Err(HasherError::DerivationError(
                "derived key length must be positive".to_string(),
            )),
            length => Ok(length),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn hasher() -> Hasher {
        Hasher::new(AuthConfig::new().with_secret_key("topsecret"))
    }

    #[test]
    fn test_derive_hash_is_deterministic() {
        let hasher = hasher();

        let first = hasher
            .derive_hash(b"hunter2", b"fixedsalt")
            .expect("Failed to derive hash");
        let second = hasher
            .derive_hash(b"hunter2", b"fixedsalt")
            .expect("Failed to derive hash");

        assert_eq!(first, second);
    }

    #[test]
    fn test_derive_hash_differs_by_secret_and_salt() {
        let hasher = hasher();

        let base = hasher.derive_hash(b"hunter2", b"fixedsalt").unwrap();
        let other_secret = hasher.derive_hash(b"hunter3", b"fixedsalt").unwrap();
        let other_salt = hasher.derive_hash(b"hunter2", b"fixedsalu").unwrap();

        assert_ne!(base, other_secret);
        assert_ne!(base, other_salt);
    }

    #[test]
    fn test_derive_hash_honours_output_length() {
        let hasher = Hasher::new(AuthConfig::new().with_derived_key_length(64));

        let hash = hasher.derive_hash(b"hunter2", b"fixedsalt").unwrap();
        let decoded = STANDARD.decode(hash).unwrap();

        assert_eq!(decoded.len(), 64);
    }

    #[test]
    fn test_derive_hash_rejects_zero_iterations() {
        let hasher = Hasher::new(AuthConfig::new().with_iteration_count(0));

        let result = hasher.derive_hash(b"hunter2", b"fixedsalt");
        assert!(matches!(result, Err(HasherError::DerivationError(_))));
    }

    #[test]
    fn test_derive_hash_rejects_zero_length() {
        let hasher = Hasher::new(AuthConfig::new().with_derived_key_length(0));

        let result = hasher.derive_hash(b"hunter2", b"fixedsalt");
        assert!(matches!(result, Err(HasherError::DerivationError(_))));
    }

    #[test]
    fn test_derive_hash_accepts_empty_secret() {
        let hasher = hasher();
        assert!(hasher.derive_hash(b"", b"fixedsalt").is_ok());
    }

    #[test]
    fn test_random_salt_length_and_uniqueness() {
        let hasher = hasher();

        let first = hasher.random_salt().expect("Failed to generate salt");
        let second = hasher.random_salt().expect("Failed to generate salt");

        assert_ne!(first, second);
        assert_eq!(STANDARD.decode(&first).unwrap().len(), 32);
        assert_eq!(STANDARD.decode(&second).unwrap().len(), 32);
    }

    #[test]
    fn test_random_salt_rejects_zero_length() {
        let hasher = Hasher::new(AuthConfig::new().with_derived_key_length(0));
        assert!(matches!(
            hasher.random_salt(),
            Err(HasherError::DerivationError(_))
        ));
    }
}
