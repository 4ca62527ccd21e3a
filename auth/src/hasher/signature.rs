use jsonwebtoken::crypto;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::HasherError;
use super::Hasher;
use crate::token::encoding::decode_segment;
use crate::token::encoding::encode_segment;
use crate::token::TokenClaims;
use crate::token::TokenError;
use crate::token::TokenHeader;

impl Hasher {
    /// Build a signed identity token.
    ///
    /// # Arguments
    /// * `expires_millis` - Expiry in epoch milliseconds
    /// * `subject_id` - Opaque subject identifier
    ///
    /// # Returns
    /// `header.payload.signature`, each segment base64url without padding
    ///
    /// # Errors
    /// * `EncodingFailed` - Header or payload could not be serialized
    /// * `Hasher(ConfigError)` - No secret key configured
    pub fn build_token(&self, expires_millis: i64, subject_id: &str) -> Result<String, TokenError> {
        let claims = TokenClaims {
            expires_millis,
            iss: self.config.token_issuer.clone(),
            ver: self.config.token_version,
            aud: self.config.token_audience.clone(),
            uid: subject_id.to_string(),
        };

        let signing_input = format!(
            "{}.{}",
            encode_segment(&TokenHeader::default())?,
            encode_segment(&claims)?
        );
        let signature = self.sign(&signing_input)?;

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Sign a message with HMAC-SHA256 under `SHA-256(secret ++ "JWTSig")`.
    ///
    /// # Returns
    /// URL-safe unpadded base64 of the MAC
    ///
    /// # Errors
    /// * `ConfigError` - No secret key configured
    pub fn sign(&self, message: &str) -> Result<String, HasherError> {
        let key = self.signing_key()?;

        crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(key),
            Algorithm::HS256,
        )
        .map_err(|e| HasherError::ConfigError(e.to_string()))
    }

    /// Verify a token issued by [`Hasher::build_token`] and return its claims.
    ///
    /// The signature is checked before anything in the token is parsed.
    ///
    /// # Arguments
    /// * `token` - Token string
    /// * `now_millis` - Current time in epoch milliseconds
    ///
    /// # Errors
    /// * `DecodingFailed` - Wrong segment count or undecodable segment
    /// * `InvalidSignature` - Signature does not match
    /// * `InvalidClaim` - Unexpected algorithm, audience, issuer, or version
    /// * `TokenExpired` - Expiry is at or before `now_millis`
    /// * `Hasher(ConfigError)` - No secret key configured
    pub fn verify_token(&self, token: &str, now_millis: i64) -> Result<TokenClaims, TokenError> {
        let (signing_input, signature) = split_token(token)?;
        let key = self.signing_key()?;

        let valid = crypto::verify(
            signature,
            signing_input.as_bytes(),
            &DecodingKey::from_secret(key),
            Algorithm::HS256,
        )
        .map_err(|e| TokenError::DecodingFailed(e.to_string()))?;
        if !valid {
            return Err(TokenError::InvalidSignature);
        }

        let (header, payload) = signing_input
            .split_once('.')
            .ok_or_else(|| TokenError::DecodingFailed("missing payload segment".to_string()))?;

        let header: TokenHeader = decode_segment(header)?;
        if header.alg != "HS256" {
            return Err(TokenError::InvalidClaim(format!(
                "unsupported alg {}",
                header.alg
            )));
        }

        let claims: TokenClaims = decode_segment(payload)?;
        if claims.aud != self.config.token_audience {
            return Err(TokenError::InvalidClaim("aud".to_string()));
        }
        if claims.iss != self.config.token_issuer {
            return Err(TokenError::InvalidClaim("iss".to_string()));
        }
        if claims.ver != self.config.token_version {
            return Err(TokenError::InvalidClaim("ver".to_string()));
        }
        if claims.is_expired(now_millis) {
            return Err(TokenError::TokenExpired);
        }

        Ok(claims)
    }

    /// Decode token claims without checking the signature.
    ///
    /// # Security Warning
    /// Only for logging and debugging. Never authorize on the result.
    pub fn decode_unverified(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let (signing_input, _) = split_token(token)?;
        let payload = signing_input
            .split_once('.')
            .map(|(_, payload)| payload)
            .ok_or_else(|| TokenError::DecodingFailed("missing payload segment".to_string()))?;

        decode_segment(payload)
    }

    fn signing_key(&self) -> Result<&[u8], HasherError> {
        self.signing_key
            .as_ref()
            .map(|key| key.as_slice())
            .ok_or_else(|| {
                HasherError::ConfigError("secret key must be defined to sign tokens".to_string())
            })
    }
}

/// Split into (`header.payload`, `signature`), requiring exactly three
/// non-empty segments.
fn split_token(token: &str) -> Result<(&str, &str), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return Err(TokenError::DecodingFailed(
            "token must have three segments".to_string(),
        ));
    }

    let boundary = segments[0].len() + 1 + segments[1].len();
    Ok((&token[..boundary], segments[2]))
}
