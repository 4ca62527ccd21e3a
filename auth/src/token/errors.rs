use thiserror::Error;

use crate::hasher::HasherError;

/// Error type for token issuance and verification.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token claim is invalid: {0}")]
    InvalidClaim(String),

    #[error(transparent)]
    Hasher(#[from] HasherError),
}
