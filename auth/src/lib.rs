//! Credential hashing and signed identity tokens
//!
//! Provides the security core a custom-login service sits on:
//! - Password hashing (PBKDF2-HMAC-SHA256) with random salts
//! - Constant-time hash comparison
//! - Compact HS256 identity tokens with expiry
//!
//! The calling service owns credential storage, token transport, and
//! revocation; this crate only derives, compares, signs, and verifies.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use custom_auth::{AuthConfig, Authenticator};
//!
//! let auth = Authenticator::new(AuthConfig::new());
//! let credential = auth.generate_credential("my_password", None).unwrap();
//! auth.validate_password("my_password", &credential.salt, &credential.hash)
//!     .unwrap();
//! ```
//!
//! ## Identity Tokens
//! ```
//! use custom_auth::{AuthConfig, Authenticator};
//!
//! let auth = Authenticator::new(AuthConfig::new().with_secret_key("master_key"));
//! let issued = auth.issue_token("user123", Some(60)).unwrap();
//! let claims = auth.validate_token(&issued.token).unwrap();
//! assert_eq!(claims.uid, "user123");
//! ```

pub mod authenticator;
pub mod config;
pub mod hasher;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::Credential;
pub use authenticator::IssuedIdentity;
pub use crate::config::AuthConfig;
pub use hasher::constant_time_equals;
pub use hasher::Hasher;
pub use hasher::HasherError;
pub use token::TokenClaims;
pub use token::TokenError;
