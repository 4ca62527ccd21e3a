pub mod claims;
pub mod encoding;
pub mod errors;

pub use claims::TokenClaims;
pub use claims::TokenHeader;
pub use errors::TokenError;
