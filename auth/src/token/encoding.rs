use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::TokenError;

/// Turn standard base64 into its URL-safe, unpadded form.
pub fn url_friendly(base64: &str) -> String {
    base64
        .chars()
        .filter(|c| *c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect()
}

/// Serialize a value to compact JSON and encode it as one token segment.
///
/// Struct fields serialize in declaration order, which fixes the byte
/// layout the signature covers.
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
    Ok(url_friendly(&STANDARD.encode(json)))
}

/// Decode one token segment into a value.
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let json = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::DecodingFailed(e.to_string()))?;
    serde_json::from_slice(&json).map_err(|e| TokenError::DecodingFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_friendly_mapping() {
        assert_eq!(url_friendly("a+b/c=="), "a-b_c");
        assert_eq!(url_friendly("plain"), "plain");
    }

    #[test]
    fn test_url_friendly_matches_url_safe_engine() {
        let data: Vec<u8> = (0u8..=255).collect();
        assert_eq!(
            url_friendly(&STANDARD.encode(&data)),
            URL_SAFE_NO_PAD.encode(&data)
        );
    }

    #[test]
    fn test_decode_segment_rejects_garbage() {
        let result = decode_segment::<serde_json::Value>("***");
        assert!(matches!(result, Err(TokenError::DecodingFailed(_))));
    }
}
