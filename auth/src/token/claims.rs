use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Token header. Field order is part of the wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
            kid: "0".to_string(),
        }
    }
}

/// Identity token payload.
///
/// Field order (`exp, iss, ver, aud, uid`) is part of the wire format: the
/// signature covers these exact bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Expiration, held in epoch milliseconds and carried as epoch seconds
    #[serde(
        rename = "exp",
        serialize_with = "serialize_epoch_seconds",
        deserialize_with = "deserialize_epoch_seconds"
    )]
    pub expires_millis: i64,

    /// Issuer
    pub iss: String,

    /// Token format version
    pub ver: u32,

    /// Audience
    pub aud: String,

    /// Subject identifier, opaque to this crate
    pub uid: String,
}

impl TokenClaims {
    /// Check if token is expired.
    ///
    /// A token is expired once `now_millis` reaches its expiry.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_millis <= now_millis
    }
}

/// Write milliseconds as `millis / 1000`: an integer on whole seconds,
/// otherwise the shortest decimal.
fn serialize_epoch_seconds<S: Serializer>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    if millis % 1000 == 0 {
        serializer.serialize_i64(millis / 1000)
    } else {
        serializer.serialize_f64(*millis as f64 / 1000.0)
    }
}

fn deserialize_epoch_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;

    if let Some(seconds) = number.as_i64() {
        return seconds
            .checked_mul(1000)
            .ok_or_else(|| serde::de::Error::custom("exp out of range"));
    }

    match number.as_f64() {
        Some(seconds) if seconds.is_finite() && (seconds * 1000.0).abs() < i64::MAX as f64 => {
            Ok((seconds * 1000.0).round() as i64)
        }
        _ => Err(serde::de::Error::custom("exp out of range")),
    }
}
