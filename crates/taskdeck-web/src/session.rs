//! Credential storage and payload-only token decoding.
//!
//! The session provider is the only code that touches the browser's
//! local-storage credential slot. The token payload is decoded without
//! signature verification; the backend stays the sole authority that rejects
//! tampered tokens.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

/// Local-storage key holding the bearer token.
const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("token is not a three-part JWT")]
    Malformed,

    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The claims the dashboard needs. `user_id` arrives as either a JSON number
/// or a decimal string depending on the backend version, so both decode.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(deserialize_with = "flexible_user_id")]
    pub user_id: u64,
}

fn flexible_user_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(id) => Ok(id),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let payload = token.split('.').nth(1).ok_or(ClaimsError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Owner of the stored credential. Reads and writes go through here so the
/// token has exactly one access path.
pub struct Session;

impl Session {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        gloo_utils::window().local_storage().ok().flatten()
    }

    pub fn token(&self) -> Option<String> {
        Self::storage()?
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    pub fn store(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    pub fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }

    /// The decoded claims of the stored token, if any.
    pub fn claims(&self) -> Option<TokenClaims> {
        decode_claims(&self.token()?).ok()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.unverified-signature")
    }

    #[test]
    fn numeric_user_id_claims_decode() {
        let token = token_with_payload(&json!({"user_id": 7, "email": "alice@example.com"}));
        assert_eq!(decode_claims(&token).unwrap().user_id, 7);
    }

    #[test]
    fn stringly_typed_user_id_claims_decode() {
        let token = token_with_payload(&json!({"user_id": "42", "iss": "backend"}));
        assert_eq!(decode_claims(&token).unwrap().user_id, 42);
    }

    #[test]
    fn tokens_without_a_payload_segment_are_rejected() {
        assert!(matches!(
            decode_claims("not-a-jwt"),
            Err(ClaimsError::Malformed)
        ));
    }

    #[test]
    fn garbage_payloads_are_rejected() {
        assert!(matches!(
            decode_claims("aGVhZGVy.!!!not-base64!!!.sig"),
            Err(ClaimsError::Base64(_))
        ));

        let body = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(matches!(
            decode_claims(&format!("header.{body}.sig")),
            Err(ClaimsError::Json(_))
        ));
    }

    #[test]
    fn non_numeric_string_user_id_is_an_error() {
        let token = token_with_payload(&json!({"user_id": "often"}));
        assert!(decode_claims(&token).is_err());
    }
}
