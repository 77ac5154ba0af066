use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::json;

use crate::claims::ClaimMap;
use crate::error::TokenError;

/// The signing backend the lifecycle manager delegates to.
///
/// Implementations own signature creation and verification; the manager
/// never re-implements either, it only consumes the outcomes. `decode`
/// failures are expected to use [`TokenError::Expired`] when the signer
/// performs its own expiry check, [`TokenError::InvalidToken`] for a bad
/// signature or malformed structure, and [`TokenError::Signer`] for
/// anything else (key unavailable, algorithm misconfigured).
pub trait TokenSigner: Send + Sync {
    /// Turn a claim map into a signed token string.
    fn encode(&self, claims: &ClaimMap) -> Result<String, TokenError>;

    /// Verify a token string and return its claim map.
    fn decode(&self, token: &str) -> Result<ClaimMap, TokenError>;
}

/// A deterministic signer that performs no cryptographic signing.
///
/// Produces `base64url(header).base64url(claims).base64url("unsigned")` and
/// verifies nothing but structure on decode; expiry is left to the payload
/// factory. Intended for tests and local development only - never deploy a
/// manager built on this signer.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsignedSigner;

impl UnsignedSigner {
    pub fn new() -> Self {
        UnsignedSigner
    }
}

impl TokenSigner for UnsignedSigner {
    fn encode(&self, claims: &ClaimMap) -> Result<String, TokenError> {
        let header = serde_json::to_vec(&json!({ "typ": "JWT", "alg": "none" }))
            .map_err(|e| TokenError::encoding(e.to_string()))?;
        let body = serde_json::to_vec(claims).map_err(|e| TokenError::encoding(e.to_string()))?;
        Ok(format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(body),
            URL_SAFE_NO_PAD.encode(b"unsigned"),
        ))
    }

    fn decode(&self, token: &str) -> Result<ClaimMap, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::invalid_token(
                "expected three non-empty dot-separated segments",
            ));
        }
        let body = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|e| TokenError::invalid_token(format!("claims segment is not base64url: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| TokenError::invalid_token(format!("claims segment is not a JSON object: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims() -> ClaimMap {
        let mut map = ClaimMap::new();
        map.insert("sub".into(), json!(1));
        map.insert("iss".into(), json!("http://example.com"));
        map.insert("jti".into(), json!("foo"));
        map
    }

    #[test]
    fn test_round_trip() {
        let signer = UnsignedSigner::new();
        let token = signer.encode(&claims()).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = signer.decode(&token).unwrap();
        assert_eq!(decoded, claims());
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        let signer = UnsignedSigner::new();
        assert!(matches!(
            signer.decode("only-one-segment"),
            Err(TokenError::InvalidToken(_))
        ));
        assert!(matches!(
            signer.decode("a..c"),
            Err(TokenError::InvalidToken(_))
        ));
        // three segments but the claims part is not base64url JSON
        assert!(matches!(
            signer.decode("foo.bar!!.baz"),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_decode_preserves_claim_order() {
        let signer = UnsignedSigner::new();
        let token = signer.encode(&claims()).unwrap();
        let keys: Vec<String> = signer.decode(&token).unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["sub", "iss", "jti"]);
    }
}
