use thiserror::Error;

/// Errors produced while building, decoding, refreshing or revoking tokens.
///
/// Every failure path maps to exactly one variant so callers can branch on
/// cause (expired vs revoked vs malformed) instead of a generic failure.
#[derive(Error, Debug)]
pub enum TokenError {
    /// A required claim is missing or failed its validation rule.
    #[error("claim '{claim}' failed validation: {reason}")]
    Validation { claim: String, reason: String },

    /// A claim was requested from a payload that does not contain it.
    #[error("claim '{claim}' not found in payload")]
    ClaimNotFound { claim: String },

    /// The token string is malformed or its signature did not verify.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token's expiration or refresh window has passed.
    #[error("token expired: {0}")]
    Expired(String),

    /// The token's identity has been revoked.
    #[error("token has been revoked")]
    Revoked,

    /// The signer failed to produce a token string.
    #[error("token encoding failed: {0}")]
    Encoding(String),

    /// Any other signer-side failure.
    #[error("signer error: {0}")]
    Signer(String),

    /// The revocation store reported a failure.
    #[error("revocation store error: {0}")]
    Store(String),
}

impl TokenError {
    pub fn validation(claim: impl Into<String>, reason: impl Into<String>) -> Self {
        TokenError::Validation {
            claim: claim.into(),
            reason: reason.into(),
        }
    }

    pub fn claim_not_found(claim: impl Into<String>) -> Self {
        TokenError::ClaimNotFound {
            claim: claim.into(),
        }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        TokenError::InvalidToken(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        TokenError::Expired(message.into())
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        TokenError::Encoding(message.into())
    }

    pub fn signer(message: impl Into<String>) -> Self {
        TokenError::Signer(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        TokenError::Store(message.into())
    }
}
