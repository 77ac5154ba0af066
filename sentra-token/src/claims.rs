use serde_json::{Map, Value};

use crate::error::TokenError;

/// A name-to-value claim mapping as exchanged with a [`TokenSigner`].
///
/// Backed by `serde_json`'s `preserve_order` map so the ordering used when
/// the payload was assembled survives the trip through the signer.
///
/// [`TokenSigner`]: crate::TokenSigner
pub type ClaimMap = Map<String, Value>;

/// The claim names every payload must carry, in assembly order.
pub const REQUIRED_CLAIMS: [&str; 6] = ["sub", "iss", "iat", "exp", "nbf", "jti"];

/// A single named, typed claim with its validation rule.
///
/// The set of registered kinds is closed; anything outside it becomes a
/// `Custom` claim with no built-in validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    /// `sub` - the identity the token was issued for. Any scalar.
    Subject(Value),
    /// `iss` - the issuing party.
    Issuer(String),
    /// `iat` - Unix timestamp the token was issued at.
    IssuedAt(i64),
    /// `exp` - Unix timestamp after which the token is no longer valid.
    Expiration(i64),
    /// `nbf` - Unix timestamp before which the token must be rejected.
    NotBefore(i64),
    /// `jti` - unique identifier for this issuance, rotated on refresh.
    JwtId(String),
    /// `aud` - intended audience. Optional, not validated.
    Audience(Value),
    /// Any caller-supplied claim. Optional, not validated.
    Custom(String, Value),
}

impl Claim {
    /// Classify a raw name/value pair into its claim kind.
    ///
    /// Registered names with a value of the wrong shape fail with a
    /// [`TokenError::Validation`] naming the offending claim.
    pub fn from_entry(name: &str, value: &Value) -> Result<Claim, TokenError> {
        match name {
            "sub" => Ok(Claim::Subject(value.clone())),
            "iss" => value
                .as_str()
                .map(|s| Claim::Issuer(s.to_owned()))
                .ok_or_else(|| TokenError::validation("iss", "must be a string")),
            "iat" => value
                .as_i64()
                .map(Claim::IssuedAt)
                .ok_or_else(|| TokenError::validation("iat", "must be an integer timestamp")),
            "exp" => value
                .as_i64()
                .map(Claim::Expiration)
                .ok_or_else(|| TokenError::validation("exp", "must be an integer timestamp")),
            "nbf" => value
                .as_i64()
                .map(Claim::NotBefore)
                .ok_or_else(|| TokenError::validation("nbf", "must be an integer timestamp")),
            "jti" => value
                .as_str()
                .map(|s| Claim::JwtId(s.to_owned()))
                .ok_or_else(|| TokenError::validation("jti", "must be a string")),
            "aud" => Ok(Claim::Audience(value.clone())),
            other => Ok(Claim::Custom(other.to_owned(), value.clone())),
        }
    }

    /// The wire name of this claim.
    pub fn name(&self) -> &str {
        match self {
            Claim::Subject(_) => "sub",
            Claim::Issuer(_) => "iss",
            Claim::IssuedAt(_) => "iat",
            Claim::Expiration(_) => "exp",
            Claim::NotBefore(_) => "nbf",
            Claim::JwtId(_) => "jti",
            Claim::Audience(_) => "aud",
            Claim::Custom(name, _) => name,
        }
    }

    /// The claim's value rendered as JSON.
    pub fn value(&self) -> Value {
        match self {
            Claim::Subject(v) | Claim::Audience(v) | Claim::Custom(_, v) => v.clone(),
            Claim::Issuer(s) | Claim::JwtId(s) => Value::from(s.as_str()),
            Claim::IssuedAt(t) | Claim::Expiration(t) | Claim::NotBefore(t) => Value::from(*t),
        }
    }

    /// Check the claim's own rule against the current time.
    ///
    /// `leeway_secs` widens every time window to tolerate clock skew between
    /// issuer and verifier. While `refreshing` is set the expiration rule is
    /// skipped so an expired token's claims can still be rehydrated; all
    /// other rules stay in force.
    pub fn validate(&self, now: i64, leeway_secs: i64, refreshing: bool) -> Result<(), TokenError> {
        match self {
            Claim::IssuedAt(iat) if *iat > now + leeway_secs => Err(TokenError::validation(
                "iat",
                format!("issued in the future ({} > now {})", iat, now),
            )),
            Claim::Expiration(exp) if !refreshing && *exp < now - leeway_secs => Err(
                TokenError::expired(format!("exp {} is before now {}", exp, now)),
            ),
            Claim::NotBefore(nbf) if *nbf > now + leeway_secs => Err(TokenError::validation(
                "nbf",
                format!("not valid before {} (now {})", nbf, now),
            )),
            _ => Ok(()),
        }
    }
}
