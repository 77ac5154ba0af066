use serde_json::Value;

use crate::claims::{Claim, ClaimMap, REQUIRED_CLAIMS};
use crate::error::TokenError;

/// The full, validated, immutable set of claims for one token.
///
/// Claims are unique by name (last write wins during construction) and keep
/// the order they were assembled in. A payload that constructed successfully
/// is known to carry every required claim and to have passed every claim's
/// own validation rule; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    claims: Vec<Claim>,
}

impl Payload {
    /// Build a payload from an ordered list of claims.
    ///
    /// Duplicate names collapse to the last value supplied, keeping the
    /// position of the first occurrence. Fails with
    /// [`TokenError::Validation`] if a required claim is missing, with
    /// whatever error an individual claim's rule produces otherwise.
    pub fn new(
        claims: Vec<Claim>,
        now: i64,
        leeway_secs: i64,
        refreshing: bool,
    ) -> Result<Self, TokenError> {
        let mut unique: Vec<Claim> = Vec::with_capacity(claims.len());
        for claim in claims {
            match unique.iter_mut().find(|c| c.name() == claim.name()) {
                Some(slot) => *slot = claim,
                None => unique.push(claim),
            }
        }

        for required in REQUIRED_CLAIMS {
            if !unique.iter().any(|c| c.name() == required) {
                return Err(TokenError::validation(required, "required claim is missing"));
            }
        }

        for claim in &unique {
            claim.validate(now, leeway_secs, refreshing)?;
        }

        Ok(Payload { claims: unique })
    }

    /// Look up a claim value by name.
    ///
    /// Fails with [`TokenError::ClaimNotFound`] when absent; a default is
    /// never returned silently.
    pub fn get(&self, name: &str) -> Result<Value, TokenError> {
        self.claims
            .iter()
            .find(|c| c.name() == name)
            .map(Claim::value)
            .ok_or_else(|| TokenError::claim_not_found(name))
    }

    /// The claims in assembly order.
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Render the payload as a name-to-value map, preserving assembly order.
    pub fn to_map(&self) -> ClaimMap {
        self.claims
            .iter()
            .map(|c| (c.name().to_owned(), c.value()))
            .collect()
    }

    /// The `sub` claim value.
    pub fn subject(&self) -> Result<Value, TokenError> {
        self.get("sub")
    }

    /// The `jti` claim value.
    pub fn jwt_id(&self) -> Result<String, TokenError> {
        self.claims
            .iter()
            .find_map(|c| match c {
                Claim::JwtId(id) => Some(id.clone()),
                _ => None,
            })
            .ok_or_else(|| TokenError::claim_not_found("jti"))
    }

    /// The `iat` claim value.
    pub fn issued_at(&self) -> Result<i64, TokenError> {
        self.claims
            .iter()
            .find_map(|c| match c {
                Claim::IssuedAt(t) => Some(*t),
                _ => None,
            })
            .ok_or_else(|| TokenError::claim_not_found("iat"))
    }

    /// The `exp` claim value.
    pub fn expiration(&self) -> Result<i64, TokenError> {
        self.claims
            .iter()
            .find_map(|c| match c {
                Claim::Expiration(t) => Some(*t),
                _ => None,
            })
            .ok_or_else(|| TokenError::claim_not_found("exp"))
    }
}
