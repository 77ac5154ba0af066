use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::claims::{Claim, ClaimMap};
use crate::error::TokenError;
use crate::payload::Payload;

/// Default name of the custom claim carrying the original issuance time.
///
/// `iat` is rewritten on every refresh, so the refresh ceiling has to be
/// anchored to a claim that survives rotation.
pub const DEFAULT_ORIGINAL_ISSUE_CLAIM: &str = "orig_iat";

/// Builds validated [`Payload`]s from raw claim data and issuance policy.
///
/// The factory holds the default TTL, the clock-skew leeway applied to every
/// time-based check, a fixed `iss` value, and any custom claims that should
/// be present on every token. Refresh behavior is selected per call through
/// the `refreshing` argument of [`make`](Self::make) rather than a mode flag
/// on the factory itself, so a single factory can be shared freely between
/// threads.
#[derive(Debug, Clone)]
pub struct PayloadFactory {
    issuer: String,
    ttl_secs: i64,
    leeway_secs: i64,
    original_issue_claim: String,
    default_claims: ClaimMap,
    /// Optional fixed now, for deterministic issuance in tests.
    fixed_now: Option<i64>,
}

impl PayloadFactory {
    pub fn new(issuer: impl Into<String>, ttl_secs: i64) -> Self {
        PayloadFactory {
            issuer: issuer.into(),
            ttl_secs,
            leeway_secs: 0,
            original_issue_claim: DEFAULT_ORIGINAL_ISSUE_CLAIM.to_owned(),
            default_claims: ClaimMap::new(),
            fixed_now: None,
        }
    }

    /// Set the clock-skew tolerance applied to `iat`, `exp` and `nbf` checks.
    pub fn with_leeway(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// Rename the custom claim that carries the original issuance time.
    pub fn with_original_issue_claim(mut self, name: impl Into<String>) -> Self {
        self.original_issue_claim = name.into();
        self
    }

    /// Add a custom claim included on every token this factory builds.
    pub fn with_default_claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.default_claims.insert(name.into(), value);
        self
    }

    /// Pin the factory's clock to a fixed timestamp.
    pub fn with_fixed_now(mut self, now: i64) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn leeway_secs(&self) -> i64 {
        self.leeway_secs
    }

    pub fn original_issue_claim(&self) -> &str {
        &self.original_issue_claim
    }

    /// The factory's current timestamp.
    pub fn now(&self) -> i64 {
        self.fixed_now.unwrap_or_else(|| Utc::now().timestamp())
    }

    /// Build a validated payload from caller-supplied claims.
    ///
    /// Assembly order is: built-in required claims first (`sub`, `iss`,
    /// `iat`, `exp`, `nbf`, `jti`), then the factory's default custom
    /// claims, then the caller's claims - which replace any same-named claim
    /// rather than duplicating it. `iat`, `nbf` default to now, `exp` to
    /// now + TTL, and `jti` to a fresh UUID, so a bare `{"sub": ...}` input
    /// yields a complete issuance payload while a full claim map decoded
    /// from an existing token reproduces that token exactly.
    ///
    /// While `refreshing` is set the expiration check is skipped so an
    /// expired token's claims can still be rehydrated; every other rule is
    /// still enforced.
    pub fn make(&self, claims: &ClaimMap, refreshing: bool) -> Result<Payload, TokenError> {
        let now = self.now();

        let mut map = ClaimMap::new();
        if let Some(sub) = claims.get("sub") {
            map.insert("sub".to_owned(), sub.clone());
        }
        map.insert("iss".to_owned(), Value::from(self.issuer.as_str()));
        map.insert("iat".to_owned(), Value::from(now));
        map.insert("exp".to_owned(), Value::from(now + self.ttl_secs));
        map.insert("nbf".to_owned(), Value::from(now));
        map.insert("jti".to_owned(), Value::from(Uuid::new_v4().to_string()));
        for (name, value) in &self.default_claims {
            map.insert(name.clone(), value.clone());
        }
        // Caller overrides replace in place; insertion order is kept.
        for (name, value) in claims {
            map.insert(name.clone(), value.clone());
        }

        let mut list = Vec::with_capacity(map.len());
        for (name, value) in &map {
            list.push(Claim::from_entry(name, value)?);
        }

        Payload::new(list, now, self.leeway_secs, refreshing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn factory() -> PayloadFactory {
        PayloadFactory::new("http://example.com", 3600).with_fixed_now(NOW)
    }

    #[test]
    fn test_make_fills_defaults_from_policy() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        let payload = factory().make(&claims, false).unwrap();

        assert_eq!(payload.get("iss").unwrap(), json!("http://example.com"));
        assert_eq!(payload.issued_at().unwrap(), NOW);
        assert_eq!(payload.expiration().unwrap(), NOW + 3600);
        assert_eq!(payload.get("nbf").unwrap(), json!(NOW));
        assert!(!payload.jwt_id().unwrap().is_empty());
    }

    #[test]
    fn test_jti_is_unique_per_issuance() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        let factory = factory();
        let a = factory.make(&claims, false).unwrap().jwt_id().unwrap();
        let b = factory.make(&claims, false).unwrap().jwt_id().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_assembly_order_required_then_custom() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        claims.insert("role".into(), json!("admin"));
        let payload = factory()
            .with_default_claim("tenant", json!("acme"))
            .make(&claims, false)
            .unwrap();

        let map = payload.to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["sub", "iss", "iat", "exp", "nbf", "jti", "tenant", "role"]
        );
    }

    #[test]
    fn test_caller_overrides_replace_defaults() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        claims.insert("jti".into(), json!("foo"));
        claims.insert("exp".into(), json!(NOW + 60));
        let payload = factory().make(&claims, false).unwrap();

        assert_eq!(payload.jwt_id().unwrap(), "foo");
        assert_eq!(payload.expiration().unwrap(), NOW + 60);
        // overrides replace, never duplicate
        assert_eq!(
            payload.to_map().keys().filter(|k| *k == "jti").count(),
            1
        );
    }

    #[test]
    fn test_missing_subject_fails() {
        let claims = ClaimMap::new();
        match factory().make(&claims, false) {
            Err(TokenError::Validation { claim, .. }) => assert_eq!(claim, "sub"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_refreshing_tolerates_expired_claims() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        claims.insert("exp".into(), json!(NOW - 3600));

        assert!(matches!(
            factory().make(&claims, false),
            Err(TokenError::Expired(_))
        ));
        assert!(factory().make(&claims, true).is_ok());
    }

    #[test]
    fn test_leeway_widens_time_windows() {
        let mut claims = ClaimMap::new();
        claims.insert("sub".into(), json!(1));
        claims.insert("iat".into(), json!(NOW + 30));
        claims.insert("nbf".into(), json!(NOW + 30));

        assert!(factory().make(&claims, false).is_err());
        assert!(factory().with_leeway(60).make(&claims, false).is_ok());
    }
}
