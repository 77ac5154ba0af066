use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use crate::error::TokenError;
use crate::payload::Payload;

/// Records and queries revoked token identities.
///
/// A token's identity is its `jti` scoped by `sub`. Implementations own the
/// retention of stale records (typically until the claim's original `exp`
/// plus a grace period); the manager only calls `has`/`add` at the right
/// points. A successful `add` must be visible to any `has` issued after it
/// completes, otherwise a revoked token could still pass decoding.
pub trait RevocationStore: Send + Sync {
    /// Whether this token's identity has been revoked.
    fn has(&self, payload: &Payload) -> Result<bool, TokenError>;

    /// Record a revocation. Returns `true` when the record is newly created.
    fn add(&self, payload: &Payload) -> Result<bool, TokenError>;
}

/// In-memory reference [`RevocationStore`].
///
/// Records are kept until the revoked claim's original `exp` plus the
/// configured grace period and purged lazily on access; once a token would
/// have expired anyway, tracking its revocation is no longer necessary.
/// Revoking an already-revoked identity is a no-op that reports `false`.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    grace_secs: i64,
    /// identity -> retained-until timestamp
    records: RwLock<HashMap<String, i64>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::with_grace(0)
    }

    /// Keep revocation records `grace_secs` past the claim's original `exp`.
    pub fn with_grace(grace_secs: i64) -> Self {
        InMemoryRevocationStore {
            grace_secs,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live revocation records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identity(payload: &Payload) -> Result<String, TokenError> {
        let sub = payload.subject()?;
        let jti = payload.jwt_id()?;
        Ok(format!("{sub}:{jti}"))
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn has(&self, payload: &Payload) -> Result<bool, TokenError> {
        let identity = Self::identity(payload)?;
        let now = Utc::now().timestamp();
        let mut records = self
            .records
            .write()
            .map_err(|_| TokenError::store("revocation store lock poisoned"))?;
        records.retain(|_, retained_until| *retained_until > now);
        Ok(records.contains_key(&identity))
    }

    fn add(&self, payload: &Payload) -> Result<bool, TokenError> {
        let identity = Self::identity(payload)?;
        let retained_until = payload.expiration()? + self.grace_secs;
        let mut records = self
            .records
            .write()
            .map_err(|_| TokenError::store("revocation store lock poisoned"))?;
        let newly = records.insert(identity.clone(), retained_until).is_none();
        if newly {
            debug!(identity = %identity, retained_until, "recorded revocation");
        }
        Ok(newly)
    }
}
