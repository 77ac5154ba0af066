use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::claims::{ClaimMap, REQUIRED_CLAIMS};
use crate::error::TokenError;
use crate::factory::PayloadFactory;
use crate::payload::Payload;
use crate::revocation::RevocationStore;
use crate::signer::TokenSigner;
use crate::token::Token;

/// Default refresh ceiling: two weeks from original issuance.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 1_209_600;

/// Orchestrates the token lifecycle: encode, decode, refresh, invalidate.
///
/// The manager itself is stateless and safe for concurrent use - all state
/// lives in the revocation store and in the immutable payload/token values
/// passed through. A token's state (`Issued -> Valid -> Revoked | Expired`)
/// is derived on every call from signer output, revocation lookup, and the
/// current time. Signer and store failures are surfaced as-is, never
/// retried.
pub struct TokenLifecycleManager {
    signer: Arc<dyn TokenSigner>,
    store: Arc<dyn RevocationStore>,
    factory: PayloadFactory,
    revocation_enabled: bool,
    refresh_ttl_secs: i64,
}

impl TokenLifecycleManager {
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        store: Arc<dyn RevocationStore>,
        factory: PayloadFactory,
    ) -> Self {
        TokenLifecycleManager {
            signer,
            store,
            factory,
            revocation_enabled: true,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
        }
    }

    /// Set the maximum total session lifetime across repeated refreshes,
    /// measured from original issuance.
    pub fn with_refresh_ttl(mut self, refresh_ttl_secs: i64) -> Self {
        self.refresh_ttl_secs = refresh_ttl_secs;
        self
    }

    /// Disable or re-enable revocation checking and bookkeeping.
    pub fn with_revocation_enabled(mut self, enabled: bool) -> Self {
        self.revocation_enabled = enabled;
        self
    }

    pub fn factory(&self) -> &PayloadFactory {
        &self.factory
    }

    /// Sign a payload into a token.
    ///
    /// Fails with [`TokenError::Encoding`] when the signer fails, or
    /// [`TokenError::InvalidToken`] if the signer hands back something that
    /// is not a three-segment token.
    pub fn encode(&self, payload: &Payload) -> Result<Token, TokenError> {
        let signed = self.signer.encode(&payload.to_map())?;
        let token = Token::new(signed)?;
        debug!(jti = %payload.jwt_id()?, "encoded token");
        Ok(token)
    }

    /// Verify a token and return its validated payload.
    ///
    /// Signer errors propagate unchanged. The revocation lookup happens
    /// strictly after structure, signature and time validation - a
    /// malformed or expired token never reaches the store. Pass
    /// `check_revoked = false` to skip the lookup.
    pub fn decode(&self, token: &Token, check_revoked: bool) -> Result<Payload, TokenError> {
        self.decode_claims(token, check_revoked, false)
    }

    fn decode_claims(
        &self,
        token: &Token,
        check_revoked: bool,
        refreshing: bool,
    ) -> Result<Payload, TokenError> {
        let claims = self.signer.decode(token.as_str())?;
        let payload = self.factory.make(&claims, refreshing)?;
        if check_revoked && self.revocation_enabled && self.store.has(&payload)? {
            return Err(TokenError::Revoked);
        }
        Ok(payload)
    }

    /// Exchange a (possibly expired) token for a freshly issued one.
    ///
    /// The presented token is read with the expiration rule relaxed, checked
    /// against the refresh ceiling, revoked so it cannot be refreshed twice,
    /// and replaced by a token carrying the same `sub`, `iss` and custom
    /// claims with fresh `iat`/`exp`/`nbf` and a new `jti`. Fails with
    /// [`TokenError::Expired`] once the ceiling - original issuance plus the
    /// configured refresh window - would be exceeded.
    pub fn refresh(&self, token: &Token) -> Result<Token, TokenError> {
        let old = self.decode_claims(token, true, true)?;

        let origin_claim = self.factory.original_issue_claim();
        let original_iat = match old.get(origin_claim) {
            Ok(value) => value.as_i64().ok_or_else(|| {
                TokenError::validation(origin_claim, "must be an integer timestamp")
            })?,
            // first refresh: the token's own iat is the origin
            Err(TokenError::ClaimNotFound { .. }) => old.issued_at()?,
            Err(e) => return Err(e),
        };
        let now = self.factory.now();
        if now > original_iat + self.refresh_ttl_secs {
            return Err(TokenError::expired(format!(
                "refresh window of {}s from original issuance at {} has elapsed",
                self.refresh_ttl_secs, original_iat
            )));
        }

        if self.revocation_enabled {
            self.store.add(&old)?;
        }

        // Carry forward sub, iss and every non-registered claim; the factory
        // issues fresh iat/exp/nbf/jti.
        let mut claims = ClaimMap::new();
        claims.insert("sub".to_owned(), old.get("sub")?);
        claims.insert("iss".to_owned(), old.get("iss")?);
        for claim in old.claims() {
            if REQUIRED_CLAIMS.contains(&claim.name()) {
                continue;
            }
            claims.insert(claim.name().to_owned(), claim.value());
        }
        claims.insert(origin_claim.to_owned(), Value::from(original_iat));

        let payload = self.factory.make(&claims, false)?;
        let refreshed = self.encode(&payload)?;
        info!(
            old_jti = %old.jwt_id()?,
            new_jti = %payload.jwt_id()?,
            "refreshed token"
        );
        Ok(refreshed)
    }

    /// Revoke a token so every later decode rejects it.
    ///
    /// The token is decoded without the revocation lookup - invalidating an
    /// already-revoked token is a no-op success. Returns the store's
    /// newly-recorded flag.
    pub fn invalidate(&self, token: &Token) -> Result<bool, TokenError> {
        if !self.revocation_enabled {
            return Err(TokenError::store(
                "revocation is disabled for this manager",
            ));
        }
        let payload = self.decode(token, false)?;
        let newly = self.store.add(&payload)?;
        info!(jti = %payload.jwt_id()?, newly, "invalidated token");
        Ok(newly)
    }
}
