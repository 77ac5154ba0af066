//! # Sentra
//!
//! Signed identity-token lifecycle management for Rust.
//!
//! Sentra issues, validates, renews and revokes signed identity tokens for
//! stateless session authentication. The heart of the crate is the
//! [`TokenLifecycleManager`], which turns typed claims into validated,
//! immutable payloads and orchestrates encode, decode, refresh and
//! invalidate against a pluggable [`TokenSigner`] and [`RevocationStore`].
//!
//! ## Features
//!
//! - **Typed claims**: a closed set of registered claim kinds
//!   (`sub`, `iss`, `iat`, `exp`, `nbf`, `jti`, `aud`) with per-kind
//!   validation and configurable clock-skew leeway
//! - **Refresh with a ceiling**: tokens can be renewed past expiry, but
//!   never beyond a configured window from original issuance
//! - **Revocation**: invalidated tokens are rejected with a distinct error
//!   so clients can tell "signed out elsewhere" from "session timed out"
//! - **Pluggable backends**: bring your own signing algorithm and
//!   revocation storage behind small traits
//! - **Flexible configuration**: load policy from files, environment
//!   variables, or a builder
//!
//! ## Basic Usage
//!
//! ```
//! use std::sync::Arc;
//! use sentra::{
//!     build_manager, ClaimMap, InMemoryRevocationStore, TokenConfig, UnsignedSigner,
//! };
//!
//! # fn main() -> Result<(), sentra::TokenError> {
//! let config = TokenConfig::new("https://issuer.example.com");
//! let manager = build_manager(
//!     &config,
//!     Arc::new(UnsignedSigner::new()), // swap in a real signer in production
//!     Arc::new(InMemoryRevocationStore::new()),
//! );
//!
//! let mut claims = ClaimMap::new();
//! claims.insert("sub".into(), serde_json::json!("user-1"));
//! let payload = manager.factory().make(&claims, false)?;
//!
//! let token = manager.encode(&payload)?;
//! let decoded = manager.decode(&token, true)?;
//! assert_eq!(decoded.subject()?, serde_json::json!("user-1"));
//!
//! let renewed = manager.refresh(&token)?;
//! manager.invalidate(&renewed)?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub use sentra_config::{
    get_default_config, set_default_config, try_load_default_config, ConfigError, TokenConfig,
    TokenConfigBuilder,
};
pub use sentra_token::{
    Claim, ClaimMap, InMemoryRevocationStore, Payload, PayloadFactory, RevocationStore, Token,
    TokenError, TokenLifecycleManager, TokenSigner, UnsignedSigner,
    DEFAULT_ORIGINAL_ISSUE_CLAIM, DEFAULT_REFRESH_TTL_SECS, REQUIRED_CLAIMS,
};

/// Build a [`TokenLifecycleManager`] from a [`TokenConfig`] and backends.
///
/// The configuration supplies the issuance policy (issuer, TTL, leeway,
/// refresh ceiling, revocation toggle); the signer and store supply the
/// cryptography and the revocation storage.
pub fn build_manager(
    config: &TokenConfig,
    signer: Arc<dyn TokenSigner>,
    store: Arc<dyn RevocationStore>,
) -> TokenLifecycleManager {
    let factory = PayloadFactory::new(config.issuer.as_str(), config.ttl_secs)
        .with_leeway(config.leeway_secs)
        .with_original_issue_claim(config.original_issue_claim.as_str());
    TokenLifecycleManager::new(signer, store, factory)
        .with_refresh_ttl(config.refresh_ttl_secs)
        .with_revocation_enabled(config.blacklist_enabled)
}
