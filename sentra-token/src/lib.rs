//! # Sentra Token
//!
//! Core lifecycle library for Sentra identity tokens.
//!
//! This crate turns typed claims into validated, immutable payloads and
//! orchestrates encode, decode, refresh and invalidate against a pluggable
//! signing backend and revocation store. It has no networking dependencies
//! and performs no cryptography of its own.
//!
//! ## Features
//!
//! - Claim model: a closed set of registered claim kinds with per-kind
//!   validation and clock-skew leeway
//! - Lifecycle manager: stateless orchestration with a precise error
//!   taxonomy (expired vs revoked vs malformed)
//! - Refresh ceiling: sessions cannot be extended indefinitely by
//!   repeated refreshing
//! - Pluggable backends: [`TokenSigner`] and [`RevocationStore`] traits
//!   with in-crate reference implementations for tests and development
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use sentra_token::{
//!     ClaimMap, InMemoryRevocationStore, PayloadFactory, TokenLifecycleManager,
//!     UnsignedSigner,
//! };
//!
//! fn main() -> Result<(), sentra_token::TokenError> {
//!     let manager = TokenLifecycleManager::new(
//!         Arc::new(UnsignedSigner::new()),
//!         Arc::new(InMemoryRevocationStore::new()),
//!         PayloadFactory::new("https://issuer.example.com", 3600),
//!     );
//!
//!     let mut claims = ClaimMap::new();
//!     claims.insert("sub".into(), serde_json::json!("user-1"));
//!     let payload = manager.factory().make(&claims, false)?;
//!
//!     let token = manager.encode(&payload)?;
//!     let decoded = manager.decode(&token, true)?;
//!     assert_eq!(decoded.subject()?, serde_json::json!("user-1"));
//!     Ok(())
//! }
//! ```

mod claims;
mod error;
mod factory;
mod manager;
mod payload;
mod revocation;
mod signer;
mod token;

pub use claims::{Claim, ClaimMap, REQUIRED_CLAIMS};
pub use error::TokenError;
pub use factory::{PayloadFactory, DEFAULT_ORIGINAL_ISSUE_CLAIM};
pub use manager::{TokenLifecycleManager, DEFAULT_REFRESH_TTL_SECS};
pub use payload::Payload;
pub use revocation::{InMemoryRevocationStore, RevocationStore};
pub use signer::{TokenSigner, UnsignedSigner};
pub use token::Token;
