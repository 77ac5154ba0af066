use std::fmt;
use std::str::FromStr;

use crate::error::TokenError;

/// An opaque wrapper around a signed token string.
///
/// The wrapped string must consist of exactly three non-empty dot-separated
/// segments (header, claims, signature); construction fails otherwise. No
/// parsed state is carried - tokens are passed whole to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    /// Wrap a token string, checking the three-segment shape.
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        let segments: Vec<&str> = value.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::invalid_token(
                "expected three non-empty dot-separated segments",
            ));
        }
        Ok(Token(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::new(s)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
