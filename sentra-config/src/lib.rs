//! # Sentra Config
//!
//! Configuration management for the Sentra token lifecycle.
//!
//! [`TokenConfig`] carries the issuance policy (issuer, TTL, leeway,
//! refresh ceiling, revocation settings) and can be created manually, with
//! a builder, or loaded from JSON/TOML files and environment variables. A
//! process-wide default configuration can be registered once and read from
//! anywhere.
//!
//! ## Loading from a file
//!
//! ```no_run
//! use sentra_config::TokenConfig;
//! use std::path::Path;
//!
//! let config = TokenConfig::from_file(Path::new("./sentra.json"))
//!     .expect("Failed to load configuration");
//! ```
//!
//! ## Loading from environment variables
//!
//! ```no_run
//! use sentra_config::TokenConfig;
//!
//! // SENTRA_ISSUER=https://issuer.example.com
//! // SENTRA_TTL_SECS=3600
//! // SENTRA_REFRESH_TTL_SECS=1209600
//! let config = TokenConfig::from_env("SENTRA")
//!     .expect("Failed to load configuration from environment");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Claim names the original-issuance claim may not collide with.
const REGISTERED_CLAIM_NAMES: [&str; 7] = ["sub", "iss", "iat", "exp", "nbf", "jti", "aud"];

/// Errors that can occur while loading or validating token configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("issuer is required but was not provided. Please specify a non-empty issuer identifier.")]
    MissingIssuer,

    #[error("invalid TTL. The token lifetime must be a positive number of seconds.")]
    InvalidTtl,

    #[error("invalid leeway. Clock-skew tolerance cannot be negative.")]
    InvalidLeeway,

    #[error("invalid refresh TTL. The refresh window must be at least as long as the token TTL.")]
    InvalidRefreshTtl,

    #[error("invalid revocation grace. The grace period cannot be negative.")]
    InvalidGrace,

    #[error("invalid original-issue claim name '{0}'. The name must be non-empty and must not shadow a registered claim.")]
    InvalidClaimName(String),

    #[error("I/O error occurred while reading configuration: {0}. Please check file permissions and paths.")]
    IOError(String),

    #[error("failed to parse configuration data: {0}. Please ensure the configuration format is correct.")]
    ParseError(String),

    #[error("environment variable error: {0}. Please ensure all required environment variables are set correctly.")]
    EnvVarError(String),

    #[error("default configuration has already been initialized. Call get_default_config() to access it.")]
    AlreadyInitialized,
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::IOError(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError(error.to_string())
    }
}

impl From<std::env::VarError> for ConfigError {
    fn from(error: std::env::VarError) -> Self {
        ConfigError::EnvVarError(error.to_string())
    }
}

/// Token issuance and lifecycle policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Value of the `iss` claim on every issued token.
    pub issuer: String,
    /// Token lifetime in seconds (`exp` = now + ttl).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,
    /// Clock-skew tolerance in seconds applied to time-based claim checks.
    #[serde(default)]
    pub leeway_secs: i64,
    /// Maximum total session lifetime across refreshes, from original
    /// issuance.
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: i64,
    /// Whether revoked tokens are checked and recorded.
    #[serde(default = "default_blacklist_enabled")]
    pub blacklist_enabled: bool,
    /// How long revocation records are retained past the claim's `exp`.
    #[serde(default)]
    pub blacklist_grace_secs: i64,
    /// Name of the custom claim that carries original issuance time.
    #[serde(default = "default_original_issue_claim")]
    pub original_issue_claim: String,
}

fn default_ttl_secs() -> i64 {
    3600
}

fn default_refresh_ttl_secs() -> i64 {
    1_209_600 // two weeks
}

fn default_blacklist_enabled() -> bool {
    true
}

fn default_original_issue_claim() -> String {
    "orig_iat".to_owned()
}

/// Builder for [`TokenConfig`].
#[derive(Default, Debug)]
pub struct TokenConfigBuilder {
    issuer: Option<String>,
    ttl_secs: Option<i64>,
    leeway_secs: Option<i64>,
    refresh_ttl_secs: Option<i64>,
    blacklist_enabled: Option<bool>,
    blacklist_grace_secs: Option<i64>,
    original_issue_claim: Option<String>,
}

impl TokenConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: &TokenConfig) -> Self {
        TokenConfigBuilder {
            issuer: Some(config.issuer.clone()),
            ttl_secs: Some(config.ttl_secs),
            leeway_secs: Some(config.leeway_secs),
            refresh_ttl_secs: Some(config.refresh_ttl_secs),
            blacklist_enabled: Some(config.blacklist_enabled),
            blacklist_grace_secs: Some(config.blacklist_grace_secs),
            original_issue_claim: Some(config.original_issue_claim.clone()),
        }
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    pub fn leeway_secs(mut self, leeway_secs: i64) -> Self {
        self.leeway_secs = Some(leeway_secs);
        self
    }

    pub fn refresh_ttl_secs(mut self, refresh_ttl_secs: i64) -> Self {
        self.refresh_ttl_secs = Some(refresh_ttl_secs);
        self
    }

    pub fn blacklist_enabled(mut self, enabled: bool) -> Self {
        self.blacklist_enabled = Some(enabled);
        self
    }

    pub fn blacklist_grace_secs(mut self, grace_secs: i64) -> Self {
        self.blacklist_grace_secs = Some(grace_secs);
        self
    }

    pub fn original_issue_claim(mut self, name: impl Into<String>) -> Self {
        self.original_issue_claim = Some(name.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<TokenConfig, ConfigError> {
        let config = TokenConfig {
            issuer: self.issuer.ok_or(ConfigError::MissingIssuer)?,
            ttl_secs: self.ttl_secs.unwrap_or_else(default_ttl_secs),
            leeway_secs: self.leeway_secs.unwrap_or(0),
            refresh_ttl_secs: self
                .refresh_ttl_secs
                .unwrap_or_else(default_refresh_ttl_secs),
            blacklist_enabled: self
                .blacklist_enabled
                .unwrap_or_else(default_blacklist_enabled),
            blacklist_grace_secs: self.blacklist_grace_secs.unwrap_or(0),
            original_issue_claim: self
                .original_issue_claim
                .unwrap_or_else(default_original_issue_claim),
        };
        config.validate()?;
        Ok(config)
    }
}

impl TokenConfig {
    /// Create a configuration with default policy for the given issuer.
    pub fn new(issuer: impl Into<String>) -> Self {
        TokenConfig {
            issuer: issuer.into(),
            ttl_secs: default_ttl_secs(),
            leeway_secs: 0,
            refresh_ttl_secs: default_refresh_ttl_secs(),
            blacklist_enabled: true,
            blacklist_grace_secs: 0,
            original_issue_claim: default_original_issue_claim(),
        }
    }

    pub fn builder() -> TokenConfigBuilder {
        TokenConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification.
    pub fn to_builder(&self) -> TokenConfigBuilder {
        TokenConfigBuilder::from_config(self)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: TokenConfig = serde_json::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: TokenConfig = toml::from_str(&file_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from environment variables.
    ///
    /// With the prefix "SENTRA" the variables are:
    /// - `SENTRA_ISSUER` (required)
    /// - `SENTRA_TTL_SECS`
    /// - `SENTRA_LEEWAY_SECS`
    /// - `SENTRA_REFRESH_TTL_SECS`
    /// - `SENTRA_BLACKLIST_ENABLED` ("true"/"false")
    /// - `SENTRA_BLACKLIST_GRACE_SECS`
    /// - `SENTRA_ORIGINAL_ISSUE_CLAIM`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the issuer is missing or any value fails
    /// to parse or validate.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let issuer = env::var(format!("{}_ISSUER", prefix))?;

        let ttl_secs = read_env_i64(prefix, "TTL_SECS")?.unwrap_or_else(default_ttl_secs);
        let leeway_secs = read_env_i64(prefix, "LEEWAY_SECS")?.unwrap_or(0);
        let refresh_ttl_secs =
            read_env_i64(prefix, "REFRESH_TTL_SECS")?.unwrap_or_else(default_refresh_ttl_secs);
        let blacklist_grace_secs = read_env_i64(prefix, "BLACKLIST_GRACE_SECS")?.unwrap_or(0);

        let blacklist_enabled = match env::var(format!("{}_BLACKLIST_ENABLED", prefix)) {
            Ok(value) => match value.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(ConfigError::ParseError(format!(
                        "invalid boolean: {}",
                        other
                    )))
                }
            },
            Err(std::env::VarError::NotPresent) => default_blacklist_enabled(),
            Err(e) => return Err(e.into()),
        };

        let original_issue_claim = match env::var(format!("{}_ORIGINAL_ISSUE_CLAIM", prefix)) {
            Ok(name) => name,
            Err(std::env::VarError::NotPresent) => default_original_issue_claim(),
            Err(e) => return Err(e.into()),
        };

        let config = TokenConfig {
            issuer,
            ttl_secs,
            leeway_secs,
            refresh_ttl_secs,
            blacklist_enabled,
            blacklist_grace_secs,
            original_issue_claim,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Checks that all fields are present and mutually consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::MissingIssuer);
        }
        if self.ttl_secs <= 0 {
            return Err(ConfigError::InvalidTtl);
        }
        if self.leeway_secs < 0 {
            return Err(ConfigError::InvalidLeeway);
        }
        if self.refresh_ttl_secs < self.ttl_secs {
            return Err(ConfigError::InvalidRefreshTtl);
        }
        if self.blacklist_grace_secs < 0 {
            return Err(ConfigError::InvalidGrace);
        }
        if self.original_issue_claim.is_empty()
            || REGISTERED_CLAIM_NAMES.contains(&self.original_issue_claim.as_str())
        {
            return Err(ConfigError::InvalidClaimName(
                self.original_issue_claim.clone(),
            ));
        }
        Ok(())
    }
}

// Global configuration singleton
static DEFAULT_CONFIG: OnceLock<TokenConfig> = OnceLock::new();

/// Set the default global configuration.
///
/// Returns an error if a default configuration is already set.
pub fn set_default_config(config: TokenConfig) -> Result<(), ConfigError> {
    config.validate()?;
    DEFAULT_CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// Get the default global configuration, if set.
pub fn get_default_config() -> Option<&'static TokenConfig> {
    DEFAULT_CONFIG.get()
}

/// Try to load a default configuration from standard locations.
///
/// Attempts, in order:
/// 1. Environment variables with the prefix "SENTRA"
/// 2. `./sentra.json`, `~/.sentra/config.json`, `/etc/sentra/config.json`
/// 3. The same paths with `.toml` extensions
///
/// Returns `None` if no configuration could be found.
pub fn try_load_default_config() -> Option<TokenConfig> {
    if let Ok(config) = TokenConfig::from_env("SENTRA") {
        return Some(config);
    }

    let json_paths = [
        "./sentra.json",
        "~/.sentra/config.json",
        "/etc/sentra/config.json",
    ];
    for path in json_paths.iter() {
        if let Some(expanded) = expand_home(path) {
            if expanded.exists() {
                if let Ok(config) = TokenConfig::from_file(&expanded) {
                    return Some(config);
                }
            }
        }
    }

    let toml_paths = [
        "./sentra.toml",
        "~/.sentra/config.toml",
        "/etc/sentra/config.toml",
    ];
    for path in toml_paths.iter() {
        if let Some(expanded) = expand_home(path) {
            if expanded.exists() {
                if let Ok(config) = TokenConfig::from_toml(&expanded) {
                    return Some(config);
                }
            }
        }
    }

    None
}

fn expand_home(path: &str) -> Option<std::path::PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(stripped))
    } else {
        Some(Path::new(path).to_path_buf())
    }
}

fn read_env_i64(prefix: &str, name: &str) -> Result<Option<i64>, ConfigError> {
    match env::var(format!("{}_{}", prefix, name)) {
        Ok(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConfigError::ParseError(format!("invalid integer for {}: {}", name, value))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_policy() {
        let config = TokenConfig::new("https://issuer.example.com");
        assert_eq!(config.issuer, "https://issuer.example.com");
        assert_eq!(config.ttl_secs, 3600);
        assert_eq!(config.leeway_secs, 0);
        assert_eq!(config.refresh_ttl_secs, 1_209_600);
        assert!(config.blacklist_enabled);
        assert_eq!(config.original_issue_claim, "orig_iat");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TokenConfig::builder()
            .issuer("https://issuer.example.com")
            .ttl_secs(600)
            .leeway_secs(30)
            .refresh_ttl_secs(86_400)
            .blacklist_enabled(false)
            .build()
            .unwrap();

        assert_eq!(config.ttl_secs, 600);
        assert_eq!(config.leeway_secs, 30);
        assert_eq!(config.refresh_ttl_secs, 86_400);
        assert!(!config.blacklist_enabled);
    }

    #[test]
    fn test_builder_requires_issuer() {
        match TokenConfig::builder().ttl_secs(600).build() {
            Err(ConfigError::MissingIssuer) => {}
            other => panic!("expected MissingIssuer, got {other:?}"),
        }
    }

    #[test]
    fn test_to_builder_round_trip() {
        let config = TokenConfig::new("https://issuer.example.com");
        let modified = config.to_builder().ttl_secs(120).build().unwrap();
        assert_eq!(modified.issuer, config.issuer);
        assert_eq!(modified.ttl_secs, 120);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TokenConfig::new("https://issuer.example.com");
        config.ttl_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTtl)));

        let mut config = TokenConfig::new("https://issuer.example.com");
        config.leeway_secs = -1;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLeeway)));

        let mut config = TokenConfig::new("https://issuer.example.com");
        config.refresh_ttl_secs = config.ttl_secs - 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRefreshTtl)
        ));

        let mut config = TokenConfig::new("https://issuer.example.com");
        config.original_issue_claim = "iat".to_owned();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClaimName(_))
        ));
    }
}
