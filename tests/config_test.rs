use sentra::{ConfigError, TokenConfig};
use std::env;
use std::fs;

#[test]
fn test_config_new() {
    let config = TokenConfig::new("https://issuer.example.com");

    assert_eq!(config.issuer, "https://issuer.example.com");
    assert_eq!(config.ttl_secs, 3600);
    assert_eq!(config.leeway_secs, 0);
    assert_eq!(config.refresh_ttl_secs, 1_209_600);
    assert!(config.blacklist_enabled);
    assert_eq!(config.blacklist_grace_secs, 0);
    assert_eq!(config.original_issue_claim, "orig_iat");
}

#[test]
fn test_config_validation() {
    let valid = TokenConfig::new("https://issuer.example.com");
    assert!(valid.validate().is_ok());

    let mut invalid = TokenConfig::new("");
    match invalid.validate() {
        Err(ConfigError::MissingIssuer) => {}
        other => panic!("expected MissingIssuer, got {other:?}"),
    }

    invalid = TokenConfig::new("https://issuer.example.com");
    invalid.ttl_secs = -5;
    match invalid.validate() {
        Err(ConfigError::InvalidTtl) => {}
        other => panic!("expected InvalidTtl, got {other:?}"),
    }

    invalid = TokenConfig::new("https://issuer.example.com");
    invalid.refresh_ttl_secs = 60;
    match invalid.validate() {
        Err(ConfigError::InvalidRefreshTtl) => {}
        other => panic!("expected InvalidRefreshTtl, got {other:?}"),
    }

    invalid = TokenConfig::new("https://issuer.example.com");
    invalid.original_issue_claim = "sub".to_owned();
    match invalid.validate() {
        Err(ConfigError::InvalidClaimName(name)) => assert_eq!(name, "sub"),
        other => panic!("expected InvalidClaimName, got {other:?}"),
    }
}

#[test]
fn test_config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sentra.json");
    fs::write(
        &path,
        r#"{
            "issuer": "https://issuer.example.com",
            "ttl_secs": 900,
            "leeway_secs": 30,
            "refresh_ttl_secs": 86400,
            "blacklist_enabled": false
        }"#,
    )
    .unwrap();

    let config = TokenConfig::from_file(&path).unwrap();
    assert_eq!(config.issuer, "https://issuer.example.com");
    assert_eq!(config.ttl_secs, 900);
    assert_eq!(config.leeway_secs, 30);
    assert_eq!(config.refresh_ttl_secs, 86_400);
    assert!(!config.blacklist_enabled);
    // unspecified fields fall back to defaults
    assert_eq!(config.original_issue_claim, "orig_iat");
}

#[test]
fn test_config_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sentra.toml");
    fs::write(
        &path,
        r#"
            issuer = "https://issuer.example.com"
            ttl_secs = 1800
            original_issue_claim = "session_start"
        "#,
    )
    .unwrap();

    let config = TokenConfig::from_toml(&path).unwrap();
    assert_eq!(config.ttl_secs, 1800);
    assert_eq!(config.original_issue_claim, "session_start");
}

#[test]
fn test_config_from_file_rejects_invalid_policy() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sentra.json");
    fs::write(
        &path,
        r#"{ "issuer": "https://issuer.example.com", "ttl_secs": 0 }"#,
    )
    .unwrap();

    assert!(matches!(
        TokenConfig::from_file(&path),
        Err(ConfigError::InvalidTtl)
    ));
}

#[test]
fn test_config_from_env() {
    env::set_var("CFGTEST_ISSUER", "https://issuer.example.com");
    env::set_var("CFGTEST_TTL_SECS", "600");
    env::set_var("CFGTEST_BLACKLIST_ENABLED", "false");

    let config = TokenConfig::from_env("CFGTEST").unwrap();
    assert_eq!(config.issuer, "https://issuer.example.com");
    assert_eq!(config.ttl_secs, 600);
    assert!(!config.blacklist_enabled);
    assert_eq!(config.refresh_ttl_secs, 1_209_600);

    env::remove_var("CFGTEST_ISSUER");
    env::remove_var("CFGTEST_TTL_SECS");
    env::remove_var("CFGTEST_BLACKLIST_ENABLED");
}

#[test]
fn test_config_from_env_missing_issuer() {
    assert!(matches!(
        TokenConfig::from_env("CFGMISSING"),
        Err(ConfigError::EnvVarError(_))
    ));
}

#[test]
fn test_config_from_env_rejects_bad_values() {
    env::set_var("CFGBAD_ISSUER", "https://issuer.example.com");
    env::set_var("CFGBAD_TTL_SECS", "not-a-number");

    assert!(matches!(
        TokenConfig::from_env("CFGBAD"),
        Err(ConfigError::ParseError(_))
    ));

    env::remove_var("CFGBAD_ISSUER");
    env::remove_var("CFGBAD_TTL_SECS");
}
