// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::loader::parse_option;
use super::{Config, ConfigLoader};
use crate::logging::LogLevel;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.github.branch, "main");
    assert_eq!(config.github.api_version, "2022-11-28");
    assert!(!config.github.init_missing_branch);
    assert_eq!(config.auth.token_ttl_secs, 3600);
    assert_eq!(config.auth.clock_skew_secs, 60);
    assert_eq!(config.server.allowed_origin, "*");
    assert_eq!(config.logging.level, LogLevel::INFO);
}

#[test]
fn test_parse_trims_api_url_and_coordinates() {
    let config = Config::parse(
        r#"
[github]
api_url = " https://ghe.example.com/api/v3/ "
owner = " shop "
repo = "catalog"
"#,
    )
    .unwrap();
    assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.github.owner, "shop");
    config.require_repository().unwrap();
}

#[test]
fn test_validation_rejects_unusable_values() {
    for toml in [
        "[github]\nbranch = \"  \"",
        "[github]\napi_url = \"\"",
        "[github]\napi_url = \"ftp://example.com\"",
        "[github]\nrequest_timeout_secs = 0",
        "[auth]\ntoken_ttl_secs = 0",
    ] {
        assert!(Config::parse(toml).is_err(), "accepted: {toml}");
    }
}

#[test]
fn test_unknown_keys_are_rejected() {
    let err = Config::parse("[github]\ntokn = \"x\"").unwrap_err();
    assert!(format!("{err:#}").contains("tokn"));
}

#[test]
fn test_require_repository_names_missing_key() {
    let err = Config::default().require_repository().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'owner' in section '[github]'");
}

#[test]
fn test_empty_password_counts_as_unset() {
    let config = Config::parse("[auth]\nadmin_password = \"\"").unwrap();
    assert_eq!(config.auth.admin_password, None);
}

#[test]
fn test_set_option_overrides_file() {
    let config = ConfigLoader::new()
        .add_toml_str("[github]\nbranch = \"main\"")
        .set_option("github.branch=catalog")
        .unwrap()
        .set_option("auth.token_ttl_secs=120")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.github.branch, "catalog");
    assert_eq!(config.auth.token_ttl_secs, 120);
}

#[test]
fn test_parse_option() {
    assert_eq!(
        parse_option("server.bind=0.0.0.0:80").unwrap(),
        ("server.bind", "0.0.0.0:80")
    );
    assert_eq!(
        parse_option("auth.admin_password=a=b").unwrap(),
        ("auth.admin_password", "a=b")
    );
    assert!(parse_option("bind=0.0.0.0").is_err());
    assert!(parse_option("server.bind").is_err());
}

#[test]
fn test_format_options_hides_secrets() {
    let mut config = Config::default();
    config.github.token = "ghp_secret".to_string();
    config.auth.admin_password = Some("hunter2".to_string());

    let lines = config.format_options();
    let joined = lines.join("\n");
    assert!(!joined.contains("ghp_secret"));
    assert!(!joined.contains("hunter2"));
    assert!(lines.iter().any(|l| l.starts_with("github.token") && l.ends_with("= [hidden]")));
    assert!(lines.iter().any(|l| l.starts_with("auth.admin_password") && l.ends_with("= [hidden]")));
    // keys are padded to the longest one
    let widths: Vec<_> = lines.iter().map(|l| l.find(" = ").unwrap()).collect();
    assert!(widths.windows(2).all(|w| w[0] == w[1]));
}
