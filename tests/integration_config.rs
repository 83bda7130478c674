// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests layered loading from files, environment and overrides.

use saree_admin::config::Config;
use saree_admin::config::loader::ConfigLoader;
use saree_admin::logging::LogLevel;
use std::fs;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn config_from_file() {
    let dir = temp_dir();
    let path = dir.path().join("saree-admin.toml");
    fs::write(
        &path,
        r#"
[github]
owner = "saree-house"
repo = "storefront"
branch = "catalog"

[auth]
admin_password = "rani"
token_ttl_secs = 7200

[server]
bind = "0.0.0.0:9000"
allowed_origin = "https://saree.example.com"

[logging]
level = 4
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.github.owner, "saree-house");
    assert_eq!(config.github.branch, "catalog");
    assert_eq!(config.auth.admin_password.as_deref(), Some("rani"));
    assert_eq!(config.auth.token_ttl_secs, 7200);
    assert_eq!(config.server.allowed_origin, "https://saree.example.com");
    assert_eq!(config.logging.level, LogLevel::DEBUG);
    config.require_repository().unwrap();
}

#[test]
fn config_later_files_win() {
    let dir = temp_dir();
    let base = dir.path().join("base.toml");
    let local = dir.path().join("local.toml");
    fs::write(&base, "[github]\nowner = \"shop\"\nrepo = \"site\"\nbranch = \"main\"\n").unwrap();
    fs::write(&local, "[github]\nbranch = \"preview\"\n").unwrap();

    let loader = ConfigLoader::new()
        .add_toml_file_optional(dir.path().join("absent.toml"))
        .add_toml_file(&base)
        .add_toml_file(&local);
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.github.repo, "site");
    assert_eq!(config.github.branch, "preview");
}

#[test]
fn config_missing_required_file() {
    let dir = temp_dir();
    let result = ConfigLoader::new()
        .add_toml_file(dir.path().join("missing.toml"))
        .build();
    assert!(result.is_err());
}

#[test]
fn config_invalid_toml() {
    let dir = temp_dir();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[github\nowner = ").unwrap();
    assert!(Config::from_file(&path).is_err());
}

// =============================================================================
// Environment and overrides
// =============================================================================

#[test]
fn config_env_overrides_file() {
    // SAFETY: the variable name is unique to this test
    unsafe {
        std::env::set_var("SAREEITEST_AUTH__TOKEN_TTL_SECS", "900");
        std::env::set_var("SAREEITEST_GITHUB__TOKEN", "ghp_from_env");
    }

    let config = ConfigLoader::new()
        .add_toml_str("[auth]\ntoken_ttl_secs = 3600\n")
        .with_env_prefix("SAREEITEST")
        .build();

    // SAFETY: same as above
    unsafe {
        std::env::remove_var("SAREEITEST_AUTH__TOKEN_TTL_SECS");
        std::env::remove_var("SAREEITEST_GITHUB__TOKEN");
    }

    let config = config.unwrap();
    assert_eq!(config.auth.token_ttl_secs, 900);
    assert_eq!(config.github.token, "ghp_from_env");
}

#[test]
fn config_set_option_beats_everything() {
    let config = ConfigLoader::new()
        .add_toml_str("[server]\nbind = \"127.0.0.1:1\"\n")
        .set_option("server.bind=127.0.0.1:2")
        .unwrap()
        .set_option("github.init_missing_branch=true")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(config.server.bind, "127.0.0.1:2");
    assert!(config.github.init_missing_branch);
}

#[test]
fn config_rejects_zero_ttl() {
    let result = Config::builder()
        .add_toml_str("[auth]\ntoken_ttl_secs = 0\n")
        .build();
    assert!(result.is_err());
}
