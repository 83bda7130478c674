// saree-admin: Storefront Admin Backend
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_conversion() {
    let conversions: Vec<_> = [-4, 0, 3, 5, 100]
        .into_iter()
        .map(|n| (n, LogLevel::from_int(n).as_u8()))
        .collect();
    assert_eq!(conversions, [(-4, 0), (0, 0), (3, 3), (5, 5), (100, 6)]);
    assert!(LogLevel::new(7).is_err());
}

#[test]
fn test_filter_quiets_http_stack_between_warn_and_dump() {
    insta::assert_snapshot!(LogLevel::WARN.to_filter_string(), @"warn");
    insta::assert_snapshot!(
        LogLevel::DEBUG.to_filter_string(),
        @"debug,hyper=warn,hyper_util=warn,reqwest=warn,h2=warn,rustls=warn,tower=warn"
    );
    insta::assert_snapshot!(LogLevel::DUMP.to_filter_string(), @"trace");
    insta::assert_snapshot!(LogLevel::SILENT.to_filter_string(), @"off");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
    assert!(!config.json());
}

#[test]
fn test_log_level_deserialize_range() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);
    let err = serde_json::from_str::<LogLevel>("9").unwrap_err();
    assert!(err.to_string().contains("0-6"));
}
