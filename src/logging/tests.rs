// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel, init_logging};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::OFF));
    assert_eq!(LogLevel::from_u8(6), Some(LogLevel::CHILD_OUTPUT));
    assert_eq!(LogLevel::from_u8(7), None);
    assert!(LogLevel::new(7).is_err());
    assert_eq!(u8::from(LogLevel::DEBUG), 4);
}

#[test]
fn test_filter_strings() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        "off",
        "error",
        "warn",
        "info",
        "debug",
        "trace,buildproc::child=off",
        "trace",
    ]
    "#);
}

#[test]
fn test_log_level_deserialize_rejects_out_of_range() {
    let level: LogLevel = serde_json::from_str("4").unwrap();
    assert_eq!(level, LogLevel::DEBUG);

    let err = serde_json::from_str::<LogLevel>("9").unwrap_err();
    assert!(err.to_string().contains("log level must be 0-6"), "{err}");
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}

#[test]
fn test_init_logging_creates_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("nested").join("buildproc.log");
    let config = LogConfig::builder()
        .with_console_level(LogLevel::OFF)
        .with_log_file(log_path.clone())
        .build();

    let guard = init_logging(&config).expect("first init succeeds");
    tracing::info!("written to file");
    drop(guard);

    assert!(log_path.exists());
    assert!(init_logging(&config).is_err(), "second init must fail");
}
