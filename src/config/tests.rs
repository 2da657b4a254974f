// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::types::{EnvConfig, EnvVarSetting};
use super::{Config, ConfigLoader, ENV_PREFIX};
use crate::error::ConfigError;
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert_eq!(config.global.file_log_level, LogLevel::TRACE);
    assert!(config.global.log_file.is_none());
    assert!(!config.env.clean);
    assert!(config.env.extra.is_empty());
}

#[test]
fn test_config_parse() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4
log_file = "logs/buildproc.log"

[env]
clean = true
keep_vars = ["CC", "CXX"]
prepend_path = ["/opt/toolchain/bin"]

[[env.extra]]
name = "CFLAGS"
value = "-O2"

[[env.extra]]
name = "LDFLAGS"
value = ""
"#,
    )
    .expect("parse should succeed");

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(
        config.global.log_file,
        Some(PathBuf::from("logs/buildproc.log"))
    );
    assert!(config.env.clean);
    assert_eq!(config.env.keep_vars, vec!["CC", "CXX"]);
    assert_eq!(config.env.prepend_path, vec!["/opt/toolchain/bin"]);
    assert_eq!(
        config.env.extra_pairs(),
        vec![
            ("CFLAGS".to_string(), "-O2".to_string()),
            ("LDFLAGS".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_extra_names_keep_case() {
    let config = Config::parse("[[env.extra]]\nname = \"MixedCase\"\nvalue = \"Value\"").unwrap();
    assert_eq!(config.env.extra[0].name, "MixedCase");
    assert_eq!(config.env.extra[0].value, "Value");
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Config::parse("[global]\noutput_log_level = 9");
    assert!(result.is_err());
}

#[test]
fn test_unknown_env_key_rejected() {
    let result = Config::parse("[env]\ncleen = true");
    assert!(result.is_err(), "typos inside a section are errors");
}

#[test]
fn test_validation_rejects_bad_names() {
    let result = Config::parse("[[env.extra]]\nname = \"A=B\"\nvalue = \"x\"");
    let err = result.unwrap_err();
    let config_err = err.downcast_ref::<ConfigError>().expect("typed error");
    insta::assert_snapshot!(
        config_err.to_string(),
        @"invalid value for 'extra' in section '[env]': variable name contains '=': 'A=B'"
    );

    let env = EnvConfig {
        keep_vars: vec![String::new()],
        ..EnvConfig::default()
    };
    assert!(env.validate().is_err());
}

#[test]
fn test_validation_accepts_good_names() {
    let env = EnvConfig {
        keep_vars: vec!["CC".to_string()],
        extra: vec![EnvVarSetting {
            name: "PATH".to_string(),
            value: "/extra".to_string(),
        }],
        ..EnvConfig::default()
    };
    assert!(env.validate().is_ok());
}

#[test]
fn test_format_options_deterministic() {
    let config = Config::parse(
        "[global]\nlog_file = \"out.log\"\n[env]\nclean = true\nkeep_vars = [\"CC\", \"CXX\"]\nprepend_path = [\"/opt/bin\"]\n[[env.extra]]\nname = \"X\"\nvalue = \"1\"",
    )
    .unwrap();

    let first = config.format_options();
    assert_eq!(first, config.format_options());
    insta::assert_snapshot!(first.join("\n"), @r"
    env.clean               = true
    env.extra.X             = 1
    env.keep_vars           = CC;CXX
    env.prepend_path        = /opt/bin
    global.file_log_level   = 5
    global.log_file         = out.log
    global.output_log_level = 3
    ");
}

// --- ConfigLoader Tests ---

#[test]
fn test_config_loader_tracks_files() {
    let loader = ConfigLoader::new()
        .add_toml_str("[env]\nclean = true")
        .add_toml_file_optional("/nonexistent/path.toml");

    let files = loader.loaded_files();
    assert_eq!(files.len(), 1, "missing optional files are not tracked");
    assert_eq!(files[0].0, "string");
    assert_eq!(loader.format_loaded_files(), vec!["1. [string] <string>"]);
}

#[test]
fn test_config_loader_add_toml_file_success() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "[env]\nclean = true\nkeep_vars = [\"HOME\"]").expect("failed to write");

    let config = Config::from_file(file.path()).expect("build should succeed");

    assert!(config.env.clean);
    assert_eq!(config.env.keep_vars, vec!["HOME"]);
}

#[test]
fn test_config_loader_add_toml_file_not_found() {
    let loader = ConfigLoader::new().add_toml_file("/nonexistent/path/to/config.toml");
    assert!(loader.build().is_err());
}

#[test]
fn test_config_loader_add_toml_file_invalid_toml() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "this is not valid toml {{{{{{").expect("failed to write");

    let result = ConfigLoader::new().add_toml_file(file.path()).build();
    assert!(result.is_err(), "build should fail with invalid TOML");
}

#[test]
fn test_config_loader_with_env_vars() {
    let config = ConfigLoader::new()
        .add_toml_str("[env]\nclean = false")
        .with_env_prefix(ENV_PREFIX)
        .with_env_vars([
            ("BUILDPROC_ENV__CLEAN", "true"),
            ("BUILDPROC_ENV__KEEP_VARS", "CC;CXX"),
            ("BUILDPROC_GLOBAL__OUTPUT_LOG_LEVEL", "4"),
            ("BUILDPROC_KEEP_ENV_VARS", "ignored"),
            ("UNRELATED", "1"),
        ])
        .build()
        .expect("build should succeed");

    assert!(config.env.clean, "env var should override TOML value");
    assert_eq!(config.env.keep_vars, vec!["CC", "CXX"]);
    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
}

#[test]
fn test_config_loader_set_override() {
    let config = ConfigLoader::new()
        .add_toml_str("[env]\nclean = false")
        .set("env.clean", true)
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert!(config.env.clean, "set override should take effect");
}

#[test]
fn test_config_loader_layered_sources() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(
        file,
        "[global]\noutput_log_level = 2\n\n[env]\nkeep_vars = [\"CC\"]"
    )
    .expect("failed to write");

    let config = ConfigLoader::new()
        .add_toml_file(file.path())
        .add_toml_str("[global]\noutput_log_level = 5")
        .build()
        .expect("build should succeed");

    assert_eq!(config.global.output_log_level, LogLevel::TRACE, "string overrides file");
    assert_eq!(config.env.keep_vars, vec!["CC"], "file value persists");
}

#[test]
fn test_config_loader_build_deserialization_error() {
    let result = ConfigLoader::new()
        .add_toml_str("[env]\nclean = \"not a boolean\"")
        .build();

    let err_str = result.unwrap_err().to_string();
    assert!(
        err_str.contains("clean") || err_str.contains("invalid type"),
        "error should mention the problematic field: {err_str}"
    );
}

#[test]
fn test_config_loader_default_impl() {
    let config1 = ConfigLoader::new().build().expect("build should succeed");
    let config2 = ConfigLoader::default().build().expect("build should succeed");
    assert_eq!(config1, config2);
    assert_eq!(config1, Config::default());
}
