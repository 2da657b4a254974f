// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types.
//!
//! ```text
//! Config
//!   global: output_log_level, file_log_level, log_file
//!   env:    clean, keep_vars, prepend_path, extra [{ name, value }]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file log when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// One environment override, applied in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvVarSetting {
    pub name: String,
    pub value: String,
}

/// Environment handed to child processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// Run children in a fabricated environment instead of the inherited one.
    pub clean: bool,
    /// Additional variable names copied from the parent into a clean environment.
    pub keep_vars: Vec<String>,
    /// Directories placed in front of the system PATH.
    pub prepend_path: Vec<String>,
    /// Variables set on top of the base environment.
    pub extra: Vec<EnvVarSetting>,
}

impl EnvConfig {
    /// Overrides as `(name, value)` pairs.
    #[must_use]
    pub fn extra_pairs(&self) -> Vec<(String, String)> {
        self.extra
            .iter()
            .map(|setting| (setting.name.clone(), setting.value.clone()))
            .collect()
    }

    /// Checks every variable name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty name or one containing `=`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in &self.keep_vars {
            validate_var_name("keep_vars", name)?;
        }
        for setting in &self.extra {
            validate_var_name("extra", &setting.name)?;
        }
        Ok(())
    }
}

fn validate_var_name(key: &str, name: &str) -> Result<(), ConfigError> {
    let problem = if name.is_empty() {
        "variable name is empty"
    } else if name.contains('=') {
        "variable name contains '='"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidValue {
        section: "env".to_string(),
        key: key.to_string(),
        message: format!("{problem}: '{name}'"),
    })
}
