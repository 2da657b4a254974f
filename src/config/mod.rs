// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for buildproc.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --ini files (in order)
//! 3. local buildproc.toml (cwd, optional)
//! 4. BUILDPROC_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! BUILDPROC_GLOBAL__OUTPUT_LOG_LEVEL=4   → global.output_log_level = 4
//! BUILDPROC_ENV__CLEAN=true              → env.clean = true
//! BUILDPROC_ENV__KEEP_VARS=CC;CXX        → env.keep_vars = ["CC", "CXX"]
//! BUILDPROC_ENV__PREPEND_PATH=/opt/bin   → env.prepend_path = ["/opt/bin"]
//! ```
//!
//! # Example
//!
//! ```toml
//! [global]
//! output_log_level = 4
//! log_file = "logs/buildproc.log"
//!
//! [env]
//! clean = true
//! keep_vars = ["CC"]
//! prepend_path = ["/opt/toolchain/bin"]
//!
//! [[env.extra]]
//! name = "CFLAGS"
//! value = "-O2"
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{EnvConfig, GlobalConfig};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "BUILDPROC";

/// Complete application configuration.
///
/// Unknown top-level keys are ignored so unrelated `BUILDPROC_*` variables
/// (such as the keep-list) do not break loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Child process environment.
    pub env: EnvConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use buildproc::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("buildproc.toml")
    ///     .with_env_prefix("BUILDPROC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validates the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable name is invalid.
    pub fn validate(&self) -> Result<()> {
        self.env.validate()?;
        Ok(())
    }

    /// Format configuration options for display, one `key = value` per line.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("env.clean".to_string(), self.env.clean.to_string());
        options.insert("env.keep_vars".to_string(), self.env.keep_vars.join(";"));
        options.insert(
            "env.prepend_path".to_string(),
            self.env.prepend_path.join(";"),
        );
        for setting in &self.env.extra {
            options.insert(format!("env.extra.{}", setting.name), setting.value.clone());
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
