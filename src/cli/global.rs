// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --ini FILE        ← Additional config files (can repeat)
//! --log-level N     ← Console verbosity (0-6)
//! --file-log-level  ← File verbosity (defaults to --log-level)
//! --log-file FILE   ← global.log_file override
//! --clean-env       ← env.clean = true
//! --set KEY=VAL     ← Direct config override
//!
//! Precedence: CLI flags > --set > BUILDPROC_* > --ini > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'i', long = "ini", value_name = "FILE", action = clap::ArgAction::Append)]
    pub inis: Vec<PathBuf>,

    /// Console log level (0=off, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=trace+child output).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to --log-level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Runs children in a fabricated environment instead of the inherited one.
    #[arg(long = "clean-env")]
    pub clean_env: bool,

    /// Sets an option, such as 'env.clean=true'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Skips loading `buildproc.toml` from the current directory.
    #[arg(long = "no-default-inis")]
    pub no_default_inis: bool,
}

impl GlobalOptions {
    /// Converts command-line options to `(key, value)` configuration overrides.
    ///
    /// `--set` entries come first so dedicated flags win.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a `--set` entry without `=`.
    pub fn to_config_overrides(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let mut overrides = self
            .options
            .iter()
            .map(|option| {
                option
                    .split_once('=')
                    .map(|(key, value)| (key.trim().to_string(), value.to_string()))
                    .ok_or_else(|| ConfigError::InvalidValue {
                        section: "cli".to_string(),
                        key: "set".to_string(),
                        message: format!("expected KEY=VALUE, got '{option}'"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(level) = self.log_level {
            overrides.push(("global.output_log_level".to_string(), level.to_string()));
        }

        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(("global.file_log_level".to_string(), level.to_string()));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(("global.log_file".to_string(), path.display().to_string()));
        }

        if self.clean_env {
            overrides.push(("env.clean".to_string(), "true".to_string()));
        }

        Ok(overrides)
    }
}
