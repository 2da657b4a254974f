// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment commands and the environment every command runs children in.
//!
//! ```text
//! environment_for(config)
//!   env.clean = true   CleanEnvBuilder::for_host() + keep_vars + prepend_path + extra
//!   env.clean = false  get_environment(extra, prepend_path)
//!                      (inherit marker on Unix when nothing is overridden)
//! ```

use std::io::Write;
use tracing::{debug, info};

use crate::cli::env::{CleanEnvArgs, EnvDiffArgs};
use crate::config::Config;
use crate::core::env::Environment;
use crate::core::env::clean::{CleanEnvBuilder, get_environment};
use crate::core::env::diff::diff;
use crate::core::process::runner::cmd_execute_modify_env;
use crate::error::Result;

/// Builds the environment children are started with under `config`.
///
/// # Errors
///
/// Returns an error if the host environment lacks a required variable.
pub fn environment_for(config: &Config) -> Result<Environment> {
    let env = if config.env.clean {
        CleanEnvBuilder::for_host()?
            .with_keep_vars(config.env.keep_vars.iter().cloned())
            .with_prepend_path(config.env.prepend_path.clone())
            .with_extra(config.env.extra_pairs())
            .build_env()
    } else {
        get_environment(&config.env.extra_pairs(), &config.env.prepend_path)?
    };
    debug!(
        clean = config.env.clean,
        inherit = env.is_inherit(),
        count = env.len(),
        "child environment ready"
    );
    Ok(env)
}

/// Prints what a setup command changes in the environment.
///
/// # Errors
///
/// Returns an error if the setup command fails or its variables cannot be
/// captured.
pub fn run_env_diff_command(args: &EnvDiffArgs, env: &Environment) -> Result<()> {
    let cmd_line = args.exec.command_line();
    let captured = cmd_execute_modify_env(&cmd_line, env)?;
    let changes = diff(env, &captured);
    info!(changes = changes.len(), "setup command finished");

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &changes)?;
        writeln!(out)?;
    } else {
        for change in &changes {
            writeln!(out, "{change}")?;
        }
    }
    Ok(())
}

/// Prints the environment children are started with.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_clean_env_command(args: &CleanEnvArgs, env: &Environment) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, env)?;
        writeln!(out)?;
    } else if env.is_inherit() {
        writeln!(out, "<inherit>")?;
    } else {
        for entry in env.to_entries() {
            writeln!(out, "{entry}")?;
        }
    }
    Ok(())
}
