// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for buildproc using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! buildproc [global options] <command>
//! run <cmd>...          wait, exit with the child's code
//! capture <cmd>...      collect all output, then print it
//! lines <cmd>...        stream numbered lines
//! spawn <cmd>...        start detached, do not wait
//! env-diff <cmd>...     environment a setup script leaves behind
//! clean-env             the fabricated child environment
//! parallel <cmd> <cmd>  several commands on worker threads
//! options | inis | version
//! ```

pub mod env;
pub mod exec;
pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::env::{CleanEnvArgs, EnvDiffArgs};
use crate::cli::exec::{ExecArgs, ParallelArgs};
use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Build process execution layer.
///
/// Runs shell commands the way a package build orchestrator does.
#[derive(Debug, Parser)]
#[command(
    name = "buildproc",
    author,
    version,
    about = "Build Process Execution Layer",
    long_about = "buildproc Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs shell commands with a controlled environment, streams or\n\
                  captures their output, and defers Ctrl-C until running\n\
                  children have finished.",
    after_help = "CONFIG FILES:\n\n\
                  buildproc loads every --ini file in order, then `buildproc.toml`\n\
                  from the current directory if it exists (unless --no-default-inis),\n\
                  then BUILDPROC_<SECTION>__<KEY> environment variables."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files used.
    Inis,

    /// Runs a command and exits with its exit code.
    Run(ExecArgs),

    /// Runs a command, collects its output and prints it when it exits.
    Capture(ExecArgs),

    /// Runs a command and prints its output line by line.
    Lines(ExecArgs),

    /// Starts a command detached and returns immediately.
    Spawn(ExecArgs),

    /// Shows how a setup command changes the environment.
    #[command(name = "env-diff")]
    EnvDiff(EnvDiffArgs),

    /// Prints the environment children are started with.
    #[command(name = "clean-env")]
    CleanEnv(CleanEnvArgs),

    /// Runs several commands concurrently.
    Parallel(ParallelArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
