// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the commands that run a shell command line.
//!
//! ```text
//! run | capture | lines | spawn  <COMMAND>...   words joined with ' '
//! parallel [-j N] <COMMAND>...                  one command line per argument
//! ```

use clap::Args;
use std::num::NonZeroUsize;

/// A shell command line given as trailing words.
#[derive(Debug, Clone, Default, Args)]
pub struct ExecArgs {
    /// Command line handed to the shell; quote it to keep shell syntax intact.
    #[arg(
        value_name = "COMMAND",
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl ExecArgs {
    /// The words joined into a single command line.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Arguments for the `parallel` command.
#[derive(Debug, Clone, Args)]
pub struct ParallelArgs {
    /// Maximum number of commands running at once (0 is treated as 1).
    #[arg(short = 'j', long = "jobs", value_name = "N", default_value_t = default_jobs())]
    pub jobs: usize,

    /// Command lines, one per argument.
    #[arg(value_name = "COMMAND", required = true)]
    pub commands: Vec<String>,
}

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}
