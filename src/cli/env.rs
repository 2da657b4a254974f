// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment command arguments.

use clap::Args;

use super::exec::ExecArgs;

/// Arguments for the `env-diff` command.
#[derive(Debug, Clone, Default, Args)]
pub struct EnvDiffArgs {
    /// Print the changes as JSON.
    #[arg(long)]
    pub json: bool,

    /// Setup command whose resulting environment is compared.
    #[command(flatten)]
    pub exec: ExecArgs,
}

/// Arguments for the `clean-env` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CleanEnvArgs {
    /// Print the environment as JSON (`null` for the inherit marker).
    #[arg(long)]
    pub json: bool,
}
