// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config: options, inis
//!   env:    env-diff, clean-env, environment_for(config)
//!   exec:   run, capture, lines, spawn, parallel
//! ```

pub mod config;
pub mod env;
pub mod exec;

#[cfg(test)]
mod tests;
