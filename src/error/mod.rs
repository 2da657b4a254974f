// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!        BuildProcError (16 bytes)
//!                 |
//!   +---------+---+-------+------+
//!   v         v           v      v
//! Process    Env       Config    Io
//!   Box      Box        Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Process EmptyCommand, PipeFailed, SpawnFailed, WaitFailed, OutputError
//!   Env     CaptureFailed, MarkerNotFound, MissingVariable
//!   Config  InvalidValue
//! ```
//!
//! A child exiting non-zero is not an error here; it is reported as an exit
//! code and the caller decides what it means for the build.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BuildProcError`].
pub type BuildProcResult<T> = std::result::Result<T, BuildProcError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at two words on the stack.
#[derive(Debug, Error)]
pub enum BuildProcError {
    /// Process creation or output handling failed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Environment construction or capture failed.
    #[error("environment error: {0}")]
    Env(#[from] Box<EnvError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BuildProcError {
                fn from(err: $error) -> Self {
                    BuildProcError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    EnvError => Env,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Process Errors ---

/// Process creation and output errors.
///
/// None of these are retried: they mean the interpreter is missing or the
/// environment is too broken to continue.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command line was empty.
    #[error("refusing to run an empty command line")]
    EmptyCommand,

    /// Creating the output or input pipe failed.
    #[error("failed to create pipe for '{command}': {source}")]
    PipeFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed to wait for process '{command}': {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or write a redirected pipe.
    #[error("failed to read output from process '{command}': {source}")]
    OutputError {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Environment Errors ---

/// Environment construction and capture errors.
#[derive(Debug, Error)]
pub enum EnvError {
    /// The setup command run for an environment capture did not succeed.
    #[error("environment capture command '{command}' exited with code {exit_code}")]
    CaptureFailed { command: String, exit_code: i32 },

    /// The capture marker was not present in the output.
    #[error("environment capture marker not found in output of '{command}'")]
    MarkerNotFound { command: String },

    /// A variable required to build the environment is not set.
    #[error("required environment variable '{name}' is not set")]
    MissingVariable { name: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
