// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Starting a shell command line as a child process.
//!
//! ```text
//! Spawner::start(cmd_line, env, SpawnFlags)
//!   platform::shell_command()     cmd.exe /c "<cmd>" | /bin/sh -c <cmd>
//!   apply Environment             inherit | env_clear + ordered vars
//!   SpawnFlags
//!     DETACHED        null stdio, own group / DETACHED_PROCESS
//!     REDIRECT_OUTPUT one pipe for stdout + stderr
//!     REDIRECT_INPUT  piped stdin
//!     (none)          inherited stdio
//!   --> ProcessHandle
//! ```

use bitflags::bitflags;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::handle::ProcessHandle;
use crate::core::env::Environment;
use crate::error::ProcessError;

#[cfg(unix)]
use super::unix as platform;
#[cfg(windows)]
use super::windows as platform;

bitflags! {
    /// Creation-time options for a child process.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpawnFlags: u32 {
        /// Fire and forget: no stdio, not waited on
        const DETACHED = 0x01;
        /// Merge stdout and stderr into one pipe owned by the handle
        const REDIRECT_OUTPUT = 0x02;
        /// Give the handle the write end of a stdin pipe
        const REDIRECT_INPUT = 0x04;
    }
}

/// Creates child processes for shell command lines.
///
/// Quoting of `cmd_line` is the caller's job; it is handed to the shell
/// as one string.
pub trait Spawner: Send + Sync {
    /// Starts `cmd_line` under `env`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if the command line is empty, a pipe cannot
    /// be created, or the OS refuses to create the process.
    fn start(
        &self,
        cmd_line: &str,
        env: &Environment,
        flags: SpawnFlags,
    ) -> Result<ProcessHandle, ProcessError>;
}

/// Spawner backed by the host shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSpawner;

impl Spawner for NativeSpawner {
    fn start(
        &self,
        cmd_line: &str,
        env: &Environment,
        flags: SpawnFlags,
    ) -> Result<ProcessHandle, ProcessError> {
        if cmd_line.trim().is_empty() {
            return Err(ProcessError::EmptyCommand);
        }

        let mut command = platform::shell_command(cmd_line);
        apply_environment(&mut command, env);
        platform::apply_creation_flags(&mut command, flags);

        let output = if flags.contains(SpawnFlags::DETACHED) {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            None
        } else if flags.contains(SpawnFlags::REDIRECT_OUTPUT) {
            let pipe_failed = |source| ProcessError::PipeFailed {
                command: cmd_line.to_string(),
                source,
            };
            // std pipes are created non-inheritable; only the child's copy is inherited
            let (reader, writer) = std::io::pipe().map_err(pipe_failed)?;
            let writer_err = writer.try_clone().map_err(pipe_failed)?;
            command.stdout(writer).stderr(writer_err);
            Some(reader)
        } else {
            None
        };

        if !flags.contains(SpawnFlags::DETACHED) {
            command.stdin(if flags.contains(SpawnFlags::REDIRECT_INPUT) {
                Stdio::piped()
            } else if flags.contains(SpawnFlags::REDIRECT_OUTPUT) {
                Stdio::null()
            } else {
                Stdio::inherit()
            });
        }

        debug!(cmd = %cmd_line, ?flags, inherit_env = env.is_inherit(), "exec");

        // keep our own output ordered before the child's
        let _ = std::io::stdout().flush();

        let child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.to_string(),
            source,
        })?;

        // drops the parent's copies of the pipe write ends so the reader sees EOF
        drop(command);

        trace!(pid = child.id(), "spawned");
        Ok(ProcessHandle::new(cmd_line.to_string(), child, output))
    }
}

/// Applies an environment to a command; the inherit marker leaves it untouched.
fn apply_environment(command: &mut Command, env: &Environment) {
    if env.is_inherit() {
        return;
    }
    command.env_clear();
    command.envs(env.iter());
}
