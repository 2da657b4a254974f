// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution operations.
//!
//! ```text
//! cmd_execute_no_wait     spawn -> start(DETACHED) -> release   -> finish
//! cmd_execute             spawn -> start()         -> wait      -> finish -> code
//! cmd_execute_and_stream_data
//!                         spawn -> start(REDIRECT) -> stream(f) -> finish -> code
//!   _and_stream_lines     stream_data + LineBuffer
//!   _and_capture_output   stream_data into one Vec<u8>
//! cmd_execute_modify_env  capture_output(cmd + marker + dump) -> parse -> Environment
//! ```
//!
//! `spawn`/`finish` are the cancellation state machine transitions; the
//! `InFlight` guard pairs them on every path, errors included.

use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, trace};

use super::handle::ProcessHandle;
use super::io::LineBuffer;
use super::spawner::{NativeSpawner, SpawnFlags, Spawner};
use crate::core::cancel::{self, CancelStateMachine};
use crate::core::env::Environment;
use crate::core::env::capture::{LINE_TERMINATOR, capture_command_line, parse_env_dump};
use crate::error::{EnvError, Result};
use crate::logging::CHILD_OUTPUT_TARGET;

/// Exit code and everything the child wrote to stdout and stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    exit_code: i32,
    output: Vec<u8>,
}

impl ExecutionResult {
    pub(super) const fn new(exit_code: i32, output: Vec<u8>) -> Self {
        Self { exit_code, output }
    }

    /// Returns the process exit code (0 = success).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns the captured bytes.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Returns the captured output decoded as UTF-8, lossily.
    #[must_use]
    pub fn output_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Returns true if the process exited with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs commands through a spawner under a cancellation state machine.
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner<'a, S = NativeSpawner> {
    cancel: &'a CancelStateMachine,
    spawner: S,
}

impl Default for CommandRunner<'static, NativeSpawner> {
    fn default() -> Self {
        Self::new(cancel::global(), NativeSpawner)
    }
}

impl<'a, S: Spawner> CommandRunner<'a, S> {
    #[must_use]
    pub const fn new(cancel: &'a CancelStateMachine, spawner: S) -> Self {
        Self { cancel, spawner }
    }

    /// The spawner commands are started with.
    #[must_use]
    pub const fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Starts `cmd_line` detached and returns without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be created.
    pub fn cmd_execute_no_wait(&self, cmd_line: &str) -> Result<()> {
        let timer = Instant::now();
        let in_flight = self.cancel.spawn();
        let handle = self
            .spawner
            .start(cmd_line, &Environment::inherit(), SpawnFlags::DETACHED)?;
        handle.release();
        in_flight.finish();

        debug!(elapsed_us = elapsed_us(timer), "cmd_execute_no_wait() returned");
        Ok(())
    }

    /// Runs `cmd_line` with inherited stdio and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be created or waited on. A
    /// non-zero exit is not an error.
    pub fn cmd_execute(&self, cmd_line: &str, env: &Environment) -> Result<i32> {
        let timer = Instant::now();
        let in_flight = self.cancel.spawn();
        let exit_code = self
            .spawner
            .start(cmd_line, env, SpawnFlags::empty())?
            .wait()?;
        in_flight.finish();

        debug!(
            exit_code,
            elapsed_us = elapsed_us(timer),
            "cmd_execute() returned"
        );
        Ok(exit_code)
    }

    /// Runs `cmd_line` and hands its merged stdout/stderr to `data_cb` in chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the process or its pipe cannot be created, or the
    /// output cannot be read.
    pub fn cmd_execute_and_stream_data<F>(
        &self,
        cmd_line: &str,
        env: &Environment,
        data_cb: F,
    ) -> Result<i32>
    where
        F: FnMut(&[u8]),
    {
        let timer = Instant::now();
        let in_flight = self.cancel.spawn();
        let handle: ProcessHandle = self
            .spawner
            .start(cmd_line, env, SpawnFlags::REDIRECT_OUTPUT)?;
        let exit_code = handle.wait_and_stream_output(data_cb)?;
        in_flight.finish();

        debug!(
            exit_code,
            elapsed_us = elapsed_us(timer),
            "cmd_execute_and_stream_data() returned"
        );
        Ok(exit_code)
    }

    /// Runs `cmd_line` and calls `per_line` for each output line.
    ///
    /// `per_line` fires once more at the end for any unterminated tail, even
    /// an empty one, so it is called at least once.
    ///
    /// # Errors
    ///
    /// Same as [`cmd_execute_and_stream_data`](Self::cmd_execute_and_stream_data).
    pub fn cmd_execute_and_stream_lines<F>(
        &self,
        cmd_line: &str,
        env: &Environment,
        mut per_line: F,
    ) -> Result<i32>
    where
        F: FnMut(&str),
    {
        let mut per_line = |line: &str| {
            trace!(target: CHILD_OUTPUT_TARGET, "{line}");
            per_line(line);
        };
        let mut lines = LineBuffer::new();
        let exit_code = self.cmd_execute_and_stream_data(cmd_line, env, |chunk| {
            lines.push(chunk, &mut per_line);
        })?;
        lines.finish(&mut per_line);
        Ok(exit_code)
    }

    /// Runs `cmd_line` and collects all of its output.
    ///
    /// # Errors
    ///
    /// Same as [`cmd_execute_and_stream_data`](Self::cmd_execute_and_stream_data).
    pub fn cmd_execute_and_capture_output(
        &self,
        cmd_line: &str,
        env: &Environment,
    ) -> Result<ExecutionResult> {
        let mut output = Vec::new();
        let exit_code = self.cmd_execute_and_stream_data(cmd_line, env, |chunk| {
            output.extend_from_slice(chunk);
        })?;
        trace!(bytes = output.len(), "captured output");
        Ok(ExecutionResult::new(exit_code, output))
    }

    /// Runs a setup command and returns the environment it leaves behind.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::CaptureFailed`] if the command exits non-zero and
    /// [`EnvError::MarkerNotFound`] if the variable dump cannot be located.
    pub fn cmd_execute_modify_env(&self, cmd_line: &str, env: &Environment) -> Result<Environment> {
        let actual_cmd_line = capture_command_line(cmd_line);
        let result = self.cmd_execute_and_capture_output(&actual_cmd_line, env)?;

        if !result.success() {
            return Err(EnvError::CaptureFailed {
                command: cmd_line.to_string(),
                exit_code: result.exit_code(),
            }
            .into());
        }

        let captured = parse_env_dump(&result.output_lossy(), LINE_TERMINATOR).ok_or_else(|| {
            EnvError::MarkerNotFound {
                command: cmd_line.to_string(),
            }
        })?;
        debug!(count = captured.len(), "captured environment");
        Ok(captured)
    }
}

fn elapsed_us(timer: Instant) -> u64 {
    u64::try_from(timer.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// [`CommandRunner::cmd_execute_no_wait`] on the process-wide state machine.
///
/// # Errors
///
/// Returns an error if the process cannot be created.
pub fn cmd_execute_no_wait(cmd_line: &str) -> Result<()> {
    CommandRunner::default().cmd_execute_no_wait(cmd_line)
}

/// [`CommandRunner::cmd_execute`] on the process-wide state machine.
///
/// # Errors
///
/// Returns an error if the process cannot be created or waited on.
pub fn cmd_execute(cmd_line: &str, env: &Environment) -> Result<i32> {
    CommandRunner::default().cmd_execute(cmd_line, env)
}

/// [`CommandRunner::cmd_execute_and_stream_lines`] on the process-wide state machine.
///
/// # Errors
///
/// Returns an error if the process cannot be created or its output read.
pub fn cmd_execute_and_stream_lines<F>(cmd_line: &str, env: &Environment, per_line: F) -> Result<i32>
where
    F: FnMut(&str),
{
    CommandRunner::default().cmd_execute_and_stream_lines(cmd_line, env, per_line)
}

/// [`CommandRunner::cmd_execute_and_capture_output`] on the process-wide state machine.
///
/// # Errors
///
/// Returns an error if the process cannot be created or its output read.
pub fn cmd_execute_and_capture_output(cmd_line: &str, env: &Environment) -> Result<ExecutionResult> {
    CommandRunner::default().cmd_execute_and_capture_output(cmd_line, env)
}

/// [`CommandRunner::cmd_execute_modify_env`] on the process-wide state machine.
///
/// # Errors
///
/// Returns an error if the setup command fails or its output is malformed.
pub fn cmd_execute_modify_env(cmd_line: &str, env: &Environment) -> Result<Environment> {
    CommandRunner::default().cmd_execute_modify_env(cmd_line, env)
}
