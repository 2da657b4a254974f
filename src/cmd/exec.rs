// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commands that run a shell command line.
//!
//! Each handler returns the exit code the binary should exit with.

use anyhow::Context;
use std::io::Write;
use tracing::{error, info};

use crate::cli::exec::{ExecArgs, ParallelArgs};
use crate::core::env::Environment;
use crate::core::process::parallel::run_parallel;
use crate::core::process::runner::{
    CommandRunner, cmd_execute, cmd_execute_and_capture_output, cmd_execute_and_stream_lines,
    cmd_execute_no_wait,
};
use crate::error::Result;

/// Runs the command with inherited stdio.
///
/// # Errors
///
/// Returns an error if the process cannot be started or waited on.
pub fn run_run_command(args: &ExecArgs, env: &Environment) -> Result<i32> {
    cmd_execute(&args.command_line(), env)
}

/// Runs the command and prints everything it wrote once it exits.
///
/// # Errors
///
/// Returns an error if the process fails to run or stdout cannot be written.
pub fn run_capture_command(args: &ExecArgs, env: &Environment) -> Result<i32> {
    let result = cmd_execute_and_capture_output(&args.command_line(), env)?;
    let mut out = std::io::stdout().lock();
    out.write_all(result.output())
        .and_then(|()| out.flush())
        .context("failed to write captured output")?;
    Ok(result.exit_code())
}

/// Runs the command and prints each output line with its number.
///
/// An empty unterminated tail is not printed.
///
/// # Errors
///
/// Returns an error if the process fails to run.
pub fn run_lines_command(args: &ExecArgs, env: &Environment) -> Result<i32> {
    let mut printer = NumberedLines::new(std::io::stdout().lock());
    let exit_code =
        cmd_execute_and_stream_lines(&args.command_line(), env, |line| printer.push(line))?;
    printer.finish().context("failed to write output lines")?;
    Ok(exit_code)
}

/// Numbered line printer for `lines`.
///
/// Holds back one line so an empty unterminated tail can be dropped. After the
/// first failed write nothing more is written; the error comes out of `finish`.
pub(super) struct NumberedLines<W> {
    out: W,
    number: usize,
    held: Option<String>,
    failed: Option<std::io::Error>,
}

impl<W: Write> NumberedLines<W> {
    pub(super) const fn new(out: W) -> Self {
        Self {
            out,
            number: 0,
            held: None,
            failed: None,
        }
    }

    pub(super) fn push(&mut self, line: &str) {
        if let Some(previous) = self.held.replace(line.to_string()) {
            self.emit(&previous);
        }
    }

    pub(super) fn finish(mut self) -> std::io::Result<()> {
        if let Some(last) = self.held.take().filter(|line| !line.is_empty()) {
            self.emit(&last);
        }
        match self.failed.take() {
            Some(e) => Err(e),
            None => self.out.flush(),
        }
    }

    fn emit(&mut self, line: &str) {
        if self.failed.is_some() {
            return;
        }
        self.number += 1;
        let number = self.number;
        if let Err(e) = writeln!(self.out, "{number:>6}  {line}") {
            self.failed = Some(e);
        }
    }
}

/// Starts the command detached.
///
/// # Errors
///
/// Returns an error if the process cannot be created.
pub fn run_spawn_command(args: &ExecArgs) -> Result<i32> {
    cmd_execute_no_wait(&args.command_line())?;
    info!(command = %args.command_line(), "started in the background");
    Ok(0)
}

/// Runs every command concurrently.
///
/// Returns the exit code of the first command, in argument order, that did
/// not succeed.
///
/// # Errors
///
/// Returns the error of the first command, in argument order, that could not
/// be run.
pub fn run_parallel_command(args: &ParallelArgs, env: &Environment) -> Result<i32> {
    let outcomes = run_parallel(&CommandRunner::default(), &args.commands, env, args.jobs);

    let mut first_failure: Option<Result<i32>> = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(0) => info!(index = outcome.index, command = %outcome.command, "succeeded"),
            Ok(code) => {
                error!(index = outcome.index, command = %outcome.command, exit_code = code, "failed");
                if first_failure.is_none() {
                    first_failure = Some(Ok(code));
                }
            }
            Err(e) => {
                error!(index = outcome.index, command = %outcome.command, error = %e, "could not run");
                if first_failure.is_none() {
                    first_failure = Some(Err(e));
                }
            }
        }
    }
    first_failure.unwrap_or(Ok(0))
}
