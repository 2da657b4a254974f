// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Owned handle to a spawned child and its redirected pipes.
//!
//! ```text
//! ProcessHandle
//!   wait()                    close stdin, drain output, wait
//!   wait_and_stream_output(f) close stdin, read 1 KiB chunks -> f until EOF, wait
//!   release()                 give up the child without waiting
//! ```
//!
//! Output is always read to EOF before waiting: a child blocked on a full
//! pipe never exits.

use std::io::{ErrorKind, PipeReader, Read, Write};
use std::process::{Child, ChildStdin, ExitStatus};
use tracing::trace;

use crate::error::ProcessError;

/// Bytes read from the output pipe per callback.
pub const CHUNK_SIZE: usize = 1024;

/// A spawned child plus the parent ends of its redirected pipes.
#[derive(Debug)]
pub struct ProcessHandle {
    command: String,
    child: Child,
    output: Option<PipeReader>,
}

impl ProcessHandle {
    pub(super) const fn new(command: String, child: Child, output: Option<PipeReader>) -> Self {
        Self {
            command,
            child,
            output,
        }
    }

    /// OS process id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Returns true if output is redirected to this handle.
    #[must_use]
    pub const fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Writes bytes to the child's redirected stdin.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::OutputError`] if stdin is not redirected or the
    /// write fails.
    pub fn write_input(&mut self, bytes: &[u8]) -> Result<(), ProcessError> {
        let stdin: &mut ChildStdin = self.child.stdin.as_mut().ok_or_else(|| {
            ProcessError::OutputError {
                command: self.command.clone(),
                source: std::io::Error::new(ErrorKind::NotConnected, "stdin is not redirected"),
            }
        })?;
        stdin
            .write_all(bytes)
            .map_err(|source| ProcessError::OutputError {
                command: self.command.clone(),
                source,
            })
    }

    /// Waits for exit, discarding any redirected output.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the output or waiting fails.
    pub fn wait(self) -> Result<i32, ProcessError> {
        self.wait_and_stream_output(|_| {})
    }

    /// Streams redirected output to `on_chunk`, then waits for exit.
    ///
    /// Every non-empty chunk is at most [`CHUNK_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the output or waiting fails.
    pub fn wait_and_stream_output<F>(mut self, mut on_chunk: F) -> Result<i32, ProcessError>
    where
        F: FnMut(&[u8]),
    {
        // child sees EOF on stdin
        drop(self.child.stdin.take());

        if let Some(mut reader) = self.output.take() {
            let mut buf = [0u8; CHUNK_SIZE];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => on_chunk(&buf[..n]),
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(source) => {
                        // child may still be writing; closing our end lets it finish
                        drop(reader);
                        reap_in_background(self.child);
                        return Err(ProcessError::OutputError {
                            command: self.command,
                            source,
                        });
                    }
                }
            }
        }

        let status = self
            .child
            .wait()
            .map_err(|source| ProcessError::WaitFailed {
                command: self.command.clone(),
                source,
            })?;
        let code = exit_code(status);
        trace!(pid = self.child.id(), exit_code = code, "exited");
        Ok(code)
    }

    /// Releases the handle without waiting for the child.
    pub fn release(mut self) {
        drop(self.child.stdin.take());
        drop(self.output.take());
        reap_in_background(self.child);
    }
}

/// Waits for `child` on a detached thread so it does not linger as a zombie.
pub(super) fn reap_in_background(mut child: Child) {
    if cfg!(unix) {
        std::thread::spawn(move || {
            let _ = child.wait();
        });
    }
}

/// Exit code of a finished child; -1 when it ended without one.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
