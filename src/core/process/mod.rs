// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Blocking process spawning and output streaming.
//!
//! ```text
//! CommandRunner::cmd_execute*(cmd_line, &Environment)
//!   CancelStateMachine::spawn()
//!   Spawner::start() --> ProcessHandle
//!       Windows: cmd.exe /c "..." (idle priority)
//!       other:   /bin/sh -c ...
//!   wait / drain pipe in 1 KiB chunks / LineBuffer
//!   InFlight::finish()
//!   --> exit code | ExecutionResult { exit_code, output } | Environment
//! ```

pub mod handle;
pub mod io;
pub mod parallel;
pub mod runner;
pub mod spawner;

#[cfg(test)]
mod tests;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use handle::ProcessHandle;
pub use io::LineBuffer;
pub use runner::{CommandRunner, ExecutionResult};
pub use spawner::{NativeSpawner, SpawnFlags, Spawner};
