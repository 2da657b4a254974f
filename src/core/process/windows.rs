// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Windows process creation.
//!
//! ```text
//! shell_command(cmd) --> cmd.exe /c "<cmd>"   (one pair of outer quotes)
//! every child        --> IDLE_PRIORITY_CLASS
//! DETACHED           --> DETACHED_PROCESS
//! ```

use std::os::windows::process::CommandExt;
use std::process::Command;
use windows::Win32::System::Threading::{DETACHED_PROCESS, IDLE_PRIORITY_CLASS};

use super::spawner::SpawnFlags;

pub(super) fn shell_command(cmd_line: &str) -> Command {
    let mut command = Command::new("cmd.exe");
    // cmd.exe strips the outer quotes and runs the rest verbatim
    command.raw_arg(format!("/c \"{cmd_line}\""));
    command
}

pub(super) fn apply_creation_flags(command: &mut Command, flags: SpawnFlags) {
    let mut creation = IDLE_PRIORITY_CLASS.0;
    if flags.contains(SpawnFlags::DETACHED) {
        creation |= DETACHED_PROCESS.0;
    }
    command.creation_flags(creation);
}
