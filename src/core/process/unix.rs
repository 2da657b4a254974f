// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Unix process creation.
//!
//! ```text
//! shell_command(cmd) --> /bin/sh -c <cmd>
//! DETACHED           --> own process group (no terminal Ctrl+C)
//! ```

use std::os::unix::process::CommandExt;
use std::process::Command;

use super::spawner::SpawnFlags;

const SHELL: &str = "/bin/sh";

pub(super) fn shell_command(cmd_line: &str) -> Command {
    let mut command = Command::new(SHELL);
    command.arg("-c").arg(cmd_line);
    command
}

pub(super) fn apply_creation_flags(command: &mut Command, flags: SpawnFlags) {
    if flags.contains(SpawnFlags::DETACHED) {
        command.process_group(0);
    }
}
