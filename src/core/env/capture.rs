// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Marker protocol for learning the environment a setup script leaves behind.
//!
//! ```text
//! Windows: <cmd> & echo <MARKER>& set
//! other:   <cmd> && echo <MARKER> && env
//!
//! output:  ...<MARKER><EOL>NAME=VALUE<EOL>NAME=VALUE<EOL><line without '='>
//!                          ^--- parsed until a line has no '='
//! ```

use super::container::Environment;
use super::types::EnvData;

/// Token printed between the setup script's output and the variable dump.
pub const CAPTURE_MARKER: &str = "cdARN4xjKueKScMy9C6H";

/// Line terminator of the shell's variable dump.
pub const LINE_TERMINATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Appends the marker echo and the variable dump to `cmd_line`.
#[must_use]
pub fn capture_command_line(cmd_line: &str) -> String {
    if cfg!(windows) {
        format!("{cmd_line} & echo {CAPTURE_MARKER}& set")
    } else {
        format!("{cmd_line} && echo {CAPTURE_MARKER} && env")
    }
}

/// Parses the variable dump that follows the marker.
///
/// Returns `None` when `MARKER<terminator>` does not occur in `output`. A
/// trailing line without a terminator is ignored, as are entries with an
/// empty name.
#[must_use]
pub fn parse_env_dump(output: &str, terminator: &str) -> Option<Environment> {
    let start_marker = format!("{CAPTURE_MARKER}{terminator}");
    let start = output.find(&start_marker)? + start_marker.len();

    let mut data = EnvData::new();
    let mut rest = &output[start..];
    while let Some(end) = rest.find(terminator) {
        let line = &rest[..end];
        let Some((name, value)) = line.split_once('=') else {
            break;
        };
        if !name.is_empty() {
            data.insert(name, value);
        }
        rest = &rest[end + terminator.len()..];
    }

    Some(Environment::from_data(data))
}
