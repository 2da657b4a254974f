// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::{self, ErrorKind, Write};

use super::exec::NumberedLines;

/// Accepts `budget` bytes, then fails every write like a closed pipe.
struct ClosedAfter {
    budget: usize,
    written: Vec<u8>,
}

impl Write for ClosedAfter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::from(ErrorKind::BrokenPipe));
        }
        let n = buf.len().min(self.budget);
        self.budget -= n;
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_numbered_lines_drops_empty_tail() {
    let mut out = Vec::new();
    let mut printer = NumberedLines::new(&mut out);
    for line in ["first", "second", ""] {
        printer.push(line);
    }
    printer.finish().unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "     1  first\n     2  second\n"
    );
}

#[test]
fn test_numbered_lines_keeps_non_empty_tail() {
    let mut out = Vec::new();
    let mut printer = NumberedLines::new(&mut out);
    printer.push("only");
    printer.finish().unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "     1  only\n");
}

#[test]
fn test_numbered_lines_stops_after_write_failure() {
    let first = "     1  a\n";
    let mut out = ClosedAfter {
        budget: first.len(),
        written: Vec::new(),
    };
    let mut printer = NumberedLines::new(&mut out);
    for line in ["a", "b", "c", "d"] {
        printer.push(line);
    }

    let err = printer.finish().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BrokenPipe);
    assert_eq!(out.written, first.as_bytes());
}
