// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Turning raw output chunks into lines.
//!
//! ```text
//! push("ab")    buf "ab"
//! push("c\nde") emit "abc", buf "de"
//! push("f")     buf "def"
//! finish()      emit "def"   (always emits once, even if empty)
//! ```

/// Buffers bytes until a `\n` completes a line.
///
/// Lines are handed out without the `\n`; a preceding `\r` is kept.
/// Invalid UTF-8 is replaced lossily per line, so multi-byte characters split
/// across chunks decode correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends a chunk and emits every complete line.
    pub fn push<F>(&mut self, chunk: &[u8], mut per_line: F)
    where
        F: FnMut(&str),
    {
        let mut search = self.buf.len();
        self.buf.extend_from_slice(chunk);

        let mut consumed = 0;
        while let Some(pos) = self.buf[search..].iter().position(|&b| b == b'\n') {
            let end = search + pos;
            per_line(&String::from_utf8_lossy(&self.buf[consumed..end]));
            consumed = end + 1;
            search = consumed;
        }
        self.buf.drain(..consumed);
    }

    /// Emits whatever remains as the final line.
    pub fn finish<F>(self, mut per_line: F)
    where
        F: FnMut(&str),
    {
        per_line(&String::from_utf8_lossy(&self.buf));
    }

    /// Bytes waiting for a line terminator.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }
}
