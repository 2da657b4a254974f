// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Types for environment variable management.
//!
//! ```text
//! EnvKey: case-insensitive on Windows (PATH == Path == path), exact elsewhere
//! EnvData: Vec<(EnvKey, String)>, insertion ordered, unique keys
//! ```

/// An environment variable name compared the way the host OS does.
#[derive(Debug, Clone, Eq)]
pub(super) struct EnvKey(String);

impl EnvKey {
    pub(super) fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub(super) fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a plain name using host rules.
    pub(super) fn matches(&self, name: &str) -> bool {
        names_equal(&self.0, name)
    }
}

impl PartialEq for EnvKey {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.0, &other.0)
    }
}

/// Host comparison of two variable names.
pub(crate) fn names_equal(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// Ordered variable storage shared between `Environment` clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct EnvData {
    vars: Vec<(EnvKey, String)>,
}

impl EnvData {
    pub(super) const fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub(super) fn vars(&self) -> &[(EnvKey, String)] {
        &self.vars
    }

    pub(super) fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k.matches(name))
            .map(|(_, v)| v.as_str())
    }

    /// Inserts or replaces, keeping the position of an existing name.
    pub(super) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.vars.iter_mut().find(|(k, _)| k.matches(&name)) {
            slot.1 = value;
        } else {
            self.vars.push((EnvKey::new(name), value));
        }
    }
}
