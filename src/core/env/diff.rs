// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Comparing two environments.
//!
//! ```text
//! diff(before, after)
//!   in after only        Added
//!   in both, new value   Changed
//!   in before only       Removed
//! order: after's order, then removals in before's order
//! ```

use serde::Serialize;
use std::fmt;

use super::container::Environment;

/// One difference between two environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "lowercase")]
pub enum EnvChange {
    Added { name: String, value: String },
    Changed { name: String, old: String, new: String },
    Removed { name: String },
}

impl EnvChange {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name, .. } | Self::Changed { name, .. } | Self::Removed { name } => name,
        }
    }
}

impl fmt::Display for EnvChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name, value } => write!(f, "+ {name}={value}"),
            Self::Changed { name, old, new } => write!(f, "~ {name}={old} -> {new}"),
            Self::Removed { name } => write!(f, "- {name}"),
        }
    }
}

/// Lists what `after` adds, changes and removes relative to `before`.
///
/// The inherit marker stands for the caller's current environment.
#[must_use]
pub fn diff(before: &Environment, after: &Environment) -> Vec<EnvChange> {
    let before = resolve(before);
    let after = resolve(after);

    let mut changes: Vec<EnvChange> = after
        .iter()
        .filter_map(|(name, value)| match before.get(name) {
            None => Some(EnvChange::Added {
                name: name.to_string(),
                value: value.to_string(),
            }),
            Some(old) if old != value => Some(EnvChange::Changed {
                name: name.to_string(),
                old: old.to_string(),
                new: value.to_string(),
            }),
            Some(_) => None,
        })
        .collect();

    changes.extend(
        before
            .iter()
            .filter(|(name, _)| after.get(name).is_none())
            .map(|(name, _)| EnvChange::Removed {
                name: name.to_string(),
            }),
    );
    changes
}

fn resolve(env: &Environment) -> Environment {
    if env.is_inherit() {
        super::current_env()
    } else {
        env.clone()
    }
}
