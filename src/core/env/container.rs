// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The environment handed to a child process.
//!
//! ```text
//! Environment
//!   inherit()        data: None      child sees the caller's environment
//!   from_pairs(..)   data: Some(Arc) exactly these variables, in order
//! clones share the Arc; nothing mutates after construction
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::EnvData;

/// Separator between PATH entries on this host.
pub const PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// An immutable set of variables for a child, or the inherit marker.
///
/// Both variants are passed to the spawner unchanged; it decides how to
/// apply them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    data: Option<Arc<EnvData>>,
}

impl Environment {
    /// The marker meaning "inherit the caller's environment verbatim".
    #[must_use]
    pub const fn inherit() -> Self {
        Self { data: None }
    }

    /// Builds a fabricated environment from ordered pairs.
    ///
    /// A repeated name replaces the earlier value but keeps its position.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = EnvData::new();
        for (k, v) in pairs {
            data.insert(k, v);
        }
        Self::from_data(data)
    }

    pub(super) fn from_data(data: EnvData) -> Self {
        Self {
            data: Some(Arc::new(data)),
        }
    }

    /// Returns true for the inherit marker.
    #[must_use]
    pub const fn is_inherit(&self) -> bool {
        self.data.is_none()
    }

    /// Gets a variable value. Always `None` for the inherit marker.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.get(key))
    }

    /// Returns an iterator over the variables in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .flat_map(|d| d.vars().iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Returns true if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.as_ref().is_none_or(|d| d.vars().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.vars().len())
    }

    /// Returns a copy with `overrides` applied on top.
    ///
    /// Applied to the inherit marker this starts from the caller's current
    /// environment, so the result is always fabricated.
    #[must_use]
    pub fn with_overrides<'a, I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut data = match &self.data {
            Some(data) => (**data).clone(),
            None => super::current_env_data(),
        };
        for (k, v) in overrides {
            data.insert(k, v);
        }
        Self::from_data(data)
    }

    /// Returns all variables as a sorted map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    /// Renders `name=value` entries in order, the form an OS environment block uses.
    #[must_use]
    pub fn to_entries(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

impl Serialize for Environment {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.is_inherit() {
            return serializer.serialize_none();
        }
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
