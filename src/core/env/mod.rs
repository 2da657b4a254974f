// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment variable management.
//!
//! # Architecture
//!
//! ```text
//! Environment (immutable, Arc-shared, ordered)
//! Sources: Environment::inherit(), CleanEnvBuilder, get_environment(),
//!          clean_environment() (cached), parse_env_dump()
//! diff(): what a setup script added, changed or removed
//! ```
//!
//! - **Case-insensitive on Windows**
//! - **Insertion ordered**: the child sees variables in build order

pub mod capture;
pub mod clean;
pub mod container;
pub mod diff;
mod types;


pub use container::Environment;
pub use diff::EnvChange;

/// Captures the current process environment as a fabricated environment.
#[must_use]
pub fn current_env() -> Environment {
    Environment::from_data(current_env_data())
}

fn current_env_data() -> types::EnvData {
    let mut data = types::EnvData::new();
    for (k, v) in std::env::vars_os() {
        data.insert(k.to_string_lossy(), v.to_string_lossy());
    }
    data
}
