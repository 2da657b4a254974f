// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reproducible child environments built from an allow-list.
//!
//! ```text
//! allow_list + split(KEEP_ENV_VARS, ';')
//!   --> lookup each, drop unset/empty
//!   --> PATH = prepend dirs + system dirs (+ ";" + extra PATH)
//!   --> fixed vars (VSLANG on Windows)
//!   --> extra overrides (replace same-named values)
//!   --> Environment
//! ```

use bon::Builder;
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::container::{Environment, PATH_SEPARATOR};
use super::types::{EnvData, names_equal};
use crate::error::{EnvError, Result};

/// Variable holding extra names to propagate, separated by `;`.
pub const KEEP_ENV_VARS: &str = "BUILDPROC_KEEP_ENV_VARS";

/// Name the computed search path is stored under.
pub const PATH_VAR: &str = if cfg!(windows) { "Path" } else { "PATH" };

#[cfg(windows)]
const DEFAULT_ALLOW_LIST: &[&str] = &[
    "ALLUSERSPROFILE",
    "APPDATA",
    "CommonProgramFiles",
    "CommonProgramFiles(x86)",
    "CommonProgramW6432",
    "COMPUTERNAME",
    "ComSpec",
    "HOMEDRIVE",
    "HOMEPATH",
    "LOCALAPPDATA",
    "LOGONSERVER",
    "NUMBER_OF_PROCESSORS",
    "OS",
    "PATHEXT",
    "PROCESSOR_ARCHITECTURE",
    "PROCESSOR_ARCHITEW6432",
    "PROCESSOR_IDENTIFIER",
    "PROCESSOR_LEVEL",
    "PROCESSOR_REVISION",
    "ProgramData",
    "ProgramFiles",
    "ProgramFiles(x86)",
    "ProgramW6432",
    "PROMPT",
    "PSModulePath",
    "PUBLIC",
    "SystemDrive",
    "SystemRoot",
    "TEMP",
    "TMP",
    "USERDNSDOMAIN",
    "USERDOMAIN",
    "USERDOMAIN_ROAMINGPROFILE",
    "USERNAME",
    "USERPROFILE",
    "windir",
    // proxy settings for downloads made by build tools
    "http_proxy",
    "https_proxy",
    // CUDA toolkit discovery
    "CUDA_PATH",
    "CUDA_PATH_V9_0",
    "CUDA_PATH_V9_1",
    "CUDA_PATH_V10_0",
    "CUDA_PATH_V10_1",
    "CUDA_TOOLKIT_ROOT_DIR",
    "NVCUDASAMPLES_ROOT",
    "VULKAN_SDK",
    "ANDROID_NDK_HOME",
];

#[cfg(not(windows))]
const DEFAULT_ALLOW_LIST: &[&str] = &[
    "HOME",
    "USER",
    "LOGNAME",
    "SHELL",
    "LANG",
    "LC_ALL",
    "TERM",
    "TMPDIR",
    // proxy settings for downloads made by build tools
    "http_proxy",
    "https_proxy",
    "no_proxy",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "NO_PROXY",
    "CUDA_PATH",
    "CUDA_TOOLKIT_ROOT_DIR",
    "VULKAN_SDK",
    "ANDROID_NDK_HOME",
];

/// Builder for a fabricated, allow-listed environment.
#[derive(Debug, Clone, Builder)]
pub struct CleanEnvBuilder {
    /// Names copied from the ambient environment when set and non-empty.
    #[builder(default = DEFAULT_ALLOW_LIST.iter().map(ToString::to_string).collect())]
    allow_list: Vec<String>,
    /// Variable whose `;`-separated value adds names to the allow-list.
    #[builder(default = KEEP_ENV_VARS.to_string())]
    keep_list_var: String,
    /// Directories searched before the system directories.
    #[builder(default)]
    prepend_path: Vec<String>,
    /// Fixed system directories, in search order.
    system_path: Vec<String>,
    /// Variables always set, before overrides.
    #[builder(default)]
    fixed: Vec<(String, String)>,
    /// Caller overrides. `PATH` is appended to the computed search path.
    #[builder(default)]
    extra: Vec<(String, String)>,
}

impl CleanEnvBuilder {
    /// Builder preloaded with this host's system directories and fixed variables.
    ///
    /// # Errors
    ///
    /// On Windows, returns [`EnvError::MissingVariable`] when `SystemRoot` is unset.
    pub fn for_host() -> std::result::Result<Self, EnvError> {
        Ok(Self::builder()
            .system_path(host_system_path()?)
            .fixed(host_fixed_vars())
            .build())
    }

    /// Returns a copy using the given prepend directories.
    #[must_use]
    pub fn with_prepend_path(mut self, dirs: Vec<String>) -> Self {
        self.prepend_path = dirs;
        self
    }

    /// Returns a copy using the given overrides.
    #[must_use]
    pub fn with_extra(mut self, extra: Vec<(String, String)>) -> Self {
        self.extra = extra;
        self
    }

    /// Returns a copy with more allow-listed names.
    #[must_use]
    pub fn with_keep_vars(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.allow_list.extend(names);
        self
    }

    /// Builds from the real process environment.
    #[must_use]
    pub fn build_env(&self) -> Environment {
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Builds using `lookup` as the ambient environment.
    pub fn build_with<F>(&self, lookup: F) -> Environment
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut data = EnvData::new();

        let keep_vars = lookup(&self.keep_list_var).unwrap_or_default();
        let kept = keep_vars.split(';').filter(|name| !name.is_empty());

        for name in self.allow_list.iter().map(String::as_str).chain(kept) {
            match lookup(name) {
                Some(value) if !value.is_empty() => data.insert(name, value),
                _ => trace!(name, "not propagating unset variable"),
            }
        }

        data.insert(PATH_VAR, self.compute_path());

        for (name, value) in &self.fixed {
            data.insert(name.as_str(), value.as_str());
        }
        for (name, value) in self.extra.iter().filter(|(n, _)| !is_path(n)) {
            data.insert(name.as_str(), value.as_str());
        }

        let env = Environment::from_data(data);
        debug!(count = env.len(), "built clean environment");
        env
    }

    fn compute_path(&self) -> String {
        let mut path = self
            .prepend_path
            .iter()
            .chain(&self.system_path)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR);

        if let Some((_, extra_path)) = self.extra.iter().find(|(n, _)| is_path(n)) {
            path.push_str(PATH_SEPARATOR);
            path.push_str(extra_path);
        }
        path
    }
}

fn is_path(name: &str) -> bool {
    names_equal(name, PATH_VAR)
}

#[cfg(windows)]
fn host_system_path() -> std::result::Result<Vec<String>, EnvError> {
    let root = std::env::var("SystemRoot").map_err(|_| EnvError::MissingVariable {
        name: "SystemRoot".to_string(),
    })?;
    let system32 = format!(r"{root}\system32");
    Ok(vec![
        system32.clone(),
        root,
        format!(r"{system32}\Wbem"),
        format!(r"{system32}\WindowsPowerShell\v1.0\"),
    ])
}

#[cfg(not(windows))]
#[allow(clippy::unnecessary_wraps)]
fn host_system_path() -> std::result::Result<Vec<String>, EnvError> {
    Ok(["/usr/local/bin", "/usr/bin", "/bin", "/usr/sbin", "/sbin"]
        .iter()
        .map(ToString::to_string)
        .collect())
}

fn host_fixed_vars() -> Vec<(String, String)> {
    if cfg!(windows) {
        // keep tool output in English so it can be parsed
        vec![("VSLANG".to_string(), "1033".to_string())]
    } else {
        Vec::new()
    }
}

/// Environment for a child given overrides and extra search directories.
///
/// Windows always gets a fabricated, allow-listed environment. Elsewhere the
/// inherit marker is returned unless overrides or directories are given, in
/// which case the current environment is used as the base.
///
/// # Errors
///
/// Returns an error if the host environment lacks a required variable.
pub fn get_environment(extra: &[(String, String)], prepend_path: &[String]) -> Result<Environment> {
    if cfg!(windows) {
        return Ok(CleanEnvBuilder::for_host()?
            .with_prepend_path(prepend_path.to_vec())
            .with_extra(extra.to_vec())
            .build_env());
    }

    if extra.is_empty() && prepend_path.is_empty() {
        return Ok(Environment::inherit());
    }

    let mut data = super::current_env_data();
    let current_path = data.get(PATH_VAR).unwrap_or_default().to_string();
    let mut path: Vec<&str> = prepend_path.iter().map(String::as_str).collect();
    if !current_path.is_empty() {
        path.push(&current_path);
    }
    if let Some((_, extra_path)) = extra.iter().find(|(n, _)| is_path(n)) {
        path.push(extra_path);
    }
    data.insert(PATH_VAR, path.join(PATH_SEPARATOR));
    for (name, value) in extra.iter().filter(|(n, _)| !is_path(n)) {
        data.insert(name.as_str(), value.as_str());
    }
    Ok(Environment::from_data(data))
}

/// The process-wide clean environment, built on first use.
///
/// # Errors
///
/// Returns the error from the first build attempt, if it failed.
pub fn clean_environment() -> Result<Environment> {
    static CLEAN_ENV: OnceLock<std::result::Result<Environment, String>> = OnceLock::new();
    CLEAN_ENV
        .get_or_init(|| get_environment(&[], &[]).map_err(|e| e.to_string()))
        .clone()
        .map_err(|e| anyhow::anyhow!(e))
}
