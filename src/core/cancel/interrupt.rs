// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interrupt registration and the final exit path.
//!
//! ```text
//! tokio::signal::ctrl_c() --> CancelStateMachine::request_cancel()
//! final_cleanup_and_exit(code)
//!   first caller --> cleanup hook --> process::exit(code)
//!   later caller --> park until the first caller exits
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, error};

use super::{CancelStateMachine, park_forever};

type CleanupHook = Box<dyn FnOnce() + Send>;

/// Set by the first `final_cleanup_and_exit` call; it alone picks the exit code.
static EXITING: AtomicBool = AtomicBool::new(false);

/// Hook run at most once, by the first `final_cleanup_and_exit` call.
static FINAL_CLEANUP: OnceLock<Mutex<Option<CleanupHook>>> = OnceLock::new();

/// Registers the cleanup run before the process exits.
///
/// Returns false if a hook was already registered.
pub fn set_final_cleanup(hook: impl FnOnce() + Send + 'static) -> bool {
    FINAL_CLEANUP.set(Mutex::new(Some(Box::new(hook)))).is_ok()
}

/// Runs the registered cleanup hook and terminates the process.
///
/// Only the first caller runs the hook and exits with its `code`. Concurrent
/// or later callers park until that exit happens.
pub fn final_cleanup_and_exit(code: i32) -> ! {
    if EXITING.swap(true, Ordering::SeqCst) {
        debug!(code, "exit already in progress");
        park_forever();
    }
    debug!(code, "final cleanup");
    if let Some(slot) = FINAL_CLEANUP.get() {
        let hook = slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(hook) = hook {
            hook();
        }
    }
    std::process::exit(code)
}

/// Forwards every Ctrl+C to `machine.request_cancel()`.
///
/// Runs until the signal stream fails; spawn it once at startup.
pub async fn watch_interrupts(machine: &'static CancelStateMachine) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        debug!("received Ctrl+C");
        machine.request_cancel();
    }
}
