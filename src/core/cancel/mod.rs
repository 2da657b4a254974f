// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cancellation coordination between an interrupt and blocked workers.
//!
//! ```text
//!   counter >= 0 : number of outstanding child waits
//!   counter <  0 : cancel requested, (counter - BIAS) still outstanding
//!
//!   spawn()           c >= 0 : c + 1           c < 0 : park forever
//!   finish()          prev == BIAS + 1 : last one, cleanup + exit(1)
//!                     prev < 0         : park forever
//!                     otherwise        : return
//!   request_cancel()  c >= 0 : c + BIAS        c < 0 : no-op
//!                     prev == 0        : cleanup + exit(1)
//! ```
//!
//! Every transition is a CAS loop (or a single `fetch_add`) on one atomic, so
//! `request_cancel` never blocks and never allocates.

mod interrupt;


pub use interrupt::{final_cleanup_and_exit, set_final_cleanup, watch_interrupts};

use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tracing::warn;

/// Integer type backing the counter.
type Counter = i32;

/// Added to the counter when cancellation is requested.
///
/// Its magnitude exceeds any realistic number of outstanding children, so
/// `counter - BIAS` still gives the outstanding count afterwards.
pub const BIAS: Counter = Counter::MIN;

/// Exit code used when the run is terminated by a user interrupt.
pub const CANCEL_EXIT_CODE: i32 = 1;

/// Interval between "waiting for child processes" notices of parked threads.
const PARK_NOTICE_INTERVAL: Duration = Duration::from_secs(10);

/// Process-wide state machine consulted by every command execution.
static GLOBAL: CancelStateMachine = CancelStateMachine::new();

/// Returns the process-wide state machine.
#[must_use]
pub fn global() -> &'static CancelStateMachine {
    &GLOBAL
}

/// Outcome of trying to register a new child wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTransition {
    /// Registered; the caller may start its child.
    Proceed,
    /// Cancellation is pending; the counter was left untouched.
    Cancelled,
}

/// Outcome of unregistering a finished child wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishTransition {
    /// Normal completion, no cancellation pending.
    Completed,
    /// Cancellation pending and this was the last outstanding child.
    Terminate,
    /// Cancellation pending and other children are still outstanding.
    Abandon,
}

/// Outcome of requesting cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelTransition {
    /// No children outstanding; terminate right away.
    Terminate,
    /// Children outstanding; the last `finish` terminates.
    Deferred,
    /// An earlier request already won.
    AlreadyRequested,
}

/// Single atomic counter encoding outstanding waits and a pending cancel.
#[derive(Debug)]
pub struct CancelStateMachine {
    counter: AtomicI32,
}

impl Default for CancelStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelStateMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicI32::new(0),
        }
    }

    /// Current raw counter value.
    #[must_use]
    pub fn value(&self) -> i32 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.value() < 0
    }

    /// Number of child waits still outstanding, whether or not a cancel is pending.
    #[must_use]
    pub fn outstanding(&self) -> u32 {
        let value = self.value();
        if value < 0 {
            value.wrapping_sub(BIAS).unsigned_abs()
        } else {
            value.unsigned_abs()
        }
    }

    /// Increments the counter unless cancellation is pending.
    pub fn try_spawn(&self) -> SpawnTransition {
        let mut current = self.counter.load(Ordering::SeqCst);
        loop {
            if current < 0 {
                return SpawnTransition::Cancelled;
            }
            match self.counter.compare_exchange_weak(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return SpawnTransition::Proceed,
                Err(actual) => current = actual,
            }
        }
    }

    /// Decrements the counter and classifies the previous value.
    pub fn try_finish(&self) -> FinishTransition {
        let previous = self.counter.fetch_sub(1, Ordering::SeqCst);
        if previous == BIAS + 1 {
            FinishTransition::Terminate
        } else if previous < 0 {
            FinishTransition::Abandon
        } else {
            FinishTransition::Completed
        }
    }

    /// Adds [`BIAS`] to the counter if no earlier request won.
    ///
    /// Only atomics are touched here, so this is safe from an interrupt
    /// context and may be re-entered.
    pub fn try_request_cancel(&self) -> CancelTransition {
        let mut current = self.counter.load(Ordering::SeqCst);
        loop {
            if current < 0 {
                return CancelTransition::AlreadyRequested;
            }
            match self.counter.compare_exchange_weak(
                current,
                current.wrapping_add(BIAS),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(0) => return CancelTransition::Terminate,
                Ok(_) => return CancelTransition::Deferred,
                Err(actual) => current = actual,
            }
        }
    }

    /// Registers a child wait.
    ///
    /// If cancellation is already pending this never returns: the calling
    /// thread parks until whichever thread sees the last child exits the
    /// process.
    pub fn spawn(&self) -> InFlight<'_> {
        match self.try_spawn() {
            SpawnTransition::Proceed => InFlight { machine: self },
            SpawnTransition::Cancelled => park_forever(),
        }
    }

    /// Unregisters a child wait.
    ///
    /// Must only follow a matching [`spawn`](Self::spawn); [`InFlight`]
    /// enforces that pairing.
    fn finish(&self) {
        match self.try_finish() {
            FinishTransition::Completed => {}
            FinishTransition::Terminate => final_cleanup_and_exit(CANCEL_EXIT_CODE),
            FinishTransition::Abandon => park_forever(),
        }
    }

    /// Requests cancellation of the whole run.
    pub fn request_cancel(&self) {
        match self.try_request_cancel() {
            CancelTransition::Terminate => final_cleanup_and_exit(CANCEL_EXIT_CODE),
            CancelTransition::Deferred => {
                warn!(
                    outstanding = self.outstanding(),
                    "Cancellation requested, waiting for child processes"
                );
            }
            CancelTransition::AlreadyRequested => {}
        }
    }
}

/// A registered child wait. Dropping it runs the matching `finish`.
#[must_use = "dropping the guard immediately unregisters the child wait"]
#[derive(Debug)]
pub struct InFlight<'a> {
    machine: &'a CancelStateMachine,
}

impl InFlight<'_> {
    /// Unregisters the wait now.
    ///
    /// Returns only for a normal completion; under a pending cancel the
    /// thread either exits the process or parks.
    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.machine.finish();
    }
}

/// Parks the calling thread for the rest of the process lifetime.
fn park_forever() -> ! {
    loop {
        std::thread::sleep(PARK_NOTICE_INTERVAL);
        warn!("Waiting for child processes to exit...");
    }
}
