// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Running independent commands on worker threads.
//!
//! ```text
//! run_parallel(runner, cmds, env, jobs)
//!   jobs scoped threads pull (index, cmd) from a flume queue
//!   each: runner.cmd_execute()  (own spawn/finish pair)
//!   results --> flume channel --> sorted by index
//! ```

use flume::{bounded, unbounded};
use tracing::{debug, warn};

use super::runner::CommandRunner;
use super::spawner::Spawner;
use crate::core::env::Environment;
use crate::error::Result;

/// Outcome of one command in a parallel batch.
#[derive(Debug)]
pub struct ParallelOutcome {
    /// Position of the command in the input.
    pub index: usize,
    /// The command line.
    pub command: String,
    /// Exit code, or the error that prevented running the command.
    pub result: Result<i32>,
}

/// Runs every command concurrently on at most `jobs` threads.
///
/// Outcomes are returned in input order. A cancellation requested while the
/// batch runs parks or exits the workers per the state machine.
pub fn run_parallel<S>(
    runner: &CommandRunner<'_, S>,
    commands: &[String],
    env: &Environment,
    jobs: usize,
) -> Vec<ParallelOutcome>
where
    S: Spawner,
{
    let jobs = jobs.clamp(1, commands.len().max(1));
    let (work_tx, work_rx) = unbounded::<(usize, &str)>();
    let (result_tx, result_rx) = bounded::<ParallelOutcome>(commands.len().max(1));

    for (index, command) in commands.iter().enumerate() {
        // receiver is alive until the scope below ends
        let _ = work_tx.send((index, command.as_str()));
    }
    drop(work_tx);

    debug!(commands = commands.len(), jobs, "running commands in parallel");

    std::thread::scope(|scope| {
        for _ in 0..jobs {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, command) in work_rx.iter() {
                    let result = runner.cmd_execute(command, env);
                    if let Err(e) = &result {
                        warn!(command, error = %e, "command failed to run");
                    }
                    let _ = result_tx.send(ParallelOutcome {
                        index,
                        command: command.to_string(),
                        result,
                    });
                }
            });
        }
    });
    drop(result_tx);

    let mut outcomes: Vec<_> = result_rx.iter().collect();
    outcomes.sort_by_key(|o| o.index);
    outcomes
}
