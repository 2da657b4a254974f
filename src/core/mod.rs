// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process execution, environments and cancellation.
//!
//! ```text
//!                  core
//!                   |
//!        +----------+----------+
//!        v          v          v
//!     cancel       env      process
//!        |          |          |
//!   state machine  Environment  Spawner
//!   InFlight      clean env    CommandRunner
//!   ctrl_c watch  env capture  LineBuffer
//! ```

pub mod cancel;
pub mod env;
pub mod process;
