// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        run / capture / lines / spawn
//!                |        env-diff / clean-env / parallel
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + BUILDPROC_* vars  |
//!              '-------------+-------------'
//!                            v
//!   +-----------------------------------------------+
//!   |  core   cancel (state machine, ctrl_c)        |
//!   |         env (Environment, clean env, capture) |
//!   |         process (Spawner, CommandRunner)      |
//!   +-----------------------------------------------+
//!   |  foundation   error, logging                  |
//!   +-----------------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
