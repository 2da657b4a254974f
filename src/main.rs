// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> final cleanup hook (flush logs)
//!   --> ctrl_c watcher --> spawn_blocking(Command Dispatch)
//!   Run | Capture | Lines | Spawn | EnvDiff | CleanEnv | Parallel
//!   Options | Inis | Version
//!   --> exit with the child's code
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use buildproc::cli::global::GlobalOptions;
use buildproc::cli::{self, Command};
use buildproc::cmd::config::{run_inis_command, run_options_command};
use buildproc::cmd::env::{environment_for, run_clean_env_command, run_env_diff_command};
use buildproc::cmd::exec::{
    run_capture_command, run_lines_command, run_parallel_command, run_run_command,
    run_spawn_command,
};
use buildproc::config::loader::ConfigLoader;
use buildproc::config::{Config, ENV_PREFIX};
use buildproc::core::cancel::{self, final_cleanup_and_exit, set_final_cleanup, watch_interrupts};
use buildproc::error::Result;
use buildproc::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const LOCAL_CONFIG_FILE: &str = "buildproc.toml";

#[tokio::main]
async fn main() {
    let cli = cli::parse();

    let loader = match build_config_loader(&cli.global) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            final_cleanup_and_exit(1);
        }
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            final_cleanup_and_exit(1);
        }
    };

    match init_logging(&build_log_config(&config)) {
        Ok(guard) => install_log_flush(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            final_cleanup_and_exit(1);
        }
    }

    tokio::spawn(watch_interrupts(cancel::global()));

    let Some(command) = cli.command else {
        eprintln!("No command specified. Use --help for usage information.");
        final_cleanup_and_exit(1);
    };

    let outcome =
        tokio::task::spawn_blocking(move || dispatch_command(command, &config, &loaded_files))
            .await;

    let code = match outcome {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            1
        }
        Err(e) => {
            eprintln!("Error: command task failed: {e}");
            1
        }
    };
    final_cleanup_and_exit(code);
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(config.global.log_file.clone())
        .build()
}

/// Makes every exit path, including cancellation, flush the file log.
fn install_log_flush(guard: LogGuard) {
    let slot = Arc::new(Mutex::new(Some(guard)));
    set_final_cleanup(move || {
        drop(slot.lock().unwrap_or_else(PoisonError::into_inner).take());
    });
}

fn dispatch_command(command: Command, config: &Config, loaded_files: &[String]) -> Result<i32> {
    match command {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Command::Options => {
            run_options_command(config);
            Ok(0)
        }
        Command::Inis => {
            run_inis_command(loaded_files);
            Ok(0)
        }
        Command::Run(args) => run_run_command(&args, &environment_for(config)?),
        Command::Capture(args) => run_capture_command(&args, &environment_for(config)?),
        Command::Lines(args) => run_lines_command(&args, &environment_for(config)?),
        Command::Spawn(args) => run_spawn_command(&args),
        Command::EnvDiff(args) => {
            run_env_diff_command(&args, &environment_for(config)?).map(|()| 0)
        }
        Command::CleanEnv(args) => {
            run_clean_env_command(&args, &environment_for(config)?).map(|()| 0)
        }
        Command::Parallel(args) => run_parallel_command(&args, &environment_for(config)?),
    }
}

fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    if !global.no_default_inis {
        loader = loader.add_toml_file_optional(LOCAL_CONFIG_FILE);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides()? {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}
