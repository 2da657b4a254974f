// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Command};
use clap::{CommandFactory, Parser};

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["buildproc", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_run_keeps_hyphen_words() {
    let cli = Cli::try_parse_from(["buildproc", "run", "ls", "-la", "/tmp"]).unwrap();
    let Some(Command::Run(args)) = cli.command else {
        panic!("expected run, got {:?}", cli.command);
    };
    assert_eq!(args.command_line(), "ls -la /tmp");
}

#[test]
fn test_parse_run_requires_command() {
    assert!(Cli::try_parse_from(["buildproc", "run"]).is_err());
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "buildproc",
        "-l",
        "5",
        "--log-file",
        "out.log",
        "--clean-env",
        "--set",
        "env.keep_vars=CC",
        "capture",
        "echo hi",
    ])
    .unwrap();

    let overrides = cli.global.to_config_overrides().unwrap();
    insta::assert_debug_snapshot!(overrides, @r#"
    [
        (
            "env.keep_vars",
            "CC",
        ),
        (
            "global.output_log_level",
            "5",
        ),
        (
            "global.file_log_level",
            "5",
        ),
        (
            "global.log_file",
            "out.log",
        ),
        (
            "env.clean",
            "true",
        ),
    ]
    "#);
}

#[test]
fn test_log_level_out_of_range_rejected() {
    assert!(Cli::try_parse_from(["buildproc", "-l", "7", "version"]).is_err());
}

#[test]
fn test_set_without_equals_rejected() {
    let cli = Cli::try_parse_from(["buildproc", "--set", "env.clean", "version"]).unwrap();
    assert!(cli.global.to_config_overrides().is_err());
}

#[test]
fn test_parse_env_diff_json() {
    let cli = Cli::try_parse_from(["buildproc", "env-diff", "--json", ". ./setup.sh"]).unwrap();
    let Some(Command::EnvDiff(args)) = cli.command else {
        panic!("expected env-diff, got {:?}", cli.command);
    };
    assert!(args.json);
    assert_eq!(args.exec.command_line(), ". ./setup.sh");
}

#[test]
fn test_parse_parallel() {
    let cli = Cli::try_parse_from(["buildproc", "parallel", "-j", "2", "make a", "make b"]).unwrap();
    let Some(Command::Parallel(args)) = cli.command else {
        panic!("expected parallel, got {:?}", cli.command);
    };
    assert_eq!(args.jobs, 2);
    assert_eq!(args.commands, vec!["make a", "make b"]);
}

#[test]
fn test_parse_parallel_default_jobs() {
    let cli = Cli::try_parse_from(["buildproc", "parallel", "true"]).unwrap();
    let Some(Command::Parallel(args)) = cli.command else {
        panic!("expected parallel, got {:?}", cli.command);
    };
    assert!(args.jobs >= 1);
}
