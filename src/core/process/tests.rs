// buildproc: Build Process Execution Layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::sync::Mutex;

use super::handle::CHUNK_SIZE;
use super::io::LineBuffer;
use super::parallel::run_parallel;
use super::runner::CommandRunner;
use super::spawner::{NativeSpawner, SpawnFlags, Spawner};
use super::ProcessHandle;
use crate::core::cancel::CancelStateMachine;
use crate::core::env::Environment;
use crate::error::{EnvError, ProcessError};

/// Runs a fixed command line instead of the requested one, recording requests.
struct SubstitutingSpawner {
    replacement: &'static str,
    requested: Mutex<Vec<String>>,
}

impl SubstitutingSpawner {
    fn new(replacement: &'static str) -> Self {
        Self {
            replacement,
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl Spawner for SubstitutingSpawner {
    fn start(
        &self,
        cmd_line: &str,
        env: &Environment,
        flags: SpawnFlags,
    ) -> Result<ProcessHandle, ProcessError> {
        self.requested.lock().unwrap().push(cmd_line.to_string());
        NativeSpawner.start(self.replacement, env, flags)
    }
}

fn collect_lines(chunks: &[&[u8]]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buffer = LineBuffer::new();
    for chunk in chunks {
        buffer.push(chunk, |line| lines.push(line.to_string()));
    }
    buffer.finish(|line| lines.push(line.to_string()));
    lines
}

#[test]
fn test_line_buffer_joins_chunks() {
    let lines = collect_lines(&[b"ab", b"c\nde", b"f"]);
    assert_eq!(lines, vec!["abc", "def"]);
}

#[test]
fn test_line_buffer_emits_empty_tail() {
    assert_eq!(collect_lines(&[]), vec![""]);
    assert_eq!(collect_lines(&[b"one\n"]), vec!["one", ""]);
}

#[test]
fn test_line_buffer_multiple_lines_in_one_chunk() {
    let lines = collect_lines(&[b"a\r\nb\n\nc"]);
    assert_eq!(lines, vec!["a\r", "b", "", "c"]);
}

#[test]
fn test_line_buffer_split_utf8() {
    let text = "caf\u{e9}\n".as_bytes();
    let (head, tail) = text.split_at(4);
    let lines = collect_lines(&[head, tail]);
    assert_eq!(lines, vec!["caf\u{e9}", ""]);
}

#[test]
fn test_line_buffer_pending() {
    let mut buffer = LineBuffer::new();
    buffer.push(b"x\nyz", |_| {});
    assert_eq!(buffer.pending(), b"yz");
}

#[test]
fn test_empty_command_is_rejected() {
    let err = NativeSpawner
        .start("   ", &Environment::inherit(), SpawnFlags::empty())
        .unwrap_err();
    assert!(matches!(err, ProcessError::EmptyCommand));
}

#[test]
fn test_capture_echo() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    let result = runner
        .cmd_execute_and_capture_output("echo hello", &Environment::inherit())
        .expect("echo should run");

    assert!(result.success());
    insta::assert_snapshot!(result.output_lossy().trim(), @"hello");
    assert_eq!(machine.value(), 0);
}

#[test]
fn test_exit_code_is_returned() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    let code = runner
        .cmd_execute("exit 42", &Environment::inherit())
        .expect("process should complete");

    assert_eq!(code, 42);
    assert_eq!(machine.value(), 0);
}

#[test]
#[cfg(unix)]
fn test_stderr_is_merged_into_output() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    let result = runner
        .cmd_execute_and_capture_output("echo out; echo err 1>&2", &Environment::inherit())
        .unwrap();

    let output = result.output_lossy();
    assert!(output.contains("out"), "{output}");
    assert!(output.contains("err"), "{output}");
}

#[test]
#[cfg(unix)]
fn test_stream_chunks_match_capture() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);
    let cmd = "seq 1 3000";

    let mut streamed = Vec::new();
    let mut largest_chunk = 0;
    let code = runner
        .cmd_execute_and_stream_data(cmd, &Environment::inherit(), |chunk| {
            assert!(!chunk.is_empty());
            largest_chunk = largest_chunk.max(chunk.len());
            streamed.extend_from_slice(chunk);
        })
        .unwrap();
    let captured = runner
        .cmd_execute_and_capture_output(cmd, &Environment::inherit())
        .unwrap();

    assert_eq!(code, captured.exit_code());
    assert_eq!(streamed, captured.output());
    assert!(largest_chunk <= CHUNK_SIZE);
    assert!(streamed.len() > CHUNK_SIZE);
}

#[test]
#[cfg(unix)]
fn test_stream_lines() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    let mut lines = Vec::new();
    let code = runner
        .cmd_execute_and_stream_lines("printf 'a\\nb\\nc'", &Environment::inherit(), |line| {
            lines.push(line.to_string());
        })
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(lines, vec!["a", "b", "c"]);
}

#[test]
#[cfg(unix)]
fn test_wait_drains_large_output() {
    let handle = NativeSpawner
        .start(
            "head -c 262144 /dev/zero",
            &Environment::inherit(),
            SpawnFlags::REDIRECT_OUTPUT,
        )
        .unwrap();
    assert!(handle.has_output());
    assert_eq!(handle.wait().unwrap(), 0);
}

#[test]
#[cfg(unix)]
fn test_redirected_input() {
    let mut handle = NativeSpawner
        .start(
            "cat",
            &Environment::inherit(),
            SpawnFlags::REDIRECT_OUTPUT | SpawnFlags::REDIRECT_INPUT,
        )
        .unwrap();
    handle.write_input(b"ping").unwrap();

    let mut output = Vec::new();
    let code = handle
        .wait_and_stream_output(|chunk| output.extend_from_slice(chunk))
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(output, b"ping");
}

#[test]
fn test_write_input_without_pipe_fails() {
    let mut handle = NativeSpawner
        .start("exit 0", &Environment::inherit(), SpawnFlags::REDIRECT_OUTPUT)
        .unwrap();
    assert!(handle.write_input(b"x").is_err());
    assert_eq!(handle.wait().unwrap(), 0);
}

#[test]
#[cfg(unix)]
fn test_fabricated_environment_is_exact() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);
    let env = Environment::from_pairs([("BUILDPROC_PROBE", "42")]);

    let result = runner
        .cmd_execute_and_capture_output("echo \"$BUILDPROC_PROBE [$HOME]\"", &env)
        .unwrap();

    insta::assert_snapshot!(result.output_lossy().trim(), @"42 []");
}

#[test]
fn test_modify_env_captures_new_variable() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    #[cfg(unix)]
    let setup = "export BUILDPROC_CAPTURED=yes";
    #[cfg(windows)]
    let setup = "set BUILDPROC_CAPTURED=yes";

    let env = runner
        .cmd_execute_modify_env(setup, &Environment::inherit())
        .expect("capture should succeed");

    assert!(!env.is_inherit());
    assert_eq!(env.get("BUILDPROC_CAPTURED"), Some("yes"));
    assert_eq!(machine.value(), 0);
}

#[test]
fn test_modify_env_rejects_failing_command() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    let err = runner
        .cmd_execute_modify_env("exit 3", &Environment::inherit())
        .unwrap_err();

    match err.downcast_ref::<EnvError>() {
        Some(EnvError::CaptureFailed { exit_code, .. }) => assert_eq!(*exit_code, 3),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(machine.value(), 0);
}

#[test]
fn test_modify_env_requires_marker() {
    let machine = CancelStateMachine::new();
    let spawner = SubstitutingSpawner::new("echo no marker here");
    let runner = CommandRunner::new(&machine, spawner);

    let err = runner
        .cmd_execute_modify_env("setup", &Environment::inherit())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::MarkerNotFound { .. })
    ));
    let requested = runner.spawner().requested.lock().unwrap();
    assert_eq!(requested.len(), 1);
    assert!(requested[0].starts_with("setup "));
}

#[test]
fn test_spawn_failure_still_finishes() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    assert!(runner.cmd_execute("", &Environment::inherit()).is_err());
    assert_eq!(machine.value(), 0);
}

#[test]
fn test_no_wait_returns() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);

    runner.cmd_execute_no_wait("exit 0").unwrap();
    assert_eq!(machine.value(), 0);
}

#[test]
fn test_parallel_outcomes_in_order() {
    let machine = CancelStateMachine::new();
    let runner = CommandRunner::new(&machine, NativeSpawner);
    let commands: Vec<String> = (0..6).map(|i| format!("exit {i}")).collect();

    let outcomes = run_parallel(&runner, &commands, &Environment::inherit(), 3);

    let codes: Vec<i32> = outcomes
        .iter()
        .map(|o| *o.result.as_ref().unwrap())
        .collect();
    assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(machine.value(), 0);
}

#[test]
#[cfg(target_os = "linux")]
fn test_background_reaper_collects_exited_child() {
    use super::handle::reap_in_background;
    use std::time::{Duration, Instant};

    let child = std::process::Command::new("/bin/sh")
        .args(["-c", "exit 0"])
        .spawn()
        .unwrap();
    let proc_entry = std::path::PathBuf::from(format!("/proc/{}", child.id()));
    reap_in_background(child);

    // a zombie keeps its /proc entry until someone waits on it
    let deadline = Instant::now() + Duration::from_secs(5);
    while proc_entry.exists() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert!(!proc_entry.exists(), "child was left as a zombie");
}
