//! The `befunge-plus` binary: exit statuses and the stdout/stderr split.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Captured result of one binary invocation.
struct CliOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

fn program_file(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("befunge_plus_cli_{}_{}.bf", name, std::process::id()));
    std::fs::write(&path, source).expect("failed to write program");
    path
}

fn cli(args: &[&str], stdin: &str) -> CliOutput {
    let mut child = Command::new(env!("CARGO_BIN_EXE_befunge-plus"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to execute befunge-plus");

    if let Some(mut input) = child.stdin.take() {
        input.write_all(stdin.as_bytes()).expect("failed to write stdin");
    }
    let output = child.wait_with_output().expect("failed to wait for befunge-plus");

    CliOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Write `source` to a temp file, run it with `extra` flags and remove it.
fn run_program(name: &str, source: &str, extra: &[&str], stdin: &str) -> CliOutput {
    let path = program_file(name, source);
    let path_str = path.to_string_lossy().into_owned();
    let mut args = vec![path_str.as_str()];
    args.extend_from_slice(extra);
    let out = cli(&args, stdin);
    std::fs::remove_file(&path).ok();
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// Usage
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_arguments_prints_usage() {
    let out = cli(&[], "");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert!(out.stdout.starts_with("Usage: befunge-plus"));
    assert_eq!(out.stderr, "");
}

#[test]
fn test_two_files_prints_usage() {
    let out = cli(&["a.bf", "b.bf"], "");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert!(out.stdout.starts_with("Usage: befunge-plus"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Success
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_halt_exits_zero() {
    let out = run_program("halt", "@", &[], "");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "");
    assert_eq!(out.stderr, "");
}

#[test]
fn test_reads_stdin_and_writes_stdout() {
    let out = run_program("increment", "&1+.@", &[], "4");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "5");
}

#[test]
fn test_stats_go_to_stderr() {
    let out = run_program("stats", "12c.@", &["--stats"], "");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "0");
    assert!(out.stderr.contains("steps:        5"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("live cells:   1"), "stderr: {}", out.stderr);
}

#[test]
fn test_audit_goes_to_stderr() {
    let out = run_program("audit", "7.@", &["--audit"], "");
    assert_eq!(out.exit_code, 0, "stderr: {}", out.stderr);
    assert_eq!(out.stdout, "7");
    assert!(out.stderr.contains("STARTUP"), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("HALT"), "stderr: {}", out.stderr);
}

// ═══════════════════════════════════════════════════════════════════════════
// Failure
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_file_exits_one() {
    let out = cli(&["/nonexistent/befunge_plus/missing.bf"], "");
    assert_eq!(out.exit_code, 1);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("Cannot open"), "stderr: {}", out.stderr);
}

#[test]
fn test_unknown_instruction_exits_one() {
    let out = run_program("unknown", "1.z2.@", &[], "");
    assert_eq!(out.exit_code, 1);
    assert_eq!(out.stdout, "1");
    assert!(out.stderr.contains("Unknown instruction: 'z'"), "stderr: {}", out.stderr);
}

#[test]
fn test_out_of_memory_exits_one() {
    let out = run_program("oom", ">00c", &["--heap", "16"], "");
    assert_eq!(out.exit_code, 1);
    assert!(out.stderr.contains("Not enough memory"), "stderr: {}", out.stderr);
}

#[test]
fn test_strict_division_exits_one() {
    let out = run_program("strict", "40/.@", &["--strict-div"], "");
    assert_eq!(out.exit_code, 1);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("Division by zero"), "stderr: {}", out.stderr);
}

#[test]
fn test_step_limit_exits_one() {
    let out = run_program("steps", ">", &["--max-steps", "50"], "");
    assert_eq!(out.exit_code, 1);
    assert!(out.stderr.contains("Step limit exceeded: 50"), "stderr: {}", out.stderr);
}
