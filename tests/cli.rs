use std::fs;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

const TERMINAL_KEYS: [&str; 10] = [
    "TERM",
    "SHELL",
    "COLORTERM",
    "TERM_PROGRAM",
    "TERM_PROGRAM_VERSION",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "SSH_TTY",
    "SSH_CONNECTION",
];

fn cmd() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_term-probe"));
    for key in TERMINAL_KEYS {
        command.env_remove(key);
    }
    command
        .env_remove("TERM_PROBE_LOG")
        .env_remove("RUST_LOG")
        .env("TERM_PROBE_NO_TTY_COMMAND", "1")
        .stdin(Stdio::null())
        .stderr(Stdio::piped());
    command
}

fn run(command: &mut Command) -> (Output, String) {
    let output = command.output().expect("spawn term-probe");
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf-8 stdout");
    (output, stdout)
}

fn without_pid_lines(report: &str) -> String {
    report
        .lines()
        .filter(|line| !line.starts_with("PID: ") && !line.starts_with("PPID: "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn env_report_without_terminal() {
    let (output, stdout) = run(cmd().env("TERM", "xterm").env("HOME", "/home/probe"));
    assert!(output.status.success());

    assert!(stdout.starts_with("=== Terminal / environment summary ===\n"));
    assert!(stdout.contains(&format!("OS: {}\n", std::env::consts::OS)));
    assert!(stdout.contains("TERM=xterm\n"));
    assert!(!stdout.contains("SHELL="));
    assert!(stdout.contains("Stdin is TTY: false\n"));
    assert!(stdout.contains("Stdout is TTY: false\n"));
    assert!(stdout.contains("Stderr is TTY: false\n"));
    assert!(stdout.contains("Terminal size: unavailable\n"));
    assert!(stdout.contains("`tty` command skipped\n"));
    assert!(stdout.contains("HOME=/home/probe\n"));
    assert!(stdout.contains("--- FDs -> names (fd 0..3) ---\n"));
    assert!(stdout.ends_with("=== End ===\n"));
    assert!(output.stderr.is_empty(), "logging is off by default");
}

fn output_pid_placeholder(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("PID: "))
        .expect("PID line")
        .to_string()
}

#[test]
fn pid_line_is_numeric() {
    let (_, stdout) = run(&mut cmd());
    let pid = output_pid_placeholder(&stdout);
    assert!(pid.parse::<u32>().is_ok(), "PID not numeric: {pid}");
}

#[test]
fn path_and_home_print_empty_when_unset() {
    let (output, stdout) = run(cmd().env_remove("PATH").env_remove("HOME"));
    assert!(output.status.success());
    assert!(stdout.contains("\nPATH=\n"));
    assert!(stdout.contains("\nHOME=\n"));
}

#[test]
fn stdout_redirected_to_file_is_not_a_tty() {
    let file = tempfile::NamedTempFile::new().expect("tempfile");
    let handle = file.reopen().expect("reopen");
    let status = cmd().stdout(handle).status().expect("spawn");
    assert!(status.success());

    let report = fs::read_to_string(file.path()).expect("read report");
    assert!(report.contains("Stdout is TTY: false\n"));
    if cfg!(target_os = "linux") {
        let expected = fs::canonicalize(file.path()).expect("canonical");
        let fd1 = report
            .lines()
            .find_map(|line| line.strip_prefix("fd 1 -> "))
            .expect("fd 1 line");
        assert_eq!(fs::canonicalize(fd1).expect("canonical fd 1"), expected);
    }
}

#[test]
fn piped_stdin_is_not_a_tty() {
    let (output, stdout) = run(cmd().stdin(Stdio::piped()));
    assert!(output.status.success());
    assert!(stdout.contains("Stdin is TTY: false\n"));
}

#[cfg(unix)]
#[test]
fn closed_stdin_is_reported_without_failing() {
    use std::os::unix::process::CommandExt;

    let mut command = cmd();
    // SAFETY: close(2) is async-signal-safe.
    unsafe {
        command.pre_exec(|| {
            libc::close(0);
            Ok(())
        });
    }
    let (output, stdout) = run(&mut command);
    assert!(output.status.success());
    assert!(stdout.contains("Stdin is TTY: false\n"));
    assert!(stdout.ends_with("=== End ===\n"));
}

#[test]
fn repeated_runs_differ_only_in_pid_lines() {
    // Same stdio targets for both runs, so descriptor names match too.
    let file = tempfile::NamedTempFile::new().expect("tempfile");
    let mut reports = Vec::new();
    for _ in 0..2 {
        let handle = fs::File::create(file.path()).expect("truncate");
        let status = cmd()
            .stdout(handle)
            .stderr(Stdio::null())
            .status()
            .expect("spawn");
        assert!(status.success());
        reports.push(fs::read_to_string(file.path()).expect("read report"));
    }
    assert_eq!(without_pid_lines(&reports[0]), without_pid_lines(&reports[1]));
}

#[test]
fn width_mode_prints_sample_table() {
    let (output, stdout) = run(cmd().arg("width"));
    assert!(output.status.success());
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "=== Display width ===");
    assert_eq!(lines[1], "ascii:          A  U+0041  cp=65  bytes=1  width=1");
    assert_eq!(
        lines[5],
        "emoji:          😀  U+1F600  cp=128512  bytes=4  width=2"
    );
}

#[test]
fn width_mode_accepts_text_arguments() {
    let (output, stdout) = run(cmd().args(["width", "界", ""]));
    assert!(output.status.success());
    assert!(stdout.contains("input 1:        界  U+754C  cp=30028  bytes=3  width=2\n"));
    assert!(stdout.contains("input 2:        <empty>  width=0\n"));
}

#[test]
fn all_mode_runs_both_reports() {
    let (output, stdout) = run(cmd().arg("all"));
    assert!(output.status.success());
    let env_end = stdout.find("=== End ===").expect("env report");
    let width_start = stdout.find("=== Display width ===").expect("width report");
    assert!(env_end < width_start);
}

#[test]
fn debug_logging_goes_to_stderr_only() {
    let (output, stdout) = run(cmd().arg("width").env("TERM_PROBE_LOG", "debug"));
    assert!(output.status.success());
    assert!(!stdout.contains("DEBUG"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("terminal session inactive"), "stderr: {stderr}");
}

#[test]
fn unknown_mode_is_a_usage_error() {
    let output = cmd().arg("bogus").output().expect("spawn");
    assert_eq!(output.status.code(), Some(2));
}
