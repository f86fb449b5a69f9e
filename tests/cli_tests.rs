#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_asks_for_deadline_first() {
    run_cli("show\nquit\n")
        .success()
        .stdout(str_contains("Please set a deadline first."));
}

#[test]
fn cli_schedules_task_back_from_deadline() {
    run_cli("deadline 2025-06-20\nadd 3 Design\nquit\n")
        .success()
        .stdout(str_contains("Deadline: 2025-06-20"))
        .stdout(str_contains("No tasks added yet."))
        .stdout(str_contains("Task added."))
        .stdout(str_contains("| Design | 2025-06-18 | 2025-06-20 | 3"));
}

#[test]
fn cli_rejects_invalid_task_input() {
    run_cli("deadline 2025-06-20\nadd 0 Design\nadd x Design\nquit\n")
        .success()
        .stdout(str_contains("invalid input"))
        .stdout(str_contains("Enter valid task name & duration."));
}

#[test]
fn cli_switches_date_format() {
    run_cli("deadline 2025-06-20\nadd 1 Ship\nformat dd MMM yyyy\nquit\n")
        .success()
        .stdout(str_contains("Deadline: 20 Jun 2025"));
}

#[test]
fn cli_excludes_loaded_holidays() {
    let mut feed = NamedTempFile::new().expect("create temp file");
    feed.write_all(
        b"BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nDTSTART;VALUE=DATE:20250619\nSUMMARY:Juneteenth\nEND:VEVENT\nEND:VCALENDAR\n",
    )
    .expect("write feed");
    let script = format!(
        "holidays load {}\ndeadline 2025-06-20\nadd 3 Design\nholidays on\nholidays show\nquit\n",
        feed.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Loaded 1 holidays"))
        .stdout(str_contains("| Design | 2025-06-17 | 2025-06-20 | 3"))
        .stdout(str_contains("2025-06-19  Juneteenth"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "deadline 2025-06-20\nadd 4 Persisted\nsave json {}\nadd 1 Temp\nload json {}\nshow\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Plan loaded from"));
    let after_reload = output.split("Plan loaded from").last().unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary task should not appear after reload:\n{}",
        after_reload
    );
}
