//! Integration tests for the pciscan binary.
//!
//! These run the built binary as a subprocess against small fixture files.
//! They only exercise paths that fail before the port channel is opened, so
//! they never touch real hardware and need no privileges.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Directory holding the fixture databases and config files. It contains no
/// `pciscan.toml`, so runs from here see only what the test passes.
fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn pciscan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pciscan"))
        .args(args)
        .current_dir(fixture_dir())
        .output()
        .expect("failed to execute pciscan")
}

fn assert_failed_without_table(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    assert!(
        !output.status.success(),
        "pciscan unexpectedly succeeded:\nstdout:\n{stdout}\nstderr:\n{stderr}",
    );
    assert!(
        !stdout.contains("Vendor Name"),
        "a table was printed on failure:\n{stdout}",
    );
    stderr
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn missing_identifier_database_is_fatal() {
    let output = pciscan(&["--ids", "does-not-exist.ids"]);
    let stderr = assert_failed_without_table(&output);
    assert!(
        stderr.contains("failed to read identifier database does-not-exist.ids"),
        "stderr:\n{stderr}",
    );
    assert!(!stderr.contains("Scan all devices"), "scan started:\n{stderr}");
}

#[test]
fn malformed_identifier_database_is_fatal() {
    let output = pciscan(&["--ids", "malformed.ids"]);
    let stderr = assert_failed_without_table(&output);
    assert!(stderr.contains("malformed identifier database"), "stderr:\n{stderr}");
    assert!(stderr.contains("line 3"), "stderr:\n{stderr}");
}

#[test]
fn unknown_config_key_is_fatal() {
    let output = pciscan(&["--config", "unknown-key.toml"]);
    let stderr = assert_failed_without_table(&output);
    assert!(stderr.contains("failed to parse unknown-key.toml"), "stderr:\n{stderr}");
}

#[test]
fn missing_explicit_config_is_fatal() {
    let output = pciscan(&["--config", "nope.toml", "--ids", "sample.ids"]);
    let stderr = assert_failed_without_table(&output);
    assert!(stderr.contains("failed to read config file nope.toml"), "stderr:\n{stderr}");
}

#[test]
fn quiet_mode_still_reports_errors() {
    let output = pciscan(&["-q", "--ids", "does-not-exist.ids"]);
    let stderr = assert_failed_without_table(&output);
    assert!(!stderr.contains("Parse "), "progress printed in quiet mode:\n{stderr}");
    assert!(stderr.contains("does-not-exist.ids"), "stderr:\n{stderr}");
}

#[test]
fn inverted_bus_range_is_rejected() {
    let output = pciscan(&["--buses", "7-1"]);
    let stderr = assert_failed_without_table(&output);
    assert!(stderr.contains("first > last"), "stderr:\n{stderr}");
}

#[test]
fn help_lists_flags() {
    let output = pciscan(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--ids", "--config", "--buses", "--quiet", "--verbose"] {
        assert!(stdout.contains(flag), "--help is missing {flag}:\n{stdout}");
    }
}
