//! Runs the `soc-ingest` binary in batch mode against fixture files.

use pretty_assertions::assert_eq;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn soc_ingest() -> Command {
    Command::new(env!("CARGO_BIN_EXE_soc-ingest"))
}

#[test]
fn test_batch_mode_emits_stamped_events() {
    let dir = TempDir::new().unwrap();
    let staging = TempDir::new().unwrap();
    let syslog = dir.path().join("auth.log");
    let alerts = dir.path().join("alerts.json");
    fs::write(&syslog, "Sep 02 17:23:54 myhost sshd: Accepted password\nnot syslog\n").unwrap();
    fs::write(
        &alerts,
        r#"{"timestamp":"2024-01-02T03:04:05Z","agent":{"name":"web01"},"decoder":{"name":"sshd"},"rule":{"level":12},"full_log":"boom"}"#,
    )
    .unwrap();

    let output = soc_ingest()
        .arg("--input")
        .arg(format!("syslog={}", syslog.display()))
        .arg("-i")
        .arg(format!("json={}", alerts.display()))
        .args(["--emit", "json", "--show", "1"])
        .arg("--staging-dir")
        .arg(staging.path())
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Total events: 2"));
    assert!(stdout.contains("SYSLOG: 1 events"));
    assert!(stdout.contains("JSON: 1 events"));

    let emitted: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(emitted.len(), 2);
    assert_eq!(emitted[0]["source_format"], "SYSLOG");
    assert_eq!(emitted[0]["process"], "sshd");
    assert_eq!(emitted[1]["source_format"], "JSON");
    assert_eq!(emitted[1]["host"], "web01");
    assert_eq!(emitted[1]["severity"], 10);
    assert_eq!(emitted[1]["timestamp"], "2024-01-02T03:04:05+00:00");

    // staging directory is cleaned up on exit
    assert_eq!(fs::read_dir(staging.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_input_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();

    let output = soc_ingest()
        .arg("--input")
        .arg(format!("csv={}", dir.path().join("nope.csv").display()))
        .arg("--staging-dir")
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("No events loaded."));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("path does not exist or is not a file"), "stderr: {stderr}");
    assert!(stderr.contains("nope.csv"));
}

#[test]
fn test_unknown_format_is_a_usage_error() {
    let output = soc_ingest()
        .args(["--input", "pcap=/tmp/capture.pcap"])
        .output()
        .unwrap();

    assert!(!output.status.success());
}
