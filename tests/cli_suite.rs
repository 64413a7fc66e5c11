use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn data(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(path)
}

// Isolated from the user's settings file and terminal colors.
fn ldm(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ldm"));
    cmd.env("NO_COLOR", "1")
        .arg("--config")
        .arg(data("no-such-settings.kdl"))
        .arg("--fixture")
        .arg(data(&format!("devices/{fixture}.kdl")))
        .arg("--modalias-dir")
        .arg(data("modaliases"));
    cmd
}

#[test]
fn test_help_command() {
    Command::new(env!("CARGO_BIN_EXE_ldm"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Detect hardware"));
}

#[test]
fn test_version_flag() {
    let expected = format!("ldm {}", env!("CARGO_PKG_VERSION"));
    Command::new(env!("CARGO_BIN_EXE_ldm"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_unknown_command_fails() {
    Command::new(env!("CARGO_BIN_EXE_ldm"))
        .arg("unknown-command-xyz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: ldm"));
}

#[test]
fn test_devices_filtered_by_type() {
    ldm("optimus765m")
        .args(["devices", "--type", "gpu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GTX 765M"))
        .stdout(predicate::str::contains("Integrated Graphics"))
        .stdout(predicate::str::contains("PCIe root port").not());
}

#[test]
fn test_providers_table() {
    ldm("razer-ornata-chroma")
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("razer-drivers"))
        .stdout(predicate::str::contains("razerkbd"));
}

#[test]
fn test_gpu_json_envelope() {
    let output = ldm("optimus765m")
        .args(["gpu", "--format", "json"])
        .output()
        .expect("run ldm");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["version"], "v1");
    assert_eq!(json["command"], "gpu");
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["kind"], "optimus");
    assert_eq!(json["data"]["count"], 2);
    assert_eq!(json["data"]["providers"][0]["package"], "nvidia-glx-driver");
    assert_eq!(json["data"]["providers"][1]["package"], "nvidia-340-glx-driver");
}

#[test]
fn test_gpu_without_gpu_fails() {
    ldm("razer-ornata-chroma")
        .arg("gpu")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No GPU devices found"));
}

#[test]
fn test_missing_fixture_fails() {
    Command::new(env!("CARGO_BIN_EXE_ldm"))
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(data("no-such-settings.kdl"))
        .args(["--fixture", "/nonexistent/machine.kdl", "devices"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Device backend error"));
}
