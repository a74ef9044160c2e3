//! Integration tests for the `timebar` binary's non-interactive commands.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `timebar` with the given args, returning (stdout, stderr, success).
fn run_timebar(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_timebar"))
        .args(args)
        .env_remove("TIMEBAR_LOG")
        .output()
        .expect("failed to run timebar");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("temp paths are utf-8")
}

#[test]
fn config_missing_file_prints_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let (stdout, stderr, ok) = run_timebar(&["config", "--config", path_str(&path)]);
    assert!(ok, "stderr: {}", stderr);

    let value: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(value["timers"]["max_concurrent"].as_integer(), Some(10));
    assert_eq!(value["defaults"]["red"].as_integer(), Some(200));
    assert_eq!(value["defaults"]["blue"].as_integer(), Some(900));
    assert_eq!(value["ui"]["bar_height"].as_integer(), Some(3));
    assert!(!path.exists());
}

#[test]
fn config_merges_file_over_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[timers]\nmax_concurrent = 3\n\n[defaults]\npurple = 45\n",
    )
    .unwrap();

    let (stdout, stderr, ok) = run_timebar(&["config", "--config", path_str(&path)]);
    assert!(ok, "stderr: {}", stderr);
    let value: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(value["timers"]["max_concurrent"].as_integer(), Some(3));
    assert_eq!(value["timers"]["tick_ms"].as_integer(), Some(100));
    assert_eq!(value["defaults"]["purple"].as_integer(), Some(45));
    assert_eq!(value["defaults"]["red"].as_integer(), Some(200));
    assert_eq!(value["defaults"]["turquoise"].as_integer(), Some(300));
}

#[test]
fn config_clamps_out_of_range_values() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[defaults]\nred = 0\n\n[ui]\nbar_height = 65535\n").unwrap();

    let (stdout, stderr, ok) = run_timebar(&["config", "--config", path_str(&path)]);
    assert!(ok, "stderr: {}", stderr);
    let value: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(value["defaults"]["red"].as_integer(), Some(1));
    assert_eq!(value["ui"]["bar_height"].as_integer(), Some(6));
}

#[test]
fn config_path_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("x.toml");
    let (stdout, _, ok) = run_timebar(&["config", "--path", "--config", path_str(&path)]);
    assert!(ok);
    assert_eq!(stdout.trim(), path_str(&path));
}

#[test]
fn bad_config_reports_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[timers\nmax_concurrent = ").unwrap();

    let (_, stderr, ok) = run_timebar(&["config", "--config", path_str(&path)]);
    assert!(!ok);
    assert!(stderr.starts_with("error: could not parse config"));
}

#[test]
fn log_file_is_created() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = dir.path().join("timebar.log");
    let cfg = dir.path().join("config.toml");
    let (_, _, ok) = run_timebar(&[
        "config",
        "--config",
        path_str(&cfg),
        "--log-file",
        path_str(&log),
    ]);
    assert!(ok);
    assert!(log.exists());
}
