use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY_NAME: &str = "risk-client";

/// Nothing listens on the discard port, so requests fail fast.
const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Helper to get a temporary home directory
fn temp_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".risk-client").join("config.json")
}

fn cmd(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.env("HOME", home.path()).env_remove("RISK_BASE_URL");
    cmd
}

fn complete_form<'a>(cmd: &'a mut Command, bmi: &str) -> &'a mut Command {
    cmd.args([
        "predict",
        "--bmi",
        bmi,
        "--age-category",
        "60-64",
        "--sex",
        "Female",
        "--smoking",
        "No",
        "--heart-disease",
        "No",
        "--physical-activity",
        "Yes",
        "--gen-health",
        "Good",
        "--diabetic",
        "Yes",
    ])
}

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let home = temp_home();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("predict"))
        .stdout(contains("dashboard"));
}

#[test]
/// A missing required field is reported locally and nothing is sent.
fn predict_without_bmi_fails_validation() {
    let home = temp_home();
    cmd(&home)
        .args(["--base-url", UNREACHABLE_URL, "predict", "--age-category", "60-64"])
        .assert()
        .failure()
        .stdout(contains("BMI is required"))
        .stdout(contains("Please correct the errors in the form"))
        .stdout(contains("Connection error").not());
}

#[test]
fn predict_rejects_out_of_range_bmi() {
    let home = temp_home();
    let mut command = cmd(&home);
    command.args(["--base-url", UNREACHABLE_URL]);
    complete_form(&mut command, "250")
        .assert()
        .failure()
        .stdout(contains("BMI must not exceed 200"));
}

#[test]
fn predict_reports_connection_error() {
    let home = temp_home();
    let mut command = cmd(&home);
    command.args(["--base-url", UNREACHABLE_URL]);
    complete_form(&mut command, "24.5")
        .assert()
        .failure()
        .stdout(contains("Connection error"));
}

#[test]
/// Without stats there is no table, so export only prints a notice.
fn export_without_stats_writes_nothing() {
    let home = temp_home();
    let out_dir = home.path().join("exports");
    cmd(&home)
        .args(["--base-url", UNREACHABLE_URL, "export", "--format", "csv"])
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(contains("Nothing to export"));
    assert!(!out_dir.exists());
}

#[test]
/// `config` saves the given settings, and a later `predict` picks them up.
fn config_command_persists_settings() {
    let home = temp_home();
    cmd(&home)
        .args(["config", "--service-url", UNREACHABLE_URL, "--model", "knn", "--timeout", "5"])
        .assert()
        .success()
        .stdout(contains("Config saved"))
        .stdout(contains("\"model\": \"knn\""));

    let saved = fs::read_to_string(config_file_path(&home)).unwrap();
    assert!(saved.contains(UNREACHABLE_URL));
    assert!(saved.contains("\"request_timeout_secs\": 5"));

    let mut command = cmd(&home);
    complete_form(&mut command, "24.5")
        .assert()
        .failure()
        .stdout(contains("Connection error"));
}

#[test]
/// Without options the current config is only printed.
fn config_command_without_options_writes_nothing() {
    let home = temp_home();
    cmd(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("{}"))
        .stdout(contains("Config saved").not());
    assert!(!config_file_path(&home).exists());
}

#[test]
/// Errors from the service reach the user through their message, not a debug dump.
fn predict_failure_message_is_readable() {
    let home = temp_home();
    let mut command = cmd(&home);
    command.args(["--base-url", UNREACHABLE_URL]);
    complete_form(&mut command, "24.5")
        .assert()
        .failure()
        .stderr(contains("Prediction failed: Connection error"))
        .stderr(contains("ConnectionError(").not());
}

#[test]
/// An out-of-range BMI is reported once.
fn predict_reports_bmi_error_once() {
    let home = temp_home();
    let mut command = cmd(&home);
    command.args(["--base-url", UNREACHABLE_URL]);
    let output = complete_form(&mut command, "250").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("BMI must not exceed 200").count(), 1);
}

#[test]
fn stats_fails_when_service_is_down() {
    let home = temp_home();
    cmd(&home)
        .args(["--base-url", UNREACHABLE_URL, "stats"])
        .assert()
        .failure();
}

#[test]
/// A malformed config file is an error rather than silently ignored.
fn invalid_config_file_is_reported() {
    let home = temp_home();
    let config_path = config_file_path(&home);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "not json").unwrap();

    cmd(&home)
        .args(["--base-url", UNREACHABLE_URL, "stats"])
        .assert()
        .failure()
        .stderr(contains("Failed to load config"));
}

#[tokio::test(flavor = "multi_thread")]
/// The configured service URL is used when no flag is given.
async fn predict_renders_result_from_configured_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .and(body_string_contains("model_choice=knn"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success":true,"prediction":1,"probability":0.87,"model":"knn"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let home = temp_home();
    let config_path = config_file_path(&home);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(
        &config_path,
        format!(r#"{{"base_url": "{}", "model": "knn"}}"#, server.uri()),
    )
    .unwrap();

    let mut command = cmd(&home);
    complete_form(&mut command, "24.5")
        .assert()
        .success()
        .stdout(contains("RISK DETECTED"))
        .stdout(contains("87.00%"));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_json_writes_dated_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"totalPredictions":42,"positiveCases":7,"accuracy":0.913}"#,
        ))
        .mount(&server)
        .await;

    let home = temp_home();
    let out_dir = home.path().join("exports");
    cmd(&home)
        .args(["--base-url", &server.uri(), "export", "--format", "json"])
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(contains("Export complete"));

    let files: Vec<PathBuf> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("dashboard-export-") && name.ends_with(".json"));
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("\"Accuracy\""));
    assert!(content.contains("91.30%"));
}
