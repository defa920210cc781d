//! End-to-end CLI tests for the kindle-notebook binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;
use support::fixtures::{
    DEVICE_TOKEN, SESSION_ID, notebook_annotation, notebook_annotations_page,
};
use support::socket_guard::start_mock_server_or_skip;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn write_session_file(dir: &std::path::Path, cookies: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("session.json");
    let body = serde_json::json!({
        "cookies": cookies,
        "deviceSessionToken": DEVICE_TOKEN,
    });
    std::fs::write(&path, body.to_string()).unwrap();
    path
}

fn complete_cookies() -> serde_json::Value {
    serde_json::json!({
        "ubid-main": "131-0000000-0000000",
        "at-main": "Atza|IwEBIexample",
        "x-main": "x-main-value",
        "session-id": SESSION_ID,
    })
}

fn kindle_cmd(tempdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kindle-notebook").unwrap();
    cmd.env("XDG_CONFIG_HOME", tempdir.path().join("xdg-config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("kindle-notebook").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Export your Kindle library"))
        .stdout(predicate::str::contains("notebook-annotations"));
}

#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("kindle-notebook").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kindle-notebook"));
}

#[test]
fn test_binary_without_session_exits_one() {
    let tempdir = TempDir::new().unwrap();
    let assert = kindle_cmd(&tempdir)
        .arg("library")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No session provided"));
    assert_eq!(assert.get_output().status.code(), Some(1));
}

#[test]
fn test_binary_missing_session_file_reports_path() {
    let tempdir = TempDir::new().unwrap();
    kindle_cmd(&tempdir)
        .args(["--session", "/nonexistent/session.json", "library"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load session file"));
}

#[test]
fn test_binary_unparsable_cookie_file_is_reported() {
    let tempdir = TempDir::new().unwrap();
    let cookies = tempdir.path().join("cookies.txt");
    std::fs::write(&cookies, "garbage\nmore garbage\n").unwrap();

    kindle_cmd(&tempdir)
        .arg("--cookies")
        .arg(&cookies)
        .args(["--device-token", DEVICE_TOKEN, "library"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load cookie file"))
        .stderr(predicate::str::contains("no valid cookies"));
}

#[test]
fn test_binary_incomplete_session_names_missing_cookie() {
    let tempdir = TempDir::new().unwrap();
    let session = write_session_file(
        tempdir.path(),
        &serde_json::json!({"ubid-main": "1", "at-main": "2", "session-id": "3"}),
    );

    kindle_cmd(&tempdir)
        .arg("--session")
        .arg(&session)
        .arg("notebook-library")
        .assert()
        .failure()
        .stderr(predicate::str::contains("x-main"));
}

#[test]
fn test_binary_invalid_config_is_rejected() {
    let tempdir = TempDir::new().unwrap();
    let session = write_session_file(tempdir.path(), &complete_cookies());
    let config = tempdir.path().join("config.json");
    std::fs::write(&config, r#"{"library_page_size": 0}"#).unwrap();

    kindle_cmd(&tempdir)
        .arg("--session")
        .arg(&session)
        .arg("--config")
        .arg(&config)
        .arg("library")
        .assert()
        .failure()
        .stderr(predicate::str::contains("library_page_size"));
}

#[tokio::test]
async fn test_binary_prints_notebook_annotations_as_json() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/notebook"))
        .and(query_param("asin", "B000000001"))
        .and(header("x-adp-session-token", DEVICE_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_string(notebook_annotations_page(&[
            notebook_annotation("QID1", "blue", 7, "A passage worth keeping.", Some("why it matters")),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let session = write_session_file(tempdir.path(), &complete_cookies());
    let config = tempdir.path().join("config.json");
    std::fs::write(
        &config,
        serde_json::json!({
            "read_base_url": mock_server.uri(),
            "sign_in_base_url": mock_server.uri(),
        })
        .to_string(),
    )
    .unwrap();

    let assert = kindle_cmd(&tempdir)
        .arg("-q")
        .arg("--session")
        .arg(&session)
        .arg("--config")
        .arg(&config)
        .args(["notebook-annotations", "B000000001"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let first = &parsed[0];
    assert_eq!(first["id"], "QID1");
    assert_eq!(first["kind"], "note");
    assert_eq!(first["color"], "blue");
    assert_eq!(first["note"], "why it matters");
    assert_eq!(first["page"], 7);
}

#[tokio::test]
async fn test_binary_unauthenticated_exits_one_with_suggestion() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/notebook"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let tempdir = TempDir::new().unwrap();
    let session = write_session_file(tempdir.path(), &complete_cookies());
    let config = tempdir.path().join("config.json");
    std::fs::write(
        &config,
        serde_json::json!({"read_base_url": mock_server.uri()}).to_string(),
    )
    .unwrap();

    let assert = kindle_cmd(&tempdir)
        .arg("-q")
        .arg("--session")
        .arg(&session)
        .arg("--config")
        .arg(&config)
        .arg("notebook-library")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Suggestion"));
    assert_eq!(assert.get_output().status.code(), Some(1));
}
