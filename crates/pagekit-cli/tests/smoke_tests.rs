//! Smoke tests for the pagekit CLI

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const LOGIN_PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<objects>
    <object name="Email">
        <web locatorType="id" locatorValue="email"/>
        <android locatorType="id" locatorValue="com.shop:id/email"/>
        <ios locatorType="name" locatorValue="Email"/>
    </object>
    <object name="lblCountry">
        <web locatorType="xpath" locatorValue="//*[@id='$$countryName$$']"/>
        <android locatorType="xpath" locatorValue="//*[@text='$$countryName$$']"/>
        <ios locatorType="xpath" locatorValue="//*[@label='$$countryName$$']"/>
    </object>
</objects>
"#;

const BROKEN_PAGE: &str = r##"<objects>
    <object name="btnSave">
        <web locatorType="jquery" locatorValue="#save"/>
    </object>
    <object name="txtName">
        <web locatorType="id"/>
    </object>
</objects>
"##;

/// Get a command for the pagekit binary
fn pagekit() -> Command {
    let mut cmd = Command::cargo_bin("pagekit").expect("pagekit binary should exist");
    cmd.env_remove("RUST_LOG").env_remove("PAGEKIT_CONFIG");
    cmd
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pagekit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    pagekit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_no_args_fails() {
    pagekit().assert().failure();
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_clean_file() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    pagekit()
        .args(["--color", "never", "check"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 elements"))
        .stdout(predicate::str::contains("no problems"));
}

#[test]
fn test_check_reports_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "Broken.xml", BROKEN_PAGE);

    pagekit()
        .args(["--color", "never", "check", "-p", "web"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("jquery"))
        .stdout(predicate::str::contains("locatorValue"))
        .stderr(predicate::str::contains("2 problem(s) found in 1 file(s)"));
}

#[test]
fn test_check_missing_platforms() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "WebOnly.xml",
        r#"<objects><object name="a"><web locatorType="id" locatorValue="a"/></object></objects>"#,
    );

    pagekit()
        .args(["--color", "never", "check"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("'android'"))
        .stdout(predicate::str::contains("'ios'"));
}

#[test]
fn test_check_malformed_xml() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "Bad.xml", "<objects><object name=");

    pagekit()
        .args(["--color", "never", "check"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed to load object repository"));
}

// ============================================================================
// resolve
// ============================================================================

#[test]
fn test_resolve_text() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    pagekit()
        .arg("resolve")
        .arg(&path)
        .args(["Email", "--platform", "android"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id=com.shop:id/email"));
}

#[test]
fn test_resolve_with_substitution_json() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    let output = pagekit()
        .arg("resolve")
        .arg(&path)
        .args([
            "lblCountry",
            "-p",
            "web",
            "--set",
            "$$countryName$$=USA",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["strategy"], "xpath");
    assert_eq!(json["value"], "//*[@id='USA']");
    assert_eq!(json["platform"], "web");
}

#[test]
fn test_resolve_unknown_element() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    pagekit()
        .arg("resolve")
        .arg(&path)
        .args(["btnMissing", "-p", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("btnMissing"));
}

#[test]
fn test_resolve_strict_config_rejects_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);
    let config = write(dir.path(), "pagekit.yaml", "strict_placeholders: true\n");

    pagekit()
        .arg("--config")
        .arg(&config)
        .arg("resolve")
        .arg(&path)
        .args(["lblCountry", "-p", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("$$countryName$$"));
}

#[test]
fn test_resolve_uses_configured_directory() {
    let dir = TempDir::new().unwrap();
    let web = dir.path().join("web");
    fs::create_dir_all(&web).unwrap();
    write(&web, "LoginPage.xml", LOGIN_PAGE);
    let config = write(
        dir.path(),
        "pagekit.yaml",
        &format!("web_repository_dir: {}\n", web.display()),
    );

    pagekit()
        .arg("--config")
        .arg(&config)
        .args(["resolve", "LoginPage.xml", "Email", "-p", "web"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id=email"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_elements() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    pagekit()
        .args(["--color", "never", "list"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Email"))
        .stdout(predicate::str::contains("lblCountry"))
        .stdout(predicate::str::contains("web, android, ios"));
}

#[test]
fn test_list_quiet_keeps_elements_and_drops_header() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "LoginPage.xml", LOGIN_PAGE);

    pagekit()
        .args(["-q", "--color", "never", "list"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Email"))
        .stdout(predicate::str::contains("lblCountry"))
        .stdout(predicate::str::contains("==").not());
}

#[test]
fn test_list_missing_file() {
    pagekit()
        .args(["list", "/nonexistent/Page.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
