//! Integration tests for the `shopdesk` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a server; the session tests drive the binary against wiremock.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shopdesk` binary with env isolation.
///
/// Clears all `SHOPDESK_*` env vars and points the config file and token
/// directory into `home` so tests never touch the user's real setup.
fn shopdesk_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shopdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("SHOPDESK_CONFIG", home.join("config.toml"))
        .env("SHOPDESK_DATA_DIR", home.join("data"))
        .env_remove("SHOPDESK_PROFILE")
        .env_remove("SHOPDESK_API_URL")
        .env_remove("SHOPDESK_OUTPUT")
        .env_remove("SHOPDESK_TIMEOUT")
        .env_remove("SHOPDESK_EMAIL")
        .env_remove("SHOPDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn token_path(home: &Path) -> std::path::PathBuf {
    home.join("data").join("default").join("_token")
}

fn write_token(home: &Path, token: &str) {
    let path = token_path(home);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, token).unwrap();
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = shopdesk_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_resources() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("customers")
                .and(predicate::str::contains("products"))
                .and(predicate::str::contains("orders"))
                .and(predicate::str::contains("login")),
        );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shopdesk"));
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_products_subcommands_exist() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["products", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("categories"))
                .and(predicate::str::contains("delete")),
        );
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_override() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["config", "set", "api_url", "http://localhost:8000/api"])
        .assert()
        .success();
    shopdesk_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8000/api"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Route guard ─────────────────────────────────────────────────────

#[test]
fn test_resource_command_without_config() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["customers", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No API URL configured"));
}

#[test]
fn test_resource_command_requires_login() {
    let home = TempDir::new().unwrap();
    shopdesk_cmd(home.path())
        .args(["--api-url", "http://127.0.0.1:9/api", "orders", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = shopdesk_cmd(home.path())
        .args(["--output", "invalid", "customers", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Against a server ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_token_for_later_commands() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok1" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers/list"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "data": { "customers": [
                { "id": 1, "first_name": "Ada", "last_name": "Lovelace",
                  "email": "ada@example.com" }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "login", "--email", "a@b.com", "--password", "secret"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as a@b.com"));
    assert_eq!(std::fs::read_to_string(token_path(home.path())).unwrap(), "tok1");

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "-o", "json", "customers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_credentials_message() {
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Unauthorized",
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "login", "--email", "a@b.com", "--password", "nope"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("Invalid username or password credentials!"));
    assert!(!token_path(home.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_forbidden_response_ends_session() {
    let home = TempDir::new().unwrap();
    write_token(home.path(), "stale");
    let server = MockServer::start().await;
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/products/list"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": true,
            "message": "Forbidden"
        })))
        .mount(&server)
        .await;

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "products", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Session expired"));
    assert!(!token_path(home.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_non_interactively() {
    let home = TempDir::new().unwrap();
    write_token(home.path(), "tok1");
    let server = MockServer::start().await;
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": false })))
        .expect(0)
        .mount(&server)
        .await;

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "customers", "delete", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_order_view_prints_grand_total() {
    let home = TempDir::new().unwrap();
    write_token(home.path(), "tok1");
    let server = MockServer::start().await;
    let api_url = format!("{}/api", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/v1/orders/42"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "data": { "order": {
                "id": 42,
                "order_number": "ORD-42",
                "customer": { "first_name": "Ada", "last_name": "Lovelace" },
                "items": [
                    { "product_name": "Widget", "product_price": 10,
                      "product_discount": 0, "product_quantity": 2 },
                    { "product_name": "Gadget", "product_price": 20,
                      "product_discount": 50, "product_quantity": 1 }
                ]
            } }
        })))
        .mount(&server)
        .await;

    shopdesk_cmd(home.path())
        .args(["--api-url", &api_url, "orders", "get", "42"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ORD-42")
                .and(predicate::str::contains("Widget"))
                .and(predicate::str::contains("Grand total: 30.00")),
        );
}
