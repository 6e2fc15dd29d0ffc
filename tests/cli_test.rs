use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

fn run_udir(config_home: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_udir"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("NO_COLOR", "1")
        .output()?;
    Ok(output)
}

fn seed_users(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200).json_body(json!([
            {"id": 1, "name": "Ada Lovelace", "username": "ada", "email": "ada@example.com"},
            {"id": 2, "name": "Grace Hopper", "username": "grace", "email": "grace@example.com"},
            {"id": 3, "name": "Alan Turing", "username": "alan", "email": "alan@example.com"},
        ]));
    });
}

#[test]
fn list_json_emits_the_shaped_records() -> Result<()> {
    let server = MockServer::start();
    seed_users(&server);
    let config_home = tempfile::tempdir()?;
    let url = format!("{}/users", server.base_url());

    let output = run_udir(
        config_home.path(),
        &["--url", &url, "list", "--json", "--sort", "name", "--desc"],
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = records
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Grace Hopper", "Alan Turing", "Ada Lovelace"]);
    Ok(())
}

#[test]
fn delete_reports_partial_failure_and_exits_nonzero() -> Result<()> {
    let server = MockServer::start();
    seed_users(&server);
    server.mock(|when, then| {
        when.method(DELETE).path("/users/1");
        then.status(500).body("nope");
    });
    server.mock(|when, then| {
        when.method(DELETE).path("/users/3");
        then.status(200).json_body(json!({}));
    });

    let config_home = tempfile::tempdir()?;
    let url = format!("{}/users", server.base_url());

    let output = run_udir(config_home.path(), &["--url", &url, "delete", "1", "3"])?;
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("deleted 3"));
    assert!(stderr.contains("delete 1 failed"));
    assert!(stderr.contains("1 of 2 deletions not applied"));
    Ok(())
}

#[test]
fn add_prints_the_assigned_id() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/users");
        then.status(201).json_body(json!({
            "id": 7,
            "name": "Margaret Hamilton",
            "username": "margaret",
            "email": "margaret@example.com",
            "amount": 1969,
        }));
    });

    let config_home = tempfile::tempdir()?;
    let url = format!("{}/users", server.base_url());

    let output = run_udir(
        config_home.path(),
        &[
            "--url", &url,
            "add",
            "--name", "Margaret Hamilton",
            "--username", "margaret",
            "--email", "margaret@example.com",
        ],
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("(id 7)"));
    Ok(())
}

#[test]
fn config_set_url_persists_the_endpoint() -> Result<()> {
    let config_home = tempfile::tempdir()?;

    let output = run_udir(
        config_home.path(),
        &["config", "--set-url", "http://localhost:9000/users"],
    )?;
    assert!(output.status.success());

    let output = run_udir(config_home.path(), &["config"])?;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("http://localhost:9000/users"));
    Ok(())
}
