//! Integration tests for the ragway binary
//!
//! Every test runs against the in-memory backend with an unreachable LLM
//! endpoint, so nothing here needs a live service.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn ragway_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ragway").unwrap();
    cmd.env("RAGWAY_CONFIG", config_dir.path().join("config.yml"))
        .env("RAGWAY_VECTOR_STORE", "memory")
        .env("RAGWAY_LLM_URL", "http://127.0.0.1:9")
        .env_remove("RAGWAY_EMBEDDING_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("reseed"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_health() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir)
        .arg("health")
        .assert()
        .success()
        .stdout("Search service is running\n");
}

#[test]
fn test_search_rejects_non_positive_max_results() {
    let dir = TempDir::new().unwrap();
    for n in ["0", "-3"] {
        ragway_cmd(&dir)
            .args(["search", "What is machine learning?", "-n", n])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("maxResults must be at least 1"));
    }
}

#[test]
fn test_search_requires_query() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir).arg("search").assert().failure();
}

#[test]
fn test_search_fails_when_embedding_service_is_down() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir)
        .args(["search", "What", "is", "machine", "learning?"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Retrieval error"));
}

#[test]
fn test_reseed_reports_failure() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir)
        .arg("reseed")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Failed to initialize data: "));
}

#[test]
fn test_status_json() {
    let dir = TempDir::new().unwrap();
    let output = ragway_cmd(&dir)
        .args(["status", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["provider"], "memory");
    assert_eq!(status["collection"], "documents");
    assert_eq!(status["documents"], 0);
}

#[test]
fn test_config_file_is_honoured() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "vector_store:\n  provider: memory\n  collection: articles\n  dimensions: 384\n",
    )
    .unwrap();

    ragway_cmd(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("articles"))
        .stdout(predicate::str::contains("384"));
}

#[test]
fn test_invalid_config_exits_with_input_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.yml"),
        "search:\n  similarity_threshold: 2.5\n",
    )
    .unwrap();

    ragway_cmd(&dir)
        .arg("health")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("similarity_threshold"));
}

#[test]
fn test_unknown_provider() {
    let dir = TempDir::new().unwrap();
    ragway_cmd(&dir)
        .env("RAGWAY_VECTOR_STORE", "pinecone")
        .arg("status")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown vector store provider"));
}
