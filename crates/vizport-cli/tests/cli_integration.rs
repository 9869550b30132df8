//! End-to-end tests of the `vizport` binary against a stub application

use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use vizport_core::stub::{StubApp, StubReply};

async fn vizport(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vizport"))
        .args(args)
        .env("VIZPORT_CONFIG", config_dir.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("failed to run vizport")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exec_prints_fields() {
    let stub = StubApp::start(|cmd| match cmd.name() {
        "getColormaps" => StubReply::fields(["gray", "heat", "cool"]),
        _ => StubReply::empty(),
    })
    .await
    .unwrap();
    let dir = TempDir::new().unwrap();
    let port = stub.port().to_string();

    let output = vizport(dir.path(), &["--port", &port, "exec", "getColormaps"]).await;
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout_lines(&output), vec!["gray", "heat", "cool"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_exec_sends_typed_arguments() {
    let stub = StubApp::start(|_| StubReply::empty()).await.unwrap();
    let dir = TempDir::new().unwrap();
    let port = stub.port().to_string();

    let output = vizport(
        dir.path(),
        &["--port", &port, "exec", "setCustomLayout", "nrows=2", "ncols=3"],
    )
    .await;
    assert!(output.status.success(), "{:?}", output);

    let received = stub.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].to_string(), "setCustomLayout ncols=3 nrows=2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_views_by_kind() {
    let stub = StubApp::start(|cmd| match cmd.name() {
        "getHistogramViews" => StubReply::fields(["h1", "h2"]),
        _ => StubReply::empty(),
    })
    .await
    .unwrap();
    let dir = TempDir::new().unwrap();
    let port = stub.port().to_string();

    let output = vizport(dir.path(), &["--port", &port, "views", "--kind", "histogram"]).await;
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout_lines(&output), vec!["histogram\th1", "histogram\th2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nothing_listening_fails() {
    let dir = TempDir::new().unwrap();
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = listener.local_addr().unwrap().port().to_string();
    drop(listener);

    let output = vizport(dir.path(), &["--port", &port, "colormaps"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains(&port));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_init_then_validate() {
    let dir = TempDir::new().unwrap();

    let output = vizport(dir.path(), &["config", "init"]).await;
    assert!(output.status.success(), "{:?}", output);
    assert!(dir.path().join("config.toml").exists());

    let output = vizport(dir.path(), &["config", "init"]).await;
    assert!(!output.status.success());

    let output = vizport(dir.path(), &["config", "validate"]).await;
    assert!(output.status.success(), "{:?}", output);

    let output = vizport(dir.path(), &["config", "show"]).await;
    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("[app]"));
}
