// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the `epigraph` binary and the controller flow.
//!
//! Each test starts an isolated wiremock server and, where the binary is
//! exercised, a temp config file pointing at it. Tests are independent and
//! order-insensitive.

use std::path::PathBuf;
use std::sync::Arc;

use epigraph_client::{AnalysisController, HttpBackend, Outcome, ResultSource};
use epigraph_core::{
    AnalysisResult, InputPayload, Locale, Page, ResultTab, Stage, StreamEvent,
};
use epigraph_test_utils::{sse_body, TestServer};
use tempfile::TempDir;
use tokio::process::Command;

fn result(summary: &str) -> AnalysisResult {
    AnalysisResult {
        summary: summary.to_string(),
        language: Some("en".to_string()),
        tabs: vec![ResultTab {
            name: "Translation".to_string(),
            content: "For Ningirsu, mighty warrior of Enlil".to_string(),
        }],
        preprocessing: None,
    }
}

fn write_config(dir: &TempDir, base_url: &str) -> PathBuf {
    let path = dir.path().join("epigraph.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[app]
log_level = "warn"
locale = "en"

[backend]
base_url = "{base_url}"
request_timeout_secs = 10
connect_timeout_secs = 2
"#
        ),
    )
    .unwrap();
    path
}

async fn epigraph(config: &PathBuf, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_epigraph"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .await
        .expect("binary should run")
}

// ---- Binary: analyze ----

#[tokio::test(flavor = "multi_thread")]
async fn analyze_prints_streamed_result_as_json() {
    let server = TestServer::start().await;
    server
        .mount_stream(sse_body(&[
            StreamEvent::Status {
                stage: Stage::Initializing,
                message: None,
            },
            StreamEvent::FinalResults {
                results: result("Statue inscription of Gudea"),
            },
        ]))
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());
    let output = epigraph(&config, &["analyze", "--text", "{d}nin-gir2-su", "--json"]).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let printed: AnalysisResult = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, result("Statue inscription of Gudea"));
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_reports_localized_failure_when_both_endpoints_fail() {
    let server = TestServer::start().await;
    server.mount_stream_status(500).await;
    server.mount_query_status(500).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());
    let output = epigraph(
        &config,
        &["analyze", "--text", "x", "--lang", "he", "--json"],
    )
    .await;

    assert!(output.status.success());
    let printed: AnalysisResult = serde_json::from_slice(&output.stdout).unwrap();
    assert!(printed.summary.starts_with("שגיאה בניתוח: "), "{}", printed.summary);
    assert_eq!(printed.tabs.len(), 1);
    assert_eq!(printed.tabs[0].name, "שגיאה");
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_plain_renders_tabs() {
    let server = TestServer::start().await;
    server.mount_stream_status(503).await;
    server.mount_query(&result("Foundation cone")).await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cone.txt");
    std::fs::write(&file, "e2 {d}nin-gir2-su").unwrap();
    let config = write_config(&dir, &server.uri());
    let output = epigraph(
        &config,
        &["analyze", "--file", file.to_str().unwrap(), "--plain"],
    )
    .await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Foundation cone\n"), "{stdout}");
    assert!(stdout.contains("── Translation ──"));
    assert!(stdout.contains("Analyzed in: English"));

    let sent = server.request_bodies("/api/query").await;
    assert_eq!(sent[0]["inputData"]["type"], "file");
    assert_eq!(sent[0]["inputData"]["fileName"], "cone.txt");
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_rejects_blank_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:9");
    let output = epigraph(&config, &["analyze", "--text", "  "]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid input"));
}

// ---- Binary: health and config ----

#[tokio::test(flavor = "multi_thread")]
async fn health_passes_against_healthy_server() {
    let server = TestServer::start().await;
    server
        .mount_health(serde_json::json!({"status": "healthy", "active_requests": 0}))
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, &server.uri());
    let output = epigraph(&config, &["health", "--plain"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[OK]   Analysis server"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn health_fails_when_server_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "http://127.0.0.1:9");
    let output = epigraph(&config, &["health", "--plain"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("[FAIL]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn config_prints_effective_toml() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir, "http://backend.test:5328");
    let output = epigraph(&config, &["config"]).await;

    assert!(output.status.success());
    let printed: toml::Value = toml::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(printed["backend"]["base_url"].as_str(), Some("http://backend.test:5328"));
    assert_eq!(printed["app"]["locale"].as_str(), Some("en"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_config_is_rendered_with_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epigraph.toml");
    std::fs::write(&path, "[backend]\nbase_ur = \"http://x\"\n").unwrap();

    let output = epigraph(&path, &["config"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("base_url"));
}

// ---- Controller flow over HTTP ----

#[tokio::test]
async fn controller_publishes_progress_and_result() {
    let server = TestServer::start().await;
    server
        .mount_stream(sse_body(&[
            StreamEvent::Status {
                stage: Stage::Initializing,
                message: None,
            },
            StreamEvent::QuickPreview {
                content: "Votive inscription".into(),
            },
            StreamEvent::Classification {
                genre: Some("Votive".into()),
                period: Some("Lagash II".into()),
            },
            StreamEvent::FinalResults {
                results: result("Votive inscription of Gudea"),
            },
        ]))
        .await;

    let config = epigraph_config::load_and_validate_str(&format!(
        "[backend]\nbase_url = \"{}\"\n",
        server.uri()
    ))
    .unwrap();
    let backend = HttpBackend::from_config(&config.backend).unwrap();
    let controller = AnalysisController::new(Arc::new(backend));

    let mut states = controller.subscribe();
    let observed = tokio::spawn(async move {
        let mut stages = Vec::new();
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            if stages.last() != Some(&state.progress.stage) {
                stages.push(state.progress.stage);
            }
            if state.page == Page::Results {
                break;
            }
        }
        stages
    });

    let outcome = controller
        .submit(InputPayload::text("e2 {d}nin-gir2-su").unwrap(), Locale::En)
        .await;
    assert!(matches!(
        outcome,
        Outcome::Completed {
            source: ResultSource::Streamed,
            ..
        }
    ));

    let stages = observed.await.unwrap();
    assert!(stages.windows(2).all(|w| w[0] <= w[1]), "{stages:?}");
    assert_eq!(stages.last(), Some(&Stage::Complete));

    let state = controller.state();
    assert_eq!(state.progress.quick_preview.as_deref(), Some("Votive inscription"));
    assert_eq!(state.progress.period.as_deref(), Some("Lagash II"));
    assert_eq!(state.result.unwrap().summary, "Votive inscription of Gudea");
}
