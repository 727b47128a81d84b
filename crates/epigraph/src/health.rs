// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `epigraph health` command implementation.
//!
//! Reports the effective backend route and queries the server's health
//! endpoint.

use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use colored::Colorize;
use epigraph_client::HttpBackend;
use epigraph_config::{EpigraphConfig, RouteMode};
use epigraph_core::{AnalysisBackend, EpigraphError, HealthReport};

/// Status of a health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `epigraph health` command.
///
/// Exits non-zero when the server is unreachable or reports a non-healthy status.
pub async fn run_health(config: &EpigraphConfig, plain: bool) -> Result<ExitCode, EpigraphError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let backend = HttpBackend::from_config(&config.backend)?;

    let results = vec![check_route(config), check_backend(&backend).await];

    println!();
    println!("  epigraph health");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_check(result, use_color));
    }
    println!();

    let failed = results.iter().any(|r| r.status == CheckStatus::Fail);
    if failed {
        println!("  Analysis server is not available.");
        println!();
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn check_route(config: &EpigraphConfig) -> CheckResult {
    let mode = match config.backend.mode {
        RouteMode::Direct => "direct",
        RouteMode::Rewrite => "rewrite",
    };
    CheckResult {
        name: "Route".to_string(),
        status: CheckStatus::Pass,
        message: format!("{} ({mode})", config.backend.api_root()),
        duration: Duration::ZERO,
    }
}

async fn check_backend(backend: &dyn AnalysisBackend) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match backend.health().await {
        Ok(report) => classify_report(&report),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Analysis server".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn classify_report(report: &HealthReport) -> (CheckStatus, String) {
    let mut message = report.status.clone();
    if let Some(active) = report.active_requests {
        message.push_str(&format!(", {active} active request(s)"));
    }
    if let Some(server) = &report.server {
        message.push_str(&format!(", {server}"));
    }

    let status = if report.is_healthy() {
        CheckStatus::Pass
    } else {
        CheckStatus::Warn
    };
    (status, message)
}

fn format_check(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}
