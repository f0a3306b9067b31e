// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thalamus doctor` command implementation.
//!
//! Probes both inference nodes and checks that the routing log can be
//! written.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use thalamus_config::ThalamusConfig;
use thalamus_core::{GenerationBackend, HealthStatus, Node, ThalamusError, Tier};
use thalamus_ollama::OllamaClient;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

/// Run the `thalamus doctor` command.
///
/// Fails when any check fails; warnings alone still succeed.
pub async fn run_doctor(config: &ThalamusConfig, plain: bool) -> Result<(), ThalamusError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let client = OllamaClient::from_config(config)?;

    let results = run_checks(config, &client).await;

    println!();
    println!("  thalamus doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let fail_count = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warn_count = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    let issues = fail_count + warn_count;
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(ThalamusError::Internal(format!(
            "{fail_count} doctor check(s) failed"
        )));
    }
    Ok(())
}

async fn run_checks(config: &ThalamusConfig, backend: &dyn GenerationBackend) -> Vec<CheckResult> {
    vec![
        check_node(backend, &config.node(Tier::Fast)).await,
        check_node(backend, &config.node(Tier::Heavy)).await,
        check_log_dir("Routing log", &config.ledger.routing_log),
        check_log_dir("Latency log", &config.ledger.latency_log),
    ]
}

/// Readiness probe against one node.
async fn check_node(backend: &dyn GenerationBackend, node: &Node) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match backend.health_check(node).await {
        HealthStatus::Healthy => (
            CheckStatus::Pass,
            format!("{} online ({})", node.base_url(), node.model),
        ),
        // Reachable but not ready counts as a failed check.
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            (CheckStatus::Fail, format!("{}: {reason}", node.base_url()))
        }
    };

    CheckResult {
        name: node.name.clone(),
        status,
        message,
        duration: start.elapsed(),
    }
}

/// The log file's directory exists, or will be created on first write.
fn check_log_dir(name: &str, log_path: &str) -> CheckResult {
    let start = Instant::now();
    let dir = Path::new(log_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let (status, message) = match std::fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => (
            CheckStatus::Fail,
            format!("{} is not a directory", dir.display()),
        ),
        Ok(meta) if meta.permissions().readonly() => (
            CheckStatus::Fail,
            format!("{} is read-only", dir.display()),
        ),
        Ok(_) => (CheckStatus::Pass, log_path.to_string()),
        Err(_) => (
            CheckStatus::Warn,
            format!("{} missing (created on first write)", dir.display()),
        ),
    };

    CheckResult {
        name: name.to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green().to_string(), result.message.normal().to_string()),
            CheckStatus::Warn => ("!".yellow().to_string(), result.message.yellow().to_string()),
            CheckStatus::Fail => ("✗".red().to_string(), result.message.red().to_string()),
        };
        format!("    {symbol} {:<20} {message} ({duration_ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({duration_ms}ms)", result.name, result.message)
    }
}
