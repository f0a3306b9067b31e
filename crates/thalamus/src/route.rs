// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thalamus route` command implementation.

use std::sync::Arc;

use thalamus_agent::{Orchestrator, RouteReport};
use thalamus_config::ThalamusConfig;
use thalamus_core::ThalamusError;
use thalamus_ollama::OllamaClient;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

/// Route every query and print one block per report.
///
/// With no queries on the command line, one query is read per stdin line.
pub async fn run_route(
    config: &ThalamusConfig,
    queries: Vec<String>,
    concurrency: usize,
) -> Result<(), ThalamusError> {
    let queries = if queries.is_empty() {
        read_queries(BufReader::new(tokio::io::stdin())).await?
    } else {
        queries
    };

    let backend = Arc::new(OllamaClient::from_config(config)?);
    let orchestrator = Orchestrator::from_config(config, backend);

    let reports = orchestrator.route_batch(queries, concurrency).await;

    let mut unpersisted = 0;
    for report in &reports {
        println!("{}", render_report(report));
        if report.persisted.is_err() {
            unpersisted += 1;
        }
    }
    if unpersisted > 0 {
        warn!(
            count = unpersisted,
            path = %orchestrator.ledger().path().display(),
            "some routing records were not written"
        );
    }

    Ok(())
}

/// Non-blank lines, in order.
async fn read_queries<R: AsyncBufRead + Unpin>(reader: R) -> Result<Vec<String>, ThalamusError> {
    let mut lines = reader.lines();
    let mut queries = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ThalamusError::Internal(format!("failed to read stdin: {e}")))?
    {
        if !line.trim().is_empty() {
            queries.push(line);
        }
    }
    Ok(queries)
}

fn render_report(report: &RouteReport) -> String {
    let mut out = format!(
        "Query: {}\nClassification: {} -> {} (classify {:.2} ms, first token {:.2} ms)\n",
        report.record.query,
        report.decision(),
        report.target.name,
        report.record.class_ttft_ms,
        report.record.exec_ttft_ms,
    );
    if let Some(reason) = report.classification.ambiguity {
        out.push_str(&format!("Note: ambiguous classification ({reason})\n"));
    }
    out.push_str("Response: ");
    out.push_str(report.text());
    if let Err(e) = &report.persisted {
        out.push_str(&format!("\nWarning: {e}"));
    }
    out
}
