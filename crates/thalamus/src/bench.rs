// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thalamus bench` command implementation.
//!
//! Sends one prompt to a node, stops at the first chunk, and appends the
//! time-to-first-token to the latency log.

use std::time::Duration;

use thalamus_config::ThalamusConfig;
use thalamus_core::{LatencyRecord, Node, ThalamusError, Tier};
use thalamus_ledger::LatencyLedger;
use thalamus_ollama::OllamaClient;
use tracing::info;

/// Run the `thalamus bench` command.
pub async fn run_bench(
    config: &ThalamusConfig,
    tier: Tier,
    prompt: Option<String>,
) -> Result<(), ThalamusError> {
    let client = OllamaClient::from_config(config)?;
    let node = config.node(tier);
    let prompt = prompt.unwrap_or_else(|| config.bench.prompt.clone());
    let ledger = LatencyLedger::from_config(config);

    println!("Benchmarking {} ({}) at {}", node.name, node.model, node.base_url());
    let record = measure(
        &client,
        &node,
        &prompt,
        Duration::from_secs(config.bench.timeout_secs),
        &ledger,
    )
    .await?;
    println!("TTFT: {:.2} ms", record.ttft_ms);
    Ok(())
}

/// Measure one first-chunk latency and log it.
async fn measure(
    client: &OllamaClient,
    node: &Node,
    prompt: &str,
    timeout: Duration,
    ledger: &LatencyLedger,
) -> Result<LatencyRecord, ThalamusError> {
    let latency = client
        .first_chunk_latency(node, prompt, timeout)
        .await?
        .ok_or_else(|| ThalamusError::Protocol {
            node: node.name.clone(),
            message: "stream closed before the first chunk".to_string(),
        })?;

    let record = LatencyRecord::new(&node.name, latency.as_secs_f64() * 1000.0);
    ledger.append(&record).await?;
    info!(node = %node.name, ttft_ms = record.ttft_ms, "latency recorded");
    Ok(record)
}
