// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama generation API.
//!
//! Provides [`OllamaClient`], which opens streaming generation calls, reduces
//! them to a [`StreamResult`], and probes node readiness. Calls are never
//! retried.

use std::time::Duration;

use futures::StreamExt;
use reqwest::StatusCode;
use thalamus_config::ThalamusConfig;
use thalamus_core::{FirstTokenClock, HealthStatus, Node, StreamResult, ThalamusError};
use tracing::{debug, warn};

use crate::ndjson::{self, ChunkStream};
use crate::types::GenerateRequest;

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";

/// HTTP client for Ollama nodes.
///
/// One client serves every node; the target address comes from the [`Node`]
/// passed to each call. Each call carries a single timeout covering
/// connection, headers and the whole body.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    timeout: Duration,
    probe_timeout: Duration,
}

impl OllamaClient {
    /// Creates a client with the given generation and probe ceilings.
    pub fn new(timeout: Duration, probe_timeout: Duration) -> Result<Self, ThalamusError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ThalamusError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            probe_timeout,
        })
    }

    /// Creates a client from the `[ollama]` section.
    pub fn from_config(config: &ThalamusConfig) -> Result<Self, ThalamusError> {
        Self::new(
            Duration::from_secs(config.ollama.timeout_secs),
            Duration::from_secs(config.ollama.probe_timeout_secs),
        )
    }

    /// Ceiling applied to generation calls.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a streaming generation request and returns the chunk stream.
    ///
    /// Fails on connection errors, on the timeout, and on non-success status.
    pub async fn open_stream(
        &self,
        node: &Node,
        prompt: &str,
        timeout: Duration,
    ) -> Result<ChunkStream, ThalamusError> {
        let request = GenerateRequest {
            model: &node.model,
            prompt,
            stream: true,
        };

        let response = self
            .client
            .post(node.endpoint(GENERATE_PATH))
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&node.name, timeout, e))?;

        let status = response.status();
        debug!(node = %node.name, status = %status, "generation response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ThalamusError::Protocol {
                node: node.name.clone(),
                message: format!("API returned {status}: {}", body.trim()),
            });
        }

        Ok(ndjson::parse_ndjson_stream(
            response.bytes_stream(),
            node.name.clone(),
            timeout,
        ))
    }

    /// Runs one generation call to completion.
    ///
    /// The clock starts before the request is sent; the first valid chunk
    /// marks time-to-first-token whether or not it carries text. Fragments
    /// are concatenated untouched until a `done` chunk or the end of the body.
    pub async fn stream_generate(
        &self,
        node: &Node,
        prompt: &str,
    ) -> Result<StreamResult, ThalamusError> {
        let mut clock = FirstTokenClock::start();
        let mut chunks = self.open_stream(node, prompt, self.timeout).await?;
        let mut text = String::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            if clock.mark() {
                debug!(node = %node.name, elapsed = ?clock.first_token(), "first token");
            }
            if let Some(fragment) = chunk.response.as_deref() {
                text.push_str(fragment);
            }
            if chunk.done {
                debug!(
                    node = %node.name,
                    eval_count = ?chunk.eval_count,
                    total_duration_ns = ?chunk.total_duration,
                    "generation complete"
                );
                break;
            }
        }

        Ok(clock.finish(text))
    }

    /// Measures latency to the first chunk and abandons the rest of the stream.
    ///
    /// Returns `None` when the body closed before any valid chunk arrived.
    pub async fn first_chunk_latency(
        &self,
        node: &Node,
        prompt: &str,
        timeout: Duration,
    ) -> Result<Option<Duration>, ThalamusError> {
        let mut clock = FirstTokenClock::start();
        let mut chunks = self.open_stream(node, prompt, timeout).await?;

        if let Some(chunk) = chunks.next().await {
            chunk?;
            clock.mark();
        }
        Ok(clock.first_token())
    }

    /// Probes `GET /api/tags`.
    ///
    /// 200 is healthy; any other status means the server is up but not
    /// ready; refused or timed-out connections are unhealthy.
    pub async fn probe(&self, node: &Node) -> HealthStatus {
        let result = self
            .client
            .get(node.endpoint(TAGS_PATH))
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => HealthStatus::Healthy,
            Ok(response) => {
                let status = response.status();
                warn!(node = %node.name, status = %status, "node reachable but not ready");
                HealthStatus::Degraded(format!("reachable but returned {status}"))
            }
            Err(e) => {
                let err = transport_error(&node.name, self.probe_timeout, e);
                warn!(node = %node.name, error = %err, "node unavailable");
                HealthStatus::Unhealthy(err.to_string())
            }
        }
    }
}

/// Maps a reqwest failure onto the node-tagged error variants.
pub(crate) fn transport_error(node: &str, timeout: Duration, e: reqwest::Error) -> ThalamusError {
    if e.is_timeout() {
        ThalamusError::Timeout {
            node: node.to_string(),
            duration: timeout,
        }
    } else {
        ThalamusError::Connection {
            node: node.to_string(),
            source: Box::new(e),
        }
    }
}
