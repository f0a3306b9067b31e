// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama adapter for the Thalamus query router.
//!
//! This crate implements [`GenerationBackend`] for Ollama's streaming
//! `/api/generate` endpoint and its `/api/tags` readiness probe.

pub mod client;
pub mod ndjson;
pub mod types;

use async_trait::async_trait;
use thalamus_core::{GenerationBackend, HealthStatus, Node, StreamResult, ThalamusError};

pub use client::OllamaClient;
pub use types::GenerateChunk;

#[async_trait]
impl GenerationBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, node: &Node, prompt: &str) -> Result<StreamResult, ThalamusError> {
        self.stream_generate(node, prompt).await
    }

    async fn health_check(&self, node: &Node) -> HealthStatus {
        self.probe(node).await
    }
}
