// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for streaming generation APIs.

use async_trait::async_trait;

use crate::error::ThalamusError;
use crate::types::{HealthStatus, Node, StreamResult};

/// A streaming generation API that can be asked to answer a prompt on a node.
///
/// Implementations reduce the whole token stream to a [`StreamResult`]; the
/// error variant tells the caller why a call produced nothing. Callers in the
/// routing pipeline collapse errors to [`StreamResult::empty`].
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Human-readable name of this backend implementation.
    fn name(&self) -> &str;

    /// Issue one streaming generation call and consume it to completion.
    async fn generate(&self, node: &Node, prompt: &str) -> Result<StreamResult, ThalamusError>;

    /// Probe the node for readiness.
    async fn health_check(&self, node: &Node) -> HealthStatus;
}
