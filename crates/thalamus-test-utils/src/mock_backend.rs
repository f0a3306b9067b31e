// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockBackend` implements `GenerationBackend` with replies scripted per node
//! name, so classifier and dispatch calls can be answered differently.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use thalamus_core::{GenerationBackend, HealthStatus, Node, StreamResult, ThalamusError};

/// Time-to-first-token reported for scripted text replies.
pub const MOCK_TTFT: Duration = Duration::from_millis(5);

/// One call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub node: String,
    pub model: String,
    pub prompt: String,
}

enum Reply {
    Result(Result<StreamResult, ThalamusError>),
    Delayed(Duration, StreamResult),
}

/// A generation backend that answers from per-node FIFO queues.
///
/// When a node's queue is empty the reply is "mock response".
pub struct MockBackend {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    health: Mutex<HashMap<String, HealthStatus>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            health: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(mut self, node: &str, reply: Reply) -> Self {
        self.replies
            .get_mut()
            .entry(node.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a reply whose text arrives with [`MOCK_TTFT`].
    pub fn with_reply(self, node: &str, text: &str) -> Self {
        self.push(node, Reply::Result(Ok(text_result(text))))
    }

    /// Queue a stream that closes without a single chunk.
    pub fn with_silence(self, node: &str) -> Self {
        self.push(node, Reply::Result(Ok(StreamResult::empty())))
    }

    /// Queue a failed call.
    pub fn with_failure(self, node: &str, error: ThalamusError) -> Self {
        self.push(node, Reply::Result(Err(error)))
    }

    /// Queue a reply that is only returned after `delay`.
    pub fn with_delayed_reply(self, node: &str, delay: Duration, text: &str) -> Self {
        self.push(node, Reply::Delayed(delay, text_result(text)))
    }

    /// Script the answer to health probes for a node.
    pub fn with_health(mut self, node: &str, status: HealthStatus) -> Self {
        self.health.get_mut().insert(node.to_string(), status);
        self
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    /// Calls made to the named node.
    pub async fn calls_to(&self, node: &str) -> Vec<MockCall> {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| c.node == node)
            .cloned()
            .collect()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn text_result(text: &str) -> StreamResult {
    StreamResult {
        text: text.to_string(),
        first_token: Some(MOCK_TTFT),
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock-backend"
    }

    async fn generate(&self, node: &Node, prompt: &str) -> Result<StreamResult, ThalamusError> {
        self.calls.lock().await.push(MockCall {
            node: node.name.clone(),
            model: node.model.clone(),
            prompt: prompt.to_string(),
        });

        let reply = self
            .replies
            .lock()
            .await
            .get_mut(&node.name)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Result(result)) => result,
            Some(Reply::Delayed(delay, result)) => {
                tokio::time::sleep(delay).await;
                Ok(result)
            }
            None => Ok(text_result("mock response")),
        }
    }

    async fn health_check(&self, node: &Node) -> HealthStatus {
        self.health
            .lock()
            .await
            .get(&node.name)
            .cloned()
            .unwrap_or(HealthStatus::Healthy)
    }
}
