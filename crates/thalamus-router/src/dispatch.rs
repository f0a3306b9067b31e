// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision-to-node dispatch.

use thalamus_config::ThalamusConfig;
use thalamus_core::{Decision, GenerationBackend, Node, StreamResult, Tier};
use tracing::{info, warn};

/// Static two-entry table: SIMPLE goes to the fast tier, COMPLEX to the heavy one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    fast: Node,
    heavy: Node,
}

impl DispatchTable {
    pub fn new(fast: Node, heavy: Node) -> Self {
        Self { fast, heavy }
    }

    pub fn from_config(config: &ThalamusConfig) -> Self {
        Self::new(config.node(Tier::Fast), config.node(Tier::Heavy))
    }

    /// Node answering queries of the given decision.
    pub fn target(&self, decision: Decision) -> &Node {
        self.node(decision.tier())
    }

    pub fn node(&self, tier: Tier) -> &Node {
        match tier {
            Tier::Fast => &self.fast,
            Tier::Heavy => &self.heavy,
        }
    }
}

/// Outcome of the dispatch stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub target: Node,
    pub response: StreamResult,
}

/// Sends the unmodified query to the node selected by the table.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: DispatchTable,
}

impl Dispatcher {
    pub fn new(table: DispatchTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Execute the query on the target node. A failed call yields an empty
    /// response with zero TTFT.
    pub async fn dispatch(
        &self,
        backend: &dyn GenerationBackend,
        decision: Decision,
        query: &str,
    ) -> Dispatch {
        let target = self.table.target(decision).clone();

        let response = match backend.generate(&target, query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(node = %target.name, error = %e, "dispatch call failed");
                StreamResult::empty()
            }
        };

        info!(
            node = %target.name,
            model = %target.model,
            decision = %decision,
            ttft_ms = response.ttft_ms(),
            chars = response.text.len(),
            "query executed"
        );

        Dispatch { target, response }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thalamus_core::ThalamusError;
    use thalamus_test_utils::MockBackend;

    fn table() -> DispatchTable {
        DispatchTable::new(
            Node::new("Cerebellum", "10.0.0.1", 11434, "llama3.2:3b"),
            Node::new("Cortex", "10.0.0.2", 11434, "llama3.1:8b"),
        )
    }

    #[test]
    fn table_maps_decisions_to_tiers() {
        let table = table();
        assert_eq!(table.target(Decision::Simple).name, "Cerebellum");
        assert_eq!(table.target(Decision::Simple).model, "llama3.2:3b");
        assert_eq!(table.target(Decision::Complex).name, "Cortex");
        assert_eq!(table.target(Decision::Complex).model, "llama3.1:8b");
    }

    #[test]
    fn table_from_config_uses_shared_port() {
        let mut config = ThalamusConfig::default();
        config.cerebellum.host = "10.0.0.1".into();
        config.cortex.host = "10.0.0.2".into();
        config.ollama.port = 8080;
        let table = DispatchTable::from_config(&config);
        assert_eq!(table.node(Tier::Heavy).base_url(), "http://10.0.0.2:8080");
        assert_eq!(table.node(Tier::Fast).base_url(), "http://10.0.0.1:8080");
    }

    #[tokio::test]
    async fn sends_query_unmodified_to_target() {
        let backend = MockBackend::new().with_reply("Cortex", "The printing press...");
        let dispatcher = Dispatcher::new(table());
        let query = "Explain the impact of the printing press on the Reformation.";

        let outcome = dispatcher.dispatch(&backend, Decision::Complex, query).await;
        assert_eq!(outcome.target.name, "Cortex");
        assert_eq!(outcome.response.text, "The printing press...");

        let calls = backend.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, query);
        assert_eq!(calls[0].model, "llama3.1:8b");
    }

    #[tokio::test]
    async fn failure_yields_empty_response() {
        let backend = MockBackend::new().with_failure(
            "Cerebellum",
            ThalamusError::Protocol {
                node: "Cerebellum".into(),
                message: "API returned 500".into(),
            },
        );
        let outcome = Dispatcher::new(table())
            .dispatch(&backend, Decision::Simple, "What is 2 + 2?")
            .await;
        assert_eq!(outcome.target.name, "Cerebellum");
        assert_eq!(outcome.response, StreamResult::empty());
    }
}
