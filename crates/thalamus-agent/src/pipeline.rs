// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classify, dispatch, log.
//!
//! Each query runs through its own sequential pipeline: the classifier call
//! fully resolves before the dispatch call starts, and exactly one routing
//! record is appended at the end whatever happened along the way.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use strum::Display;
use thalamus_config::ThalamusConfig;
use thalamus_core::{
    Decision, GenerationBackend, LogRecord, Node, StreamResult, ThalamusError, Tier,
};
use thalamus_ledger::RoutingLedger;
use thalamus_router::{Classification, Classifier, DispatchTable, Dispatcher};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::recording;

/// Pipeline position, used in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Classifying,
    Dispatching,
    Logged,
}

/// Everything one routing attempt produced.
#[derive(Debug)]
pub struct RouteReport {
    /// Correlates the log lines of one attempt.
    pub request_id: Uuid,
    pub classification: Classification,
    /// Node that answered (or failed to answer) the query.
    pub target: Node,
    pub response: StreamResult,
    /// The row handed to the routing ledger.
    pub record: LogRecord,
    /// Outcome of the ledger append; never aborts the pipeline.
    pub persisted: Result<(), ThalamusError>,
}

impl RouteReport {
    pub fn decision(&self) -> Decision {
        self.classification.decision
    }

    /// Final answer text, empty when the dispatch call failed.
    pub fn text(&self) -> &str {
        &self.response.text
    }
}

/// Runs the routing pipeline against one backend and one routing ledger.
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
    classifier: Classifier,
    dispatcher: Dispatcher,
    ledger: Arc<RoutingLedger>,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        classifier: Classifier,
        dispatcher: Dispatcher,
        ledger: Arc<RoutingLedger>,
    ) -> Self {
        Self {
            backend,
            classifier,
            dispatcher,
            ledger,
        }
    }

    /// Wire the stages from configuration: the classifier runs on the fast
    /// tier and the routing ledger lives at `ledger.routing_log`.
    pub fn from_config(config: &ThalamusConfig, backend: Arc<dyn GenerationBackend>) -> Self {
        Self::new(
            backend,
            Classifier::new(config.node(Tier::Fast)),
            Dispatcher::new(DispatchTable::from_config(config)),
            Arc::new(RoutingLedger::from_config(config)),
        )
    }

    pub fn ledger(&self) -> &RoutingLedger {
        &self.ledger
    }

    /// Route one query to completion.
    pub async fn route(&self, query: &str) -> RouteReport {
        let request_id = Uuid::new_v4();
        debug!(%request_id, stage = %Stage::Classifying, chars = query.len(), "routing query");

        let classification = self.classifier.classify(self.backend.as_ref(), query).await;
        recording::record_ttft("classify", classification.ttft_ms);
        if let Some(reason) = classification.ambiguity {
            recording::record_ambiguity(reason);
        }

        debug!(
            %request_id,
            stage = %Stage::Dispatching,
            decision = %classification.decision,
            "classification resolved"
        );
        let dispatch = self
            .dispatcher
            .dispatch(self.backend.as_ref(), classification.decision, query)
            .await;
        recording::record_ttft("dispatch", dispatch.response.ttft_ms());

        let record = LogRecord::new(
            query,
            classification.decision,
            &dispatch.target.name,
            classification.ttft_ms,
            dispatch.response.ttft_ms(),
        );
        let persisted = self.ledger.append(&record).await;
        if let Err(e) = &persisted {
            recording::record_ledger_failure();
            warn!(%request_id, error = %e, path = %self.ledger.path().display(), "routing record not persisted");
        }
        recording::record_routed(classification.decision);

        info!(
            %request_id,
            stage = %Stage::Logged,
            decision = %classification.decision,
            node = %dispatch.target.name,
            class_ttft_ms = classification.ttft_ms,
            exec_ttft_ms = dispatch.response.ttft_ms(),
            "query routed"
        );

        RouteReport {
            request_id,
            classification,
            target: dispatch.target,
            response: dispatch.response,
            record,
            persisted,
        }
    }

    /// Route independent queries with at most `concurrency` in flight.
    ///
    /// Reports come back in input order. A concurrency of 0 is treated as 1.
    pub async fn route_batch(&self, queries: Vec<String>, concurrency: usize) -> Vec<RouteReport> {
        let concurrency = concurrency.max(1);
        debug!(count = queries.len(), concurrency, "routing batch");

        stream::iter(queries)
            .map(|query| async move { self.route(&query).await })
            .buffered(concurrency)
            .collect()
            .await
    }
}
