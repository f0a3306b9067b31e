// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the router, the backend adapters, and the ledgers.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

/// Capability tier of an inference node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Low-capacity node used for triage and simple queries (Cerebellum).
    Fast,
    /// High-capacity node reserved for complex queries (Cortex).
    Heavy,
}

/// Binary routing decision produced by the classifier stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    /// Factual lookups, arithmetic, definitions, greetings.
    Simple,
    /// Multi-step reasoning, code, creative writing, analysis.
    Complex,
}

impl Decision {
    /// The tier that answers queries with this decision.
    pub fn tier(self) -> Tier {
        match self {
            Decision::Simple => Tier::Fast,
            Decision::Complex => Tier::Heavy,
        }
    }
}

/// One inference backend: identity, address, and the model requested from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display name recorded in logs (e.g. "Cortex").
    pub name: String,
    /// Hostname or IP address.
    pub host: String,
    /// Port of the generation API.
    pub port: u16,
    /// Model identifier sent with every request.
    pub model: String,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            model: model.into(),
        }
    }

    /// Base URL of the node's API, without a trailing slash.
    ///
    /// A bare IPv6 literal such as `::1` is wrapped in brackets.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains(':') && !host.starts_with('[') {
            format!("http://[{host}]:{}", self.port)
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Full URL for an API path such as `/api/generate`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// Reduced outcome of one streaming generation call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamResult {
    /// Concatenated text fragments in arrival order.
    pub text: String,
    /// Latency from call start to the first valid chunk, if any arrived.
    pub first_token: Option<Duration>,
}

impl StreamResult {
    /// The fallback value for a call that failed or produced nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Time-to-first-token in milliseconds; `0.0` when no chunk was received.
    pub fn ttft_ms(&self) -> f64 {
        self.first_token
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Whether at least one valid chunk was received.
    pub fn received_any(&self) -> bool {
        self.first_token.is_some()
    }
}

/// Tracks the first-token anchor of a single stream.
///
/// The anchor can be set once; later calls to [`FirstTokenClock::mark`] are no-ops.
#[derive(Debug, Clone, Copy)]
pub struct FirstTokenClock {
    started: Instant,
    first: Option<Duration>,
}

impl FirstTokenClock {
    /// Start the clock at the moment the call is issued.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            first: None,
        }
    }

    /// Record a chunk arrival. Returns `true` only for the first one.
    pub fn mark(&mut self) -> bool {
        if self.first.is_some() {
            return false;
        }
        self.first = Some(self.started.elapsed());
        true
    }

    /// Latency to the first chunk, if one was marked.
    pub fn first_token(&self) -> Option<Duration> {
        self.first
    }

    /// Consume the clock and attach the accumulated text.
    pub fn finish(self, text: String) -> StreamResult {
        StreamResult {
            text,
            first_token: self.first,
        }
    }
}

/// Health status reported by a node probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Node answered the probe with a success status.
    Healthy,
    /// Node is reachable but answered with a non-success status.
    Degraded(String),
    /// Node refused the connection or timed out.
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Timestamp format used by every persisted record (ISO 8601, UTC, millis).
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:.2}"))
}

/// One row of the routing log, written once per routed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Classification")]
    pub decision: Decision,
    #[serde(rename = "Target_Node")]
    pub target_node: String,
    #[serde(rename = "Class_TTFT_ms", serialize_with = "two_decimals")]
    pub class_ttft_ms: f64,
    #[serde(rename = "Exec_TTFT_ms", serialize_with = "two_decimals")]
    pub exec_ttft_ms: f64,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        query: impl Into<String>,
        decision: Decision,
        target_node: impl Into<String>,
        class_ttft_ms: f64,
        exec_ttft_ms: f64,
    ) -> Self {
        Self {
            timestamp: now_timestamp(),
            query: query.into(),
            decision,
            target_node: target_node.into(),
            class_ttft_ms,
            exec_ttft_ms,
        }
    }
}

/// One row of the latency benchmark log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "TTFT_ms", serialize_with = "two_decimals")]
    pub ttft_ms: f64,
}

impl LatencyRecord {
    pub fn new(node: impl Into<String>, ttft_ms: f64) -> Self {
        Self {
            timestamp: now_timestamp(),
            node: node.into(),
            ttft_ms,
        }
    }
}
