// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Thalamus query router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};
use thalamus_core::{Node, Tier};

/// Top-level Thalamus configuration.
///
/// Built once at process start and passed by reference to every stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThalamusConfig {
    /// Process-wide settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Fast tier: triage classifier and simple queries.
    #[serde(default = "default_cerebellum")]
    pub cerebellum: NodeConfig,

    /// Heavy tier: complex queries.
    #[serde(default = "default_cortex")]
    pub cortex: NodeConfig,

    /// Generation API settings shared by both tiers.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Durable CSV log locations.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Latency benchmark settings.
    #[serde(default)]
    pub bench: BenchConfig,
}

impl Default for ThalamusConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            cerebellum: default_cerebellum(),
            cortex: default_cortex(),
            ollama: OllamaConfig::default(),
            ledger: LedgerConfig::default(),
            bench: BenchConfig::default(),
        }
    }
}

impl ThalamusConfig {
    /// Section for the node serving the given tier.
    pub fn node_config(&self, tier: Tier) -> &NodeConfig {
        match tier {
            Tier::Fast => &self.cerebellum,
            Tier::Heavy => &self.cortex,
        }
    }

    /// Resolved node (address + shared port + model) for the given tier.
    pub fn node(&self, tier: Tier) -> Node {
        self.node_config(tier).to_node(self.ollama.port)
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One inference node.
///
/// The host has no compiled default; it must come from a config file or from
/// `CORTEX_IP` / `CEREBELLUM_IP`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Name recorded in the routing log's `Target_Node` column.
    #[serde(default)]
    pub name: String,

    /// Hostname or IP address of the node.
    #[serde(default)]
    pub host: String,

    /// Model identifier requested from the node.
    #[serde(default)]
    pub model: String,
}

impl NodeConfig {
    pub fn to_node(&self, port: u16) -> Node {
        Node::new(&self.name, &self.host, port, &self.model)
    }
}

fn default_cerebellum() -> NodeConfig {
    NodeConfig {
        name: "Cerebellum".to_string(),
        host: String::new(),
        model: "llama3.2:3b".to_string(),
    }
}

fn default_cortex() -> NodeConfig {
    NodeConfig {
        name: "Cortex".to_string(),
        host: String::new(),
        model: "llama3.1:8b".to_string(),
    }
}

/// Generation API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// Port of the generation API on both nodes.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Ceiling for a whole generation call, body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ceiling for a `/api/tags` health probe.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
        }
    }
}

fn default_port() -> u16 {
    11434
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    5
}

/// Durable CSV log locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// One row per routed query.
    #[serde(default = "default_routing_log")]
    pub routing_log: String,

    /// One row per benchmark run.
    #[serde(default = "default_latency_log")]
    pub latency_log: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            routing_log: default_routing_log(),
            latency_log: default_latency_log(),
        }
    }
}

fn default_routing_log() -> String {
    "experiments/routing_stats.csv".to_string()
}

fn default_latency_log() -> String {
    "experiments/latency_log.csv".to_string()
}

/// Latency benchmark settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Prompt sent when measuring time-to-first-token.
    #[serde(default = "default_bench_prompt")]
    pub prompt: String,

    /// Ceiling for a benchmark call.
    #[serde(default = "default_bench_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            prompt: default_bench_prompt(),
            timeout_secs: default_bench_timeout_secs(),
        }
    }
}

fn default_bench_prompt() -> String {
    "Hello, are you ready?".to_string()
}

fn default_bench_timeout_secs() -> u64 {
    10
}
