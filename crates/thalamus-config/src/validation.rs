// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: hosts must be set, ports and
//! timeouts non-zero, node names distinct.

use crate::diagnostic::ConfigError;
use crate::model::{NodeConfig, ThalamusConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &ThalamusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_node("cerebellum", "CEREBELLUM_IP", &config.cerebellum, &mut errors);
    validate_node("cortex", "CORTEX_IP", &config.cortex, &mut errors);

    if !config.cerebellum.name.trim().is_empty()
        && config.cerebellum.name.trim() == config.cortex.name.trim()
    {
        errors.push(ConfigError::validation(format!(
            "cerebellum.name and cortex.name must differ, both are `{}`",
            config.cortex.name
        )));
    }

    if config.ollama.port == 0 {
        errors.push(ConfigError::validation("ollama.port must be non-zero"));
    }
    if config.ollama.timeout_secs == 0 {
        errors.push(ConfigError::validation("ollama.timeout_secs must be at least 1"));
    }
    if config.ollama.probe_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "ollama.probe_timeout_secs must be at least 1",
        ));
    }
    if config.bench.timeout_secs == 0 {
        errors.push(ConfigError::validation("bench.timeout_secs must be at least 1"));
    }

    if config.ledger.routing_log.trim().is_empty() {
        errors.push(ConfigError::validation("ledger.routing_log must not be empty"));
    }
    if config.ledger.latency_log.trim().is_empty() {
        errors.push(ConfigError::validation("ledger.latency_log must not be empty"));
    }

    let level = config.agent.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_node(section: &str, env_var: &str, node: &NodeConfig, errors: &mut Vec<ConfigError>) {
    let host = node.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation(format!(
            "{section}.host must be set (or export {env_var})"
        )));
    } else if !host
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
    {
        errors.push(ConfigError::validation(format!(
            "{section}.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if node.name.trim().is_empty() {
        errors.push(ConfigError::validation(format!(
            "{section}.name must not be empty"
        )));
    }
    if node.model.trim().is_empty() {
        errors.push(ConfigError::validation(format!(
            "{section}.model must not be empty"
        )));
    }
}
