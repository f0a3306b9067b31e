// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Thalamus query router.

use thiserror::Error;

/// The primary error type used across backend traits and core operations.
///
/// Every network-facing variant carries the name of the node it concerns so
/// that log lines and reports can attribute failures to a tier.
#[derive(Debug, Error)]
pub enum ThalamusError {
    /// Configuration errors (invalid TOML, missing hosts, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The node refused the connection or the transport failed.
    #[error("connection to {node} failed: {source}")]
    Connection {
        node: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The call exceeded its fixed ceiling.
    #[error("call to {node} timed out after {duration:?}")]
    Timeout {
        node: String,
        duration: std::time::Duration,
    },

    /// The node answered with something other than a success status.
    #[error("protocol error from {node}: {message}")]
    Protocol { node: String, message: String },

    /// Appending to a durable log failed.
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ThalamusError {
    /// Name of the node this error is attributed to, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            ThalamusError::Connection { node, .. }
            | ThalamusError::Timeout { node, .. }
            | ThalamusError::Protocol { node, .. } => Some(node),
            _ => None,
        }
    }
}
