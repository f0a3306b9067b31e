// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Thalamus query router.
//!
//! This crate provides the error type, the domain types exchanged between
//! routing stages, and the [`GenerationBackend`] trait implemented by
//! inference adapters.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ThalamusError;
pub use traits::GenerationBackend;
pub use types::{
    Decision, FirstTokenClock, HealthStatus, LatencyRecord, LogRecord, Node, StreamResult, Tier,
};
