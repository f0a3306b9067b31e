// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable CSV logs for routing outcomes and latency benchmarks.
//!
//! Every record is appended as one CSV row; the header is written when the
//! file is created. Existing rows are never rewritten.

pub mod ledger;

pub use ledger::{CsvLedger, LatencyLedger, RoutingLedger};
