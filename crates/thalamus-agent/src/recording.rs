// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; nothing is collected unless the host process
//! installs a recorder.

use metrics::{describe_counter, describe_histogram};
use thalamus_core::Decision;
use thalamus_router::Ambiguity;

/// Register all Thalamus metric descriptions.
pub fn register_metrics() {
    describe_counter!("thalamus_routed_total", "Queries routed, by decision");
    describe_counter!(
        "thalamus_ambiguous_classifications_total",
        "Classifications that fell back to COMPLEX"
    );
    describe_counter!(
        "thalamus_ledger_failures_total",
        "Routing records that could not be persisted"
    );
    describe_histogram!("thalamus_ttft_ms", "Time to first token in milliseconds, by stage");
}

pub fn record_routed(decision: Decision) {
    metrics::counter!("thalamus_routed_total", "decision" => decision.to_string()).increment(1);
}

pub fn record_ambiguity(reason: Ambiguity) {
    metrics::counter!("thalamus_ambiguous_classifications_total", "reason" => reason.to_string())
        .increment(1);
}

pub fn record_ledger_failure() {
    metrics::counter!("thalamus_ledger_failures_total").increment(1);
}

pub fn record_ttft(stage: &'static str, ttft_ms: f64) {
    metrics::histogram!("thalamus_ttft_ms", "stage" => stage).record(ttft_ms);
}
