// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing scenarios against a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use thalamus_agent::Orchestrator;
use thalamus_core::{Decision, ThalamusError};
use thalamus_ledger::RoutingLedger;
use thalamus_router::Ambiguity;
use thalamus_test_utils::{MockBackend, TestEnv};

fn orchestrator(env: &TestEnv, backend: MockBackend) -> (Orchestrator, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    (Orchestrator::from_config(&env.config, backend.clone()), backend)
}

async fn logged_rows(env: &TestEnv) -> Vec<thalamus_core::LogRecord> {
    RoutingLedger::new(env.routing_log()).read_all().await.unwrap()
}

#[tokio::test]
async fn simple_query_goes_to_fast_tier() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, backend) = orchestrator(
        &env,
        MockBackend::new()
            .with_reply("Cerebellum", "SIMPLE")
            .with_reply("Cerebellum", "4"),
    );

    let report = orchestrator.route("What is 2 + 2?").await;

    assert_eq!(report.decision(), Decision::Simple);
    assert_eq!(report.target.name, "Cerebellum");
    assert_eq!(report.text(), "4");
    assert!(report.persisted.is_ok());

    // Classifier call first, then the query itself, both on the fast node.
    let calls = backend.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[0].prompt.ends_with("Query: What is 2 + 2?"));
    assert_eq!(calls[1].prompt, "What is 2 + 2?");
    assert!(calls.iter().all(|c| c.node == "Cerebellum"));

    let rows = logged_rows(&env).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].query, "What is 2 + 2?");
    assert_eq!(rows[0].decision, Decision::Simple);
    assert_eq!(rows[0].target_node, "Cerebellum");
    assert_eq!(rows[0].class_ttft_ms, 5.0);
    assert_eq!(rows[0].exec_ttft_ms, 5.0);
}

#[tokio::test]
async fn complex_query_goes_to_heavy_tier() {
    let env = TestEnv::new().unwrap();
    let query = "Explain the impact of the printing press on the Reformation.";
    let (orchestrator, backend) = orchestrator(
        &env,
        MockBackend::new()
            .with_reply("Cerebellum", "COMPLEX")
            .with_reply("Cortex", "It spread pamphlets..."),
    );

    let report = orchestrator.route(query).await;

    assert_eq!(report.decision(), Decision::Complex);
    assert_eq!(report.target.name, "Cortex");
    assert_eq!(report.target.model, "llama3.1:8b");
    assert_eq!(report.text(), "It spread pamphlets...");
    assert_eq!(backend.calls_to("Cortex").await[0].prompt, query);
    assert_eq!(report.record.target_node, "Cortex");
}

#[tokio::test]
async fn classifier_timeout_falls_back_to_heavy_tier_and_logs() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(
        &env,
        MockBackend::new()
            .with_failure(
                "Cerebellum",
                ThalamusError::Timeout {
                    node: "Cerebellum".into(),
                    duration: Duration::from_secs(60),
                },
            )
            .with_reply("Cortex", "answer"),
    );

    let report = orchestrator.route("anything").await;

    assert_eq!(report.decision(), Decision::Complex);
    assert_eq!(report.classification.ambiguity, Some(Ambiguity::BackendFailure));
    assert_eq!(report.classification.ttft_ms, 0.0);
    assert_eq!(report.target.name, "Cortex");

    let rows = logged_rows(&env).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].class_ttft_ms, 0.0);
    assert_eq!(rows[0].target_node, "Cortex");
}

#[tokio::test]
async fn silent_dispatch_still_logs_a_row() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(
        &env,
        MockBackend::new()
            .with_reply("Cerebellum", "COMPLEX")
            .with_silence("Cortex"),
    );

    let report = orchestrator.route("Write a sonnet").await;

    assert_eq!(report.text(), "");
    assert_eq!(report.record.exec_ttft_ms, 0.0);
    assert!(report.persisted.is_ok());
    assert_eq!(logged_rows(&env).await.len(), 1);
}

#[tokio::test]
async fn dispatch_failure_still_logs_a_row() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(
        &env,
        MockBackend::new()
            .with_reply("Cerebellum", "simple.")
            .with_failure(
                "Cerebellum",
                ThalamusError::Protocol {
                    node: "Cerebellum".into(),
                    message: "API returned 500".into(),
                },
            ),
    );

    let report = orchestrator.route("hello").await;

    assert_eq!(report.decision(), Decision::Simple);
    assert_eq!(report.text(), "");
    assert_eq!(logged_rows(&env).await[0].exec_ttft_ms, 0.0);
}

#[tokio::test]
async fn ambiguous_answer_routes_complex() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(
        &env,
        MockBackend::new().with_reply("Cerebellum", "maybe"),
    );

    let report = orchestrator.route("hmm").await;
    assert_eq!(report.decision(), Decision::Complex);
    assert_eq!(report.classification.ambiguity, Some(Ambiguity::NoKeyword));
    assert_eq!(report.target.name, "Cortex");
}

#[tokio::test]
async fn empty_query_is_routed() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, backend) = orchestrator(&env, MockBackend::new());

    let report = orchestrator.route("").await;
    assert!(report.persisted.is_ok());
    assert_eq!(backend.calls().await.len(), 2);
    assert_eq!(logged_rows(&env).await[0].query, "");
}

#[tokio::test]
async fn ledger_failure_is_reported_not_raised() {
    let env = TestEnv::new().unwrap();
    let mut config = env.config.clone();
    // A directory cannot be opened for appending.
    config.ledger.routing_log = env.dir().display().to_string();

    let backend = Arc::new(MockBackend::new().with_reply("Cerebellum", "SIMPLE"));
    let orchestrator = Orchestrator::from_config(&config, backend);

    let report = orchestrator.route("What is 2 + 2?").await;
    assert!(matches!(report.persisted, Err(ThalamusError::Persistence { .. })));
    assert_eq!(report.decision(), Decision::Simple);
    assert_eq!(report.text(), "mock response");
}

#[tokio::test]
async fn batch_keeps_input_order_and_logs_every_query() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(
        &env,
        MockBackend::new()
            .with_reply("Cerebellum", "SIMPLE")
            .with_delayed_reply("Cerebellum", Duration::from_millis(50), "slow fast answer")
            .with_reply("Cerebellum", "COMPLEX")
            .with_reply("Cortex", "heavy answer"),
    );

    let queries = vec!["What is 2 + 2?".to_string(), "Explain recursion.".to_string()];
    let reports = orchestrator.route_batch(queries, 1).await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].record.query, "What is 2 + 2?");
    assert_eq!(reports[0].text(), "slow fast answer");
    assert_eq!(reports[1].target.name, "Cortex");
    assert_eq!(reports[1].text(), "heavy answer");
    assert_eq!(logged_rows(&env).await.len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batch_writes_one_row_per_query() {
    let env = TestEnv::new().unwrap();
    let (orchestrator, _) = orchestrator(&env, MockBackend::new());

    let queries: Vec<String> = (0..20).map(|i| format!("query {i}")).collect();
    let reports = orchestrator.route_batch(queries, 8).await;

    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.record.query, format!("query {i}"));
        // Default mock text has no keyword.
        assert_eq!(report.decision(), Decision::Complex);
    }
    assert_eq!(logged_rows(&env).await.len(), 20);
}
