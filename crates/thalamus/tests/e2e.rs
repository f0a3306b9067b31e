// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing through the real Ollama client against a mock node.
//!
//! Both tiers point at the same mock server; requests are told apart by
//! model and prompt.

use std::sync::Arc;

use thalamus_agent::Orchestrator;
use thalamus_core::Decision;
use thalamus_ledger::RoutingLedger;
use thalamus_ollama::OllamaClient;
use thalamus_test_utils::TestEnv;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ndjson(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/x-ndjson")
}

fn env_for(server: &MockServer) -> TestEnv {
    let mut env = TestEnv::new().unwrap();
    env.config.cerebellum.host = "127.0.0.1".into();
    env.config.cortex.host = "127.0.0.1".into();
    env.config.ollama.port = server.address().port();
    env
}

#[tokio::test]
async fn simple_query_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Respond with ONLY one word"))
        .respond_with(ndjson(
            "{\"response\":\"SIM\",\"done\":false}\n{\"response\":\"PLE\",\"done\":false}\n{\"done\":true}\n",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2:3b",
            "prompt": "What is 2 + 2?"
        })))
        .respond_with(ndjson("{\"response\":\"2 + 2 = 4\",\"done\":true}\n"))
        .expect(1)
        .mount(&server)
        .await;

    let env = env_for(&server);
    let backend = Arc::new(OllamaClient::from_config(&env.config).unwrap());
    let report = Orchestrator::from_config(&env.config, backend)
        .route("What is 2 + 2?")
        .await;

    assert_eq!(report.decision(), Decision::Simple);
    assert_eq!(report.target.name, "Cerebellum");
    assert_eq!(report.text(), "2 + 2 = 4");
    assert!(report.record.class_ttft_ms > 0.0);
    assert!(report.record.exec_ttft_ms > 0.0);

    let rows = RoutingLedger::new(env.routing_log()).read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target_node, "Cerebellum");
}

#[tokio::test]
async fn failing_classifier_routes_to_heavy_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains("Respond with ONLY one word"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({"model": "llama3.1:8b"})))
        .respond_with(ndjson("{\"response\":\"A long essay.\",\"done\":true}\n"))
        .expect(1)
        .mount(&server)
        .await;

    let env = env_for(&server);
    let backend = Arc::new(OllamaClient::from_config(&env.config).unwrap());
    let report = Orchestrator::from_config(&env.config, backend)
        .route("Explain the impact of the printing press on the Reformation.")
        .await;

    assert_eq!(report.decision(), Decision::Complex);
    assert_eq!(report.target.name, "Cortex");
    assert_eq!(report.record.class_ttft_ms, 0.0);
    assert_eq!(report.text(), "A long essay.");
}

#[tokio::test]
async fn unreachable_nodes_still_produce_a_row() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut env = TestEnv::new().unwrap();
    env.config.cerebellum.host = "127.0.0.1".into();
    env.config.cortex.host = "127.0.0.1".into();
    env.config.ollama.port = port;

    let backend = Arc::new(OllamaClient::from_config(&env.config).unwrap());
    let report = Orchestrator::from_config(&env.config, backend).route("hello").await;

    assert_eq!(report.decision(), Decision::Complex);
    assert_eq!(report.text(), "");
    assert!(report.persisted.is_ok());

    let rows = RoutingLedger::new(env.routing_log()).read_all().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].class_ttft_ms, 0.0);
    assert_eq!(rows[0].exec_ttft_ms, 0.0);
}
