// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-based query triage.
//!
//! Asks the fast node to label a query SIMPLE or COMPLEX and reduces its free
//! text answer to a [`Decision`]. Anything that is not a clean SIMPLE routes
//! to the heavy tier.

use strum::Display;
use thalamus_core::{Decision, GenerationBackend, Node, StreamResult};
use tracing::{debug, warn};

/// Instruction block placed before the query.
pub const CLASSIFY_INSTRUCTIONS: &str = "Classify the following query as either 'SIMPLE' or 'COMPLEX'. \
SIMPLE: Factual questions, math, definitions, greetings. \
COMPLEX: Reasoning, coding, creative writing, analysis, multi-step problems. \
Respond with ONLY one word: SIMPLE or COMPLEX.";

const SIMPLE: &str = "SIMPLE";
const COMPLEX: &str = "COMPLEX";

/// Why a classification fell back to COMPLEX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Ambiguity {
    /// The answer contained neither keyword.
    NoKeyword,
    /// The answer contained both keywords.
    BothKeywords,
    /// The classifier call failed outright.
    BackendFailure,
}

/// Outcome of the classifier stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub decision: Decision,
    /// Time to the classifier's first chunk; 0 when nothing arrived.
    pub ttft_ms: f64,
    /// The classifier's answer after [`normalize`].
    pub normalized: String,
    pub ambiguity: Option<Ambiguity>,
}

/// Build the triage prompt with the query embedded verbatim.
pub fn classification_prompt(query: &str) -> String {
    format!("{CLASSIFY_INSTRUCTIONS}\n\nQuery: {query}")
}

/// Uppercase, trim, and strip trailing punctuation.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase()
        .trim_start()
        .trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .to_string()
}

/// Map a normalized answer onto a decision.
///
/// SIMPLE wins only when COMPLEX is absent.
pub fn decide(normalized: &str) -> (Decision, Option<Ambiguity>) {
    let simple = normalized.contains(SIMPLE);
    let complex = normalized.contains(COMPLEX);

    match (simple, complex) {
        (true, false) => (Decision::Simple, None),
        (true, true) => (Decision::Complex, Some(Ambiguity::BothKeywords)),
        (false, true) => (Decision::Complex, None),
        (false, false) => (Decision::Complex, Some(Ambiguity::NoKeyword)),
    }
}

/// Classifier stage bound to the fast node.
#[derive(Debug, Clone)]
pub struct Classifier {
    node: Node,
}

impl Classifier {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    /// Node the triage prompt is sent to.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Classify one query. Never fails; failures resolve to COMPLEX.
    pub async fn classify(&self, backend: &dyn GenerationBackend, query: &str) -> Classification {
        let prompt = classification_prompt(query);

        let (result, failed) = match backend.generate(&self.node, &prompt).await {
            Ok(result) => (result, false),
            Err(e) => {
                warn!(node = %self.node.name, error = %e, "classifier call failed");
                (StreamResult::empty(), true)
            }
        };

        let normalized = normalize(&result.text);
        let (decision, ambiguity) = if failed {
            (Decision::Complex, Some(Ambiguity::BackendFailure))
        } else {
            decide(&normalized)
        };

        match ambiguity {
            Some(reason) => warn!(
                node = %self.node.name,
                reason = %reason,
                answer = %normalized,
                "ambiguous classification, defaulting to COMPLEX"
            ),
            None => debug!(node = %self.node.name, decision = %decision, "query classified"),
        }

        Classification {
            decision,
            ttft_ms: result.ttft_ms(),
            normalized,
            ambiguity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use thalamus_core::ThalamusError;
    use thalamus_test_utils::MockBackend;

    fn fast_node() -> Node {
        Node::new("Cerebellum", "10.0.0.1", 11434, "llama3.2:3b")
    }

    #[test]
    fn prompt_embeds_query_verbatim() {
        let prompt = classification_prompt("What is 2 + 2?");
        assert!(prompt.starts_with("Classify the following query as either 'SIMPLE' or 'COMPLEX'."));
        assert!(prompt.contains("Respond with ONLY one word: SIMPLE or COMPLEX."));
        assert!(prompt.ends_with("\n\nQuery: What is 2 + 2?"));
    }

    #[test]
    fn prompt_keeps_empty_query() {
        assert!(classification_prompt("").ends_with("Query: "));
    }

    #[test]
    fn normalize_strips_case_space_and_punctuation() {
        assert_eq!(normalize("  simple.\n"), "SIMPLE");
        assert_eq!(normalize("Complex!!"), "COMPLEX");
        assert_eq!(normalize("simple or complex?"), "SIMPLE OR COMPLEX");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn decide_table() {
        assert_eq!(decide(&normalize("SIMPLE.")), (Decision::Simple, None));
        assert_eq!(decide(&normalize("I think COMPLEX")), (Decision::Complex, None));
        assert_eq!(
            decide(&normalize("simple or complex?")),
            (Decision::Complex, Some(Ambiguity::BothKeywords))
        );
        assert_eq!(
            decide(&normalize("maybe")),
            (Decision::Complex, Some(Ambiguity::NoKeyword))
        );
        assert_eq!(decide("SIMPLECOMPLEX").0, Decision::Complex);
    }

    #[tokio::test]
    async fn simple_answer_routes_simple() {
        let backend = MockBackend::new().with_reply("Cerebellum", "Simple");
        let classifier = Classifier::new(fast_node());

        let outcome = classifier.classify(&backend, "What is 2 + 2?").await;
        assert_eq!(outcome.decision, Decision::Simple);
        assert!(outcome.ambiguity.is_none());
        assert!(outcome.ttft_ms > 0.0);

        let calls = backend.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "llama3.2:3b");
        assert_eq!(calls[0].prompt, classification_prompt("What is 2 + 2?"));
    }

    #[tokio::test]
    async fn backend_failure_defaults_to_complex() {
        let backend = MockBackend::new().with_failure(
            "Cerebellum",
            ThalamusError::Timeout {
                node: "Cerebellum".into(),
                duration: std::time::Duration::from_secs(60),
            },
        );
        let outcome = Classifier::new(fast_node()).classify(&backend, "q").await;
        assert_eq!(outcome.decision, Decision::Complex);
        assert_eq!(outcome.ambiguity, Some(Ambiguity::BackendFailure));
        assert_eq!(outcome.ttft_ms, 0.0);
    }

    #[tokio::test]
    async fn silent_classifier_is_ambiguous() {
        let backend = MockBackend::new().with_silence("Cerebellum");
        let outcome = Classifier::new(fast_node()).classify(&backend, "q").await;
        assert_eq!(outcome.decision, Decision::Complex);
        assert_eq!(outcome.ambiguity, Some(Ambiguity::NoKeyword));
        assert_eq!(outcome.ttft_ms, 0.0);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[a-zA-Z0-9 .,!?;:'\"\\-\n\t]{0,48}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn decision_is_always_resolved(raw in "\\PC{0,48}") {
            let (decision, ambiguity) = decide(&normalize(&raw));
            if decision == Decision::Simple {
                prop_assert!(ambiguity.is_none());
            }
        }
    }
}
