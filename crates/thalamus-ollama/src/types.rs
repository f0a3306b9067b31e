// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Ollama generation API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

/// One newline-delimited JSON object from a streaming generation response.
///
/// Only `response` and `done` drive routing. The timing fields are present on
/// the final chunk and are kept for logging. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateChunk {
    /// Text fragment carried by this chunk.
    #[serde(default)]
    pub response: Option<String>,
    /// Completion flag; `true` on the last chunk.
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Encoded conversation state, returned with the final chunk.
    #[serde(default)]
    pub context: Option<Vec<i64>>,
    /// Durations are reported by Ollama in nanoseconds.
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub load_duration: Option<u64>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub eval_duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_stream_flag() {
        let req = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "hi",
            stream: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "llama3.2:3b", "prompt": "hi", "stream": true})
        );
    }

    #[test]
    fn intermediate_chunk_parses() {
        let chunk: GenerateChunk = serde_json::from_str(
            r#"{"model":"llama3.1:8b","created_at":"2024-01-01T00:00:00Z","response":"Hel","done":false}"#,
        )
        .unwrap();
        assert_eq!(chunk.response.as_deref(), Some("Hel"));
        assert!(!chunk.done);
        assert!(chunk.eval_count.is_none());
    }

    #[test]
    fn final_chunk_carries_timings() {
        let chunk: GenerateChunk = serde_json::from_str(
            r#"{"response":"","done":true,"done_reason":"stop","context":[1,2,3],
                "total_duration":5000000,"load_duration":100,"prompt_eval_count":12,
                "prompt_eval_duration":200,"eval_count":7,"eval_duration":300}"#,
        )
        .unwrap();
        assert!(chunk.done);
        assert_eq!(chunk.context, Some(vec![1, 2, 3]));
        assert_eq!(chunk.total_duration, Some(5_000_000));
        assert_eq!(chunk.eval_count, Some(7));
    }

    #[test]
    fn empty_object_is_a_valid_chunk() {
        let chunk: GenerateChunk = serde_json::from_str("{}").unwrap();
        assert_eq!(chunk, GenerateChunk::default());
    }
}
