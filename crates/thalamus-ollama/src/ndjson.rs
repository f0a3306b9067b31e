// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Newline-delimited JSON parser for Ollama streaming responses.
//!
//! Converts a response byte stream into typed [`GenerateChunk`]s. Network
//! reads may split a line anywhere, so bytes are buffered until a newline
//! arrives. Lines that are not valid chunks are skipped.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use thalamus_core::ThalamusError;
use tracing::debug;

use crate::client::transport_error;
use crate::types::GenerateChunk;

/// Stream of parsed chunks; an `Err` item is always the last one.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerateChunk, ThalamusError>> + Send>>;

/// Parse a byte stream into generation chunks.
///
/// `node` and `timeout` only label transport errors raised mid-body.
pub fn parse_ndjson_stream<S>(bytes: S, node: String, timeout: Duration) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
{
    let reader = LineReader {
        bytes: Box::pin(bytes),
        buffer: Vec::new(),
        open: true,
        node,
        timeout,
    };

    Box::pin(stream::unfold(reader, |mut reader| async move {
        reader.next_chunk().await.map(|item| (item, reader))
    }))
}

struct LineReader<S> {
    bytes: Pin<Box<S>>,
    buffer: Vec<u8>,
    open: bool,
    node: String,
    timeout: Duration,
}

impl<S> LineReader<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send,
{
    async fn next_chunk(&mut self) -> Option<Result<GenerateChunk, ThalamusError>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=pos).collect();
                if let Some(chunk) = parse_line(&self.node, &line) {
                    return Some(Ok(chunk));
                }
                continue;
            }

            if !self.open {
                // Body ended without a final newline.
                if self.buffer.is_empty() {
                    return None;
                }
                let line = std::mem::take(&mut self.buffer);
                return parse_line(&self.node, &line).map(Ok);
            }

            match self.bytes.next().await {
                Some(Ok(bytes)) => self.buffer.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    self.open = false;
                    self.buffer.clear();
                    return Some(Err(transport_error(&self.node, self.timeout, e)));
                }
                None => self.open = false,
            }
        }
    }
}

fn parse_line(node: &str, line: &[u8]) -> Option<GenerateChunk> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_slice::<GenerateChunk>(line) {
        Ok(chunk) => Some(chunk),
        Err(e) => {
            debug!(node, error = %e, "skipping malformed chunk");
            None
        }
    }
}
