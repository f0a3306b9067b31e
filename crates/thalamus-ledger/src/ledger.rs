// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only CSV ledger.
//!
//! A row (plus the header for a new file) is encoded into memory first, then
//! written with a single `write_all` to a file opened in append mode. Appends
//! from one ledger are serialized by an async mutex held only for the
//! open-write-close, so rows from concurrent pipelines never interleave.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thalamus_config::ThalamusConfig;
use thalamus_core::{LatencyRecord, LogRecord, ThalamusError};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Ledger of routed queries (`Timestamp,Query,Classification,...`).
pub type RoutingLedger = CsvLedger<LogRecord>;

/// Ledger of benchmark measurements (`Timestamp,Node,TTFT_ms`).
pub type LatencyLedger = CsvLedger<LatencyRecord>;

/// CSV file holding one serialized `R` per row.
///
/// Column names come from the serde field names of `R`.
#[derive(Debug)]
pub struct CsvLedger<R> {
    path: PathBuf,
    lock: Mutex<()>,
    _row: PhantomData<fn(R)>,
}

impl<R> CsvLedger<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoutingLedger {
    pub fn from_config(config: &ThalamusConfig) -> Self {
        Self::new(&config.ledger.routing_log)
    }
}

impl LatencyLedger {
    pub fn from_config(config: &ThalamusConfig) -> Self {
        Self::new(&config.ledger.latency_log)
    }
}

impl<R: Serialize> CsvLedger<R> {
    /// Append one row, creating the file, its header and its parent
    /// directory on first write.
    pub async fn append(&self, row: &R) -> Result<(), ThalamusError> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(persistence)?;
        }

        let needs_header = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(persistence(e)),
        };

        let bytes = encode(row, needs_header)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(persistence)?;
        file.write_all(&bytes).await.map_err(persistence)?;
        file.flush().await.map_err(persistence)?;

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            header = needs_header,
            "ledger row appended"
        );
        Ok(())
    }
}

impl<R: DeserializeOwned> CsvLedger<R> {
    /// Read every row back. A missing file reads as empty.
    pub async fn read_all(&self) -> Result<Vec<R>, ThalamusError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(persistence(e)),
        };

        csv::Reader::from_reader(bytes.as_slice())
            .deserialize()
            .collect::<Result<Vec<R>, csv::Error>>()
            .map_err(persistence)
    }
}

fn encode<R: Serialize>(row: &R, with_header: bool) -> Result<Vec<u8>, ThalamusError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());
    writer.serialize(row).map_err(persistence)?;
    writer
        .into_inner()
        .map_err(|e| persistence(e.into_error()))
}

fn persistence<E>(e: E) -> ThalamusError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ThalamusError::Persistence {
        source: Box::new(e),
    }
}
