// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throwaway configuration for routing tests.

use std::path::PathBuf;

use tempfile::TempDir;
use thalamus_config::ThalamusConfig;

/// A validated-looking configuration whose ledgers live in a temp directory.
///
/// The directory is removed when the `TestEnv` is dropped.
pub struct TestEnv {
    pub config: ThalamusConfig,
    dir: TempDir,
}

impl TestEnv {
    /// Build a config pointing both tiers at loopback.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;

        let mut config = ThalamusConfig::default();
        config.cerebellum.host = "127.0.0.1".to_string();
        config.cortex.host = "127.0.0.2".to_string();
        config.ledger.routing_log = dir
            .path()
            .join("experiments")
            .join("routing_stats.csv")
            .display()
            .to_string();
        config.ledger.latency_log = dir
            .path()
            .join("experiments")
            .join("latency_log.csv")
            .display()
            .to_string();

        tracing::debug!(dir = %dir.path().display(), "test environment created");
        Ok(Self { config, dir })
    }

    pub fn routing_log(&self) -> PathBuf {
        PathBuf::from(&self.config.ledger.routing_log)
    }

    pub fn latency_log(&self) -> PathBuf {
        PathBuf::from(&self.config.ledger.latency_log)
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}
