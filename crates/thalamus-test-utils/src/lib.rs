// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Thalamus integration tests.
//!
//! Provides a scripted generation backend and a throwaway configuration so
//! routing tests run without any inference node.
//!
//! # Components
//!
//! - [`MockBackend`] - scripted per-node replies, records every call
//! - [`TestEnv`] - configuration whose ledgers live in a temp directory

pub mod harness;
pub mod mock_backend;

pub use harness::TestEnv;
pub use mock_backend::{MockBackend, MockCall};
