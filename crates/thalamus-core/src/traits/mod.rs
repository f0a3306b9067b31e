// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams between the router and its backends.
//!
//! Traits use `#[async_trait]` so they stay object safe behind `Arc<dyn _>`.

pub mod backend;

pub use backend::GenerationBackend;
