// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing pipeline for the Thalamus query router.
//!
//! [`Orchestrator`] runs classify, dispatch and log for each query and never
//! returns an error for a single query: every failure is folded into the
//! [`RouteReport`].

pub mod pipeline;
pub mod recording;

pub use pipeline::{Orchestrator, RouteReport, Stage};
