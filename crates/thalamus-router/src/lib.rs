// SPDX-FileCopyrightText: 2026 Thalamus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query classification and dispatch for the Thalamus router.
//!
//! This crate provides:
//! - [`Classifier`]: asks the fast node whether a query is SIMPLE or COMPLEX
//! - [`Dispatcher`]: sends the query to the node the decision maps to
//!
//! Neither stage returns an error; failed calls collapse to empty results
//! and the pipeline keeps going.

pub mod classifier;
pub mod dispatch;

pub use classifier::{classification_prompt, decide, normalize, Ambiguity, Classification, Classifier};
pub use dispatch::{Dispatch, DispatchTable, Dispatcher};
