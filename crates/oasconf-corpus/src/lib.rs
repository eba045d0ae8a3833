//! # oasconf-corpus — Corpus Directory Client
//!
//! Retrieves the real-world API corpus: one GET for the directory listing
//! (document names and per-version metadata) and one GET per sampled
//! document for its raw YAML text.
//!
//! ## Error Handling
//!
//! Every transport fault and every non-2xx response is a [`CorpusError`]
//! carrying the endpoint for diagnostics. The harness imposes no retries
//! and no timeouts of its own; a failed fetch aborts the whole run and the
//! operator re-invokes it.

pub mod client;

pub use client::{CorpusClient, CorpusError, APIS_GURU_LIST_URL};
