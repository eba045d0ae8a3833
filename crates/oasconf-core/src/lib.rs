//! # oasconf-core — Conformance Harness Core
//!
//! Pure building blocks for the real-world OpenAPI conformance harness:
//!
//! - [`model`] — corpus entries, validation outcomes, failure records, and
//!   run counters, with the wire shapes used by the baseline file.
//! - [`locator`] — best-effort resolution of a JSON-Pointer instance path
//!   to a 1-based line number and the value it points at in raw YAML text.
//! - [`sampler`] — uniform without-replacement corpus subset selection.
//! - [`regression`] — baseline loading and known-failure classification.
//! - [`report`] — deterministic markdown and JSON rendering of failures.
//! - [`yaml`] — YAML-to-JSON value conversion for the JSON-compatible
//!   subset used by API description documents.
//!
//! ## Crate Policy
//!
//! No network and no validator dependency lives here. Everything in this
//! crate is deterministic given its inputs (the sampler takes its RNG from
//! the caller's process, but draws uniformly without replacement), so the
//! algorithmically delicate parts — line locating, sampling, regression
//! equality — can be tested without HTTP or schema machinery.

pub mod locator;
pub mod model;
pub mod regression;
pub mod report;
pub mod sampler;
pub mod yaml;

pub use model::{
    CorpusEntry, CorpusMap, FailureMap, FailureRecord, RunStats, ValidationError,
    ValidationOutcome,
};
pub use regression::BaselineMap;
