//! # oasconf-harness — Validation Runner
//!
//! Orchestrates a conformance run: corpus listing → sampling → sequential
//! fetch/validate/annotate/classify loop → run outcome. The validator is a
//! seam ([`validator::SpecValidator`]) so the runner can be exercised with
//! stubs, with a JSON-Schema-backed implementation
//! ([`validator::SchemaValidator`]) as the working default.
//!
//! ## Concurrency Model
//!
//! One logical task. Documents are processed strictly sequentially; the
//! only suspension points are the HTTP fetches. Counter updates and
//! progress output are therefore deterministic for a fixed sample.

pub mod runner;
pub mod validator;

pub use runner::{RunConfig, RunError, RunOutcome, Runner, DEFAULT_PERCENTAGE};
pub use validator::{SchemaValidator, SpecValidator, ValidatorError};
