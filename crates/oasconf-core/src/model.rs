//! # Harness Data Model
//!
//! Types shared across the corpus client, validation runner, regression
//! tracker, and report builder. Wire shapes use camelCase field names so
//! that the baseline failures file and the updated-failures artifact stay
//! interchangeable across runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The corpus as fetched from the directory service, keyed by document name.
///
/// A `BTreeMap` keeps iteration order deterministic (sorted by name), which
/// in turn makes progress output and report ordering reproducible for a
/// fixed sample. Ordering is a debugging convenience, not a contract.
pub type CorpusMap = BTreeMap<String, CorpusEntry>;

/// Failing documents of a run, keyed by document name.
pub type FailureMap = BTreeMap<String, FailureRecord>;

/// One API document in the corpus directory listing.
///
/// Immutable once constructed from the listing; the name is unique within a
/// single corpus snapshot (it is the listing key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusEntry {
    /// Directory key, e.g. `"apis.guru"` or `"amazonaws.com:ec2"`.
    pub name: String,
    /// The preferred API version label for this document.
    pub api_version: String,
    /// Declared OpenAPI version of the preferred document, e.g. `"3.0.0"`.
    pub open_api_version: String,
    /// URL of the YAML rendition of the document.
    pub yaml_url: String,
    /// URL of the JSON rendition of the document.
    pub json_url: String,
    /// Browsable source URL; error deep links append a `#L<line>` anchor.
    pub source_browse_url: String,
    /// When the directory last saw this document change.
    pub updated: DateTime<Utc>,
}

/// Result of validating one document, as returned by the validator seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// True when the document conforms; `errors` is empty in that case.
    pub valid: bool,
    /// Validator findings, in the order the validator reported them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl ValidationOutcome {
    /// A passing outcome with no findings.
    pub fn passed() -> Self {
        Self { valid: true, errors: Vec::new() }
    }

    /// A failing outcome carrying the given findings.
    pub fn failed(errors: Vec<ValidationError>) -> Self {
        Self { valid: false, errors }
    }
}

/// A single validator finding, augmented in place by the annotation step.
///
/// `instance_path` and `message` come from the validator. The remaining
/// fields are filled by the source locator after validation and are
/// explicitly excluded from regression equality (see
/// [`crate::regression`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// JSON-Pointer into the document; `""` refers to the document root.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// Whether `instance_value` holds the actual value at the path.
    #[serde(default)]
    pub has_instance_value: bool,
    /// The value at the instance path, or a sentinel/diagnostic string when
    /// `has_instance_value` is false.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub instance_value: Value,
    /// Deep link into the browsable source with a `#L<line>` anchor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_url: String,
}

impl ValidationError {
    /// A bare finding as the validator reports it, before annotation.
    pub fn new(instance_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            instance_path: instance_path.into(),
            message: message.into(),
            has_instance_value: false,
            instance_value: Value::Null,
            source_url: String::new(),
        }
    }
}

/// A failing document: its corpus entry, the annotated outcome, and the
/// regression classification.
///
/// A record exists if and only if `result.valid` is false; passing
/// documents are never recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    /// The corpus entry the failure belongs to, inlined into the record.
    #[serde(flatten)]
    pub entry: CorpusEntry,
    /// The (annotated) validation outcome; always invalid.
    pub result: ValidationOutcome,
    /// True when the baseline holds an identical error sequence for this
    /// document.
    #[serde(default)]
    pub known_failure: bool,
}

/// Monotonic per-run counters, one instance per run, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    /// Number of documents in the sampled corpus.
    pub total: usize,
    /// Documents processed so far.
    pub current: usize,
    /// Documents that validated cleanly.
    pub valid: usize,
    /// Documents with at least one finding.
    pub invalid: usize,
    /// Invalid documents whose findings match the baseline exactly.
    pub known_failed: usize,
}

impl RunStats {
    /// Counters for a run over `total` documents, everything else zeroed.
    pub fn for_total(total: usize) -> Self {
        Self { total, ..Self::default() }
    }
}
