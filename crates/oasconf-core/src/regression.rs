//! # Regression Tracker
//!
//! Classifies each failing document as a known failure (the baseline holds
//! an identical error sequence for it) or as new breakage. Equality is
//! exact and order-sensitive, computed over one canonical serialization so
//! that incidental differences in field presence cannot leak in.
//!
//! The canonical form covers only the fields the validator itself produced
//! (`instancePath`, `message`). The locator annotations
//! (`hasInstanceValue`, `instanceValue`, `sourceUrl`) are excluded on both
//! sides: they describe where a failure is, not what it is, and including
//! them would reclassify every known failure whenever the line heuristic
//! shifts by one.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::model::{FailureRecord, ValidationError};

/// Previously accepted failures, keyed by document name. Loaded once at
/// startup and read-only for the rest of the run.
pub type BaselineMap = BTreeMap<String, FailureRecord>;

/// Error loading the baseline failures file.
#[derive(Error, Debug)]
pub enum BaselineError {
    /// The file exists but could not be read.
    #[error("cannot read baseline file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        source: io::Error,
    },

    /// The file is not a valid baseline document.
    #[error("baseline file {path} is not valid: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Load the baseline failures file.
///
/// A missing file is an empty baseline — the first run of a fresh checkout
/// has nothing accepted yet. Any other read or parse fault is an error; a
/// corrupt baseline silently treated as empty would flag every known
/// failure as new.
pub fn load_baseline(path: &Path) -> Result<BaselineMap, BaselineError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "no baseline file; treating all failures as new");
            return Ok(BaselineMap::new());
        }
        Err(e) => {
            return Err(BaselineError::Io { path: path.display().to_string(), source: e })
        }
    };
    serde_json::from_str(&text)
        .map_err(|e| BaselineError::Parse { path: path.display().to_string(), source: e })
}

/// Is this failure already accepted in the baseline?
///
/// True iff `name` is present and the canonical serialization of the
/// baseline's error sequence is byte-identical to that of `errors`. Any
/// added, removed, reordered, or reworded error yields false.
pub fn is_known_failure(baseline: &BaselineMap, name: &str, errors: &[ValidationError]) -> bool {
    match baseline.get(name) {
        Some(accepted) => canonical_errors(&accepted.result.errors) == canonical_errors(errors),
        None => false,
    }
}

/// Serialize an error sequence to its canonical comparison form.
///
/// Field order is fixed by the struct definition and only validator-owned
/// fields participate, so two equal sequences always produce identical
/// bytes regardless of annotation state.
fn canonical_errors(errors: &[ValidationError]) -> String {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct RawError<'a> {
        instance_path: &'a str,
        message: &'a str,
    }

    let raw: Vec<RawError<'_>> = errors
        .iter()
        .map(|e| RawError { instance_path: &e.instance_path, message: &e.message })
        .collect();
    // Serialization of strings and structs cannot fail.
    serde_json::to_string(&raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CorpusEntry, ValidationOutcome};
    use std::io::Write;

    fn entry(name: &str) -> CorpusEntry {
        CorpusEntry {
            name: name.into(),
            api_version: "1.0".into(),
            open_api_version: "3.0.0".into(),
            yaml_url: format!("https://specs.example/{name}.yaml"),
            json_url: format!("https://specs.example/{name}.json"),
            source_browse_url: format!("https://browse.example/{name}.yaml"),
            updated: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn baseline_with(name: &str, errors: Vec<ValidationError>) -> BaselineMap {
        let mut map = BaselineMap::new();
        map.insert(
            name.to_string(),
            FailureRecord {
                entry: entry(name),
                result: ValidationOutcome::failed(errors),
                known_failure: true,
            },
        );
        map
    }

    fn pets_error() -> ValidationError {
        ValidationError::new("/paths/~1pets/get", "must have required property 'responses'")
    }

    #[test]
    fn identical_errors_are_known() {
        let baseline = baseline_with("foo", vec![pets_error()]);
        assert!(is_known_failure(&baseline, "foo", &[pets_error()]));
    }

    #[test]
    fn annotations_do_not_affect_classification() {
        let baseline = baseline_with("foo", vec![pets_error()]);
        let mut annotated = pets_error();
        annotated.has_instance_value = true;
        annotated.instance_value = serde_json::json!({"summary": "List pets"});
        annotated.source_url = "https://browse.example/foo.yaml#L7".into();
        assert!(is_known_failure(&baseline, "foo", &[annotated]));
    }

    #[test]
    fn absent_name_is_new() {
        let baseline = baseline_with("foo", vec![pets_error()]);
        assert!(!is_known_failure(&baseline, "bar", &[pets_error()]));
    }

    #[test]
    fn changed_message_is_new() {
        let baseline = baseline_with("foo", vec![pets_error()]);
        let changed = ValidationError::new("/paths/~1pets/get", "different message");
        assert!(!is_known_failure(&baseline, "foo", &[changed]));
    }

    #[test]
    fn added_removed_or_reordered_errors_are_new() {
        let second = ValidationError::new("/info", "must have required property 'title'");
        let baseline = baseline_with("foo", vec![pets_error(), second.clone()]);

        assert!(!is_known_failure(&baseline, "foo", &[pets_error()]));
        assert!(!is_known_failure(
            &baseline,
            "foo",
            &[pets_error(), second.clone(), pets_error()]
        ));
        assert!(!is_known_failure(&baseline, "foo", &[second, pets_error()]));
    }

    #[test]
    fn empty_error_lists_compare_equal() {
        // Degenerate but well-defined: both serialize to "[]".
        let baseline = baseline_with("foo", vec![]);
        assert!(is_known_failure(&baseline, "foo", &[]));
    }

    #[test]
    fn missing_baseline_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = load_baseline(&dir.path().join("failed.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn corrupt_baseline_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(load_baseline(&path), Err(BaselineError::Parse { .. })));
    }

    #[test]
    fn baseline_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.json");
        let baseline = baseline_with("foo", vec![pets_error()]);
        std::fs::write(&path, serde_json::to_string_pretty(&baseline).unwrap()).unwrap();

        let loaded = load_baseline(&path).unwrap();
        assert_eq!(loaded, baseline);
    }
}
