//! # Validator Seam
//!
//! [`SpecValidator`] is the harness's contract with the schema validator
//! under test: document text in, `{valid, errors}` out. The harness never
//! looks past that shape.
//!
//! [`SchemaValidator`] is the bundled implementation: it loads one JSON
//! Schema per OpenAPI version from a schema directory and validates
//! documents against the schema matching their declared version.
//!
//! A validator fault (schema missing, schema uncompilable) is fatal to the
//! run — there is no per-document fault isolation. A document that fails to
//! parse, or that declares a version with no loaded schema, is an invalid
//! *outcome*, not a fault: real corpora contain such documents and they are
//! exactly what the regression report should surface.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use oasconf_core::model::{ValidationError, ValidationOutcome};
use oasconf_core::yaml;

/// The external-validator contract.
pub trait SpecValidator: Send + Sync {
    /// Validate one document's raw text.
    ///
    /// # Errors
    ///
    /// Only for faults of the validator itself; findings about the document
    /// belong in the returned outcome.
    fn validate(&self, document: &str) -> Result<ValidationOutcome, ValidatorError>;
}

/// Fault of the validator itself (never a finding about a document).
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// A schema file could not be read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoad {
        /// Schema filename or directory.
        schema_name: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// A loaded schema did not compile into a validator.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild {
        /// Schema filename.
        schema_name: String,
        /// Why compilation failed.
        reason: String,
    },

    /// IO error reading a schema file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// JSON-Schema-backed document validator.
///
/// Loads every `*.schema.json` file from the schema directory at
/// construction. Validation selects the schema named after the document's
/// declared version (`v<major>.<minor>.schema.json`, e.g. a document with
/// `openapi: 3.0.3` validates against `v3.0.schema.json`; `swagger: 2.0`
/// against `v2.0.schema.json`).
#[derive(Debug)]
pub struct SchemaValidator {
    schema_dir: PathBuf,
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Load all schemas from `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::SchemaLoad`] if the directory cannot be
    /// read or any schema file is not valid JSON.
    pub fn new(schema_dir: impl AsRef<Path>) -> Result<Self, ValidatorError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let mut schemas = HashMap::new();

        let entries = std::fs::read_dir(&schema_dir).map_err(|e| ValidatorError::SchemaLoad {
            schema_name: schema_dir.display().to_string(),
            reason: format!("cannot read schema directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.ends_with(".schema.json") {
                    let content = std::fs::read_to_string(&path)?;
                    let value: Value = serde_json::from_str(&content).map_err(|e| {
                        ValidatorError::SchemaLoad {
                            schema_name: name.to_string(),
                            reason: format!("invalid JSON: {e}"),
                        }
                    })?;
                    schemas.insert(name.to_string(), value);
                }
            }
        }

        Ok(Self { schema_dir, schemas })
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Names of all loaded schemas, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl SpecValidator for SchemaValidator {
    fn validate(&self, document: &str) -> Result<ValidationOutcome, ValidatorError> {
        let parsed: serde_yaml::Value = match serde_yaml::from_str(document) {
            Ok(value) => value,
            Err(e) => return Ok(root_failure(format!("document does not parse: {e}"))),
        };
        let instance = match yaml::to_json_value(&parsed) {
            Ok(value) => value,
            Err(reason) => {
                return Ok(root_failure(format!("document is not JSON-compatible: {reason}")))
            }
        };

        let Some(declared) = declared_version(&instance) else {
            return Ok(root_failure(
                "document declares neither an 'openapi' nor a 'swagger' version".to_string(),
            ));
        };
        let schema_name = schema_name_for(declared);
        let Some(schema) = self.schemas.get(&schema_name) else {
            return Ok(root_failure(format!("unsupported OpenAPI version '{declared}'")));
        };

        let validator = jsonschema::validator_for(schema).map_err(|e| {
            ValidatorError::ValidatorBuild { schema_name, reason: e.to_string() }
        })?;

        let errors: Vec<ValidationError> = validator
            .iter_errors(&instance)
            .map(|e| ValidationError::new(e.instance_path.to_string(), e.to_string()))
            .collect();

        if errors.is_empty() {
            Ok(ValidationOutcome::passed())
        } else {
            Ok(ValidationOutcome::failed(errors))
        }
    }
}

fn root_failure(message: String) -> ValidationOutcome {
    ValidationOutcome::failed(vec![ValidationError::new("", message)])
}

/// The version string the document declares, if any.
fn declared_version(instance: &Value) -> Option<&str> {
    instance
        .get("openapi")
        .or_else(|| instance.get("swagger"))
        .and_then(Value::as_str)
}

/// Schema filename for a declared version, keyed by major.minor.
fn schema_name_for(declared: &str) -> String {
    let mut parts = declared.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) => format!("v{major}.{minor}.schema.json"),
        _ => format!("v{declared}.schema.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The repository's bundled schemas, resolved from the crate directory.
    fn schema_dir() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates/
        dir.pop(); // repo root
        dir.join("schemas")
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new(schema_dir()).unwrap()
    }

    #[test]
    fn loads_bundled_schemas() {
        let v = validator();
        assert_eq!(
            v.schema_names(),
            vec!["v2.0.schema.json", "v3.0.schema.json", "v3.1.schema.json"]
        );
    }

    #[test]
    fn schema_name_truncates_to_major_minor() {
        assert_eq!(schema_name_for("3.0.3"), "v3.0.schema.json");
        assert_eq!(schema_name_for("3.1.0"), "v3.1.schema.json");
        assert_eq!(schema_name_for("2.0"), "v2.0.schema.json");
    }

    #[test]
    fn valid_document_passes() {
        let doc = r#"
openapi: 3.0.0
info:
  title: Petstore
  version: "1.0"
paths:
  /pets:
    get:
      responses:
        "200":
          description: ok
"#;
        let outcome = validator().validate(doc).unwrap();
        assert!(outcome.valid, "errors: {:?}", outcome.errors);
    }

    #[test]
    fn operation_without_responses_fails_with_instance_path() {
        let doc = r#"
openapi: 3.0.0
info:
  title: Petstore
  version: "1.0"
paths:
  /pets:
    get: {}
"#;
        let outcome = validator().validate(doc).unwrap();
        assert!(!outcome.valid);
        assert!(
            outcome.errors.iter().any(|e| e.instance_path.contains("get")
                && e.message.contains("responses")),
            "errors: {:?}",
            outcome.errors
        );
    }

    #[test]
    fn unparseable_document_is_an_invalid_outcome() {
        let outcome = validator().validate(": not yaml: [").unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.errors[0].instance_path, "");
        assert!(outcome.errors[0].message.contains("does not parse"));
    }

    #[test]
    fn undeclared_version_is_an_invalid_outcome() {
        let outcome = validator().validate("info:\n  title: nothing\n").unwrap();
        assert!(!outcome.valid);
        assert!(outcome.errors[0].message.contains("neither"));
    }

    #[test]
    fn unsupported_version_is_an_invalid_outcome() {
        let outcome = validator().validate("openapi: 9.9.0\ninfo: {}\n").unwrap();
        assert!(!outcome.valid);
        assert!(outcome.errors[0].message.contains("unsupported OpenAPI version"));
    }

    #[test]
    fn swagger_documents_use_the_v2_schema() {
        let doc = r#"
swagger: "2.0"
info:
  title: Legacy
  version: "1.0"
paths: {}
"#;
        let outcome = validator().validate(doc).unwrap();
        assert!(outcome.valid, "errors: {:?}", outcome.errors);
    }

    #[test]
    fn missing_schema_directory_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            SchemaValidator::new(missing),
            Err(ValidatorError::SchemaLoad { .. })
        ));
    }

    #[test]
    fn malformed_schema_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("v9.9.schema.json"), "{ nope").unwrap();
        assert!(matches!(
            SchemaValidator::new(dir.path()),
            Err(ValidatorError::SchemaLoad { .. })
        ));
    }
}
