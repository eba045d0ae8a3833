//! # Validation Runner
//!
//! The sequential fetch → validate → annotate → classify loop, with the
//! run context made explicit: collaborators (corpus client, validator,
//! baseline) are borrowed by the [`Runner`], counters live in the returned
//! [`RunOutcome`], and nothing is module-level mutable state, so repeated
//! runs in one process are independent.

use serde_json::Value;
use thiserror::Error;

use oasconf_core::locator;
use oasconf_core::model::{CorpusMap, FailureMap, FailureRecord, RunStats, ValidationError};
use oasconf_core::regression::{self, BaselineMap};
use oasconf_core::report;
use oasconf_core::sampler;
use oasconf_corpus::{CorpusClient, CorpusError};

use crate::validator::{SpecValidator, ValidatorError};

/// Share of the corpus an ordinary run covers.
pub const DEFAULT_PERCENTAGE: u8 = 10;

/// What to run: how much of the corpus, and whether to restrict it to the
/// baseline's documents.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Sample percentage, 0..=100.
    pub percentage: u8,
    /// Restrict the corpus to baseline names and force full coverage of
    /// that subset.
    pub failed_only: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { percentage: DEFAULT_PERCENTAGE, failed_only: false }
    }
}

/// Fatal run fault. Fetch and validator faults propagate untouched; the
/// run aborts with no artifacts written.
#[derive(Error, Debug)]
pub enum RunError {
    /// Corpus listing or document fetch failed.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// The validator itself faulted.
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Final counters.
    pub stats: RunStats,
    /// Every document whose outcome was invalid, annotated and classified.
    pub failed: FailureMap,
    /// Effective sample percentage (100 in failed-only mode).
    pub percentage: u8,
    /// Whether the run was restricted to baseline documents.
    pub failed_only: bool,
}

impl RunOutcome {
    /// Did the run surface failures not fully covered by the baseline?
    ///
    /// Any invalid document that is not a byte-identical known failure
    /// counts; in failed-only mode a previously failing document that now
    /// passes also counts, since the baseline is then stale. A baseline
    /// document that disappeared from the corpus never enters the run at
    /// all (`total` shrinks with it) and is not detected here.
    pub fn has_regressions(&self) -> bool {
        self.stats.known_failed != self.stats.invalid
            || (self.failed_only && self.stats.invalid != self.stats.total)
    }

    /// Did the run cover the whole (possibly restricted) corpus?
    pub fn at_full_coverage(&self) -> bool {
        self.percentage == 100
    }

    /// Artifacts are only worth writing when they would become the next
    /// baseline: full coverage with unresolved regressions.
    pub fn should_write_artifacts(&self) -> bool {
        self.has_regressions() && self.at_full_coverage()
    }
}

/// Sequential conformance run over a sampled corpus.
pub struct Runner<'a, V> {
    client: &'a CorpusClient,
    validator: &'a V,
    baseline: &'a BaselineMap,
}

impl<'a, V: SpecValidator> Runner<'a, V> {
    /// A runner borrowing its collaborators for one or more runs.
    pub fn new(client: &'a CorpusClient, validator: &'a V, baseline: &'a BaselineMap) -> Self {
        Self { client, validator, baseline }
    }

    /// Execute one run.
    ///
    /// Emits one progress line per document (serialized counters plus the
    /// document name) on stdout.
    ///
    /// # Errors
    ///
    /// Fails fast on the first transport or validator fault; no partial
    /// results are returned.
    pub async fn run(&self, config: &RunConfig) -> Result<RunOutcome, RunError> {
        let listing = self.client.fetch_listing().await?;
        let (corpus, percentage) = restrict(listing, config, self.baseline);

        let sampled = if percentage == 100 {
            println!("testing all {} available APIs", corpus.len());
            corpus
        } else {
            println!(
                "testing a random set containing {percentage}% of {} available APIs",
                corpus.len()
            );
            sampler::sample(&corpus, percentage, &mut rand::thread_rng())
        };

        let mut stats = RunStats::for_total(sampled.len());
        let mut failed = FailureMap::new();

        for (name, entry) in &sampled {
            let text = self.client.fetch_document(&entry.yaml_url).await?;
            let mut outcome = self.validator.validate(&text)?;
            stats.current += 1;

            if outcome.valid {
                stats.valid += 1;
            } else {
                stats.invalid += 1;
                annotate_errors(&mut outcome.errors, &text, &entry.source_browse_url);
                let known = regression::is_known_failure(self.baseline, name, &outcome.errors);
                if known {
                    stats.known_failed += 1;
                }
                failed.insert(
                    name.clone(),
                    FailureRecord { entry: entry.clone(), result: outcome, known_failure: known },
                );
            }

            println!("{} {name}", serde_json::to_string(&stats).unwrap_or_default());
        }

        println!(
            "Finished testing {} APIs\n{} tests failed of which {} were known failures",
            stats.total, stats.invalid, stats.known_failed
        );

        Ok(RunOutcome { stats, failed, percentage, failed_only: config.failed_only })
    }
}

/// Apply failed-only restriction and resolve the effective percentage.
fn restrict(listing: CorpusMap, config: &RunConfig, baseline: &BaselineMap) -> (CorpusMap, u8) {
    if config.failed_only {
        let restricted =
            listing.into_iter().filter(|(name, _)| baseline.contains_key(name)).collect();
        (restricted, 100)
    } else {
        (listing, config.percentage.min(100))
    }
}

/// Attach the locator's findings to each error in place: the value at the
/// instance path (or the fault reason) and the `#L<line>` deep link.
fn annotate_errors(errors: &mut [ValidationError], text: &str, browse_url: &str) {
    for error in errors {
        match locator::resolve_value(text, &error.instance_path) {
            Ok(value) => {
                error.has_instance_value = true;
                error.instance_value = value;
            }
            Err(fault) => {
                error.has_instance_value = false;
                error.instance_value = Value::String(fault.to_string());
            }
        }
        error.source_url = report::source_link(browse_url, text, &error.instance_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(stats: RunStats, percentage: u8, failed_only: bool) -> RunOutcome {
        RunOutcome { stats, failed: FailureMap::new(), percentage, failed_only }
    }

    #[test]
    fn all_failures_known_is_not_a_regression() {
        let stats = RunStats { total: 10, current: 10, valid: 7, invalid: 3, known_failed: 3 };
        assert!(!outcome(stats, 100, false).has_regressions());
    }

    #[test]
    fn unmatched_failure_is_a_regression() {
        let stats = RunStats { total: 10, current: 10, valid: 7, invalid: 3, known_failed: 2 };
        let out = outcome(stats, 100, false);
        assert!(out.has_regressions());
        assert!(out.should_write_artifacts());
    }

    #[test]
    fn regressions_below_full_coverage_write_nothing() {
        let stats = RunStats { total: 10, current: 10, valid: 7, invalid: 3, known_failed: 2 };
        let out = outcome(stats, 10, false);
        assert!(out.has_regressions());
        assert!(!out.should_write_artifacts());
    }

    #[test]
    fn failed_only_requires_every_document_to_still_fail() {
        // One baseline document now passes: counters agree (0 == 0 known
        // vs invalid mismatch is absent) but coverage of the subset is not
        // fully failing, so the baseline is stale.
        let stats = RunStats { total: 2, current: 2, valid: 1, invalid: 1, known_failed: 1 };
        assert!(outcome(stats, 100, true).has_regressions());
        assert!(!outcome(stats, 100, false).has_regressions());
    }

    #[test]
    fn annotation_records_value_and_deep_link() {
        let text = "openapi: 3.0.0\npaths:\n  /pets:\n    get:\n      summary: list\n";
        let mut errors = vec![ValidationError::new("/paths/~1pets/get", "missing responses")];
        annotate_errors(&mut errors, text, "https://browse.example/pets.yaml");

        assert!(errors[0].has_instance_value);
        assert_eq!(errors[0].instance_value, serde_json::json!({"summary": "list"}));
        assert_eq!(errors[0].source_url, "https://browse.example/pets.yaml#L4");
    }

    #[test]
    fn annotation_faults_are_recorded_not_fatal() {
        let text = "openapi: 3.0.0\n";
        let mut errors = vec![
            ValidationError::new("", "root finding"),
            ValidationError::new("/missing/path", "dangling pointer"),
        ];
        annotate_errors(&mut errors, text, "https://browse.example/x.yaml");

        assert!(!errors[0].has_instance_value);
        assert_eq!(errors[0].instance_value, serde_json::json!("content too large"));
        assert!(!errors[1].has_instance_value);
        assert!(errors[1].source_url.starts_with("https://browse.example/x.yaml#L"));
    }
}
