//! The conformance-run command: wire up baseline, validator, and corpus
//! client, execute the run, and write artifacts when the result should
//! become the next baseline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use oasconf_core::model::FailureMap;
use oasconf_core::regression::load_baseline;
use oasconf_core::report;
use oasconf_corpus::{CorpusClient, APIS_GURU_LIST_URL};
use oasconf_harness::{RunConfig, Runner, SchemaValidator, DEFAULT_PERCENTAGE};

/// Arguments for a conformance run.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Re-test only the documents already recorded in the baseline
    /// (implies full coverage of that subset).
    #[arg(long = "failedOnly")]
    pub failed_only: bool,

    /// Test the full corpus instead of the default 10% sample.
    #[arg(long)]
    pub all: bool,

    /// Baseline failures file; updated artifacts are written next to it.
    #[arg(long, default_value = "failed.json")]
    pub baseline: PathBuf,

    /// Directory of per-version OpenAPI schemas for the bundled validator.
    #[arg(long, default_value = "schemas")]
    pub schemas: PathBuf,

    /// Corpus directory listing URL.
    #[arg(long, default_value = APIS_GURU_LIST_URL)]
    pub corpus_url: String,
}

/// Execute one conformance run and return the process exit code.
///
/// # Errors
///
/// Baseline, schema, transport, and validator faults all propagate; the
/// caller logs them and exits 1 with no artifacts written.
pub async fn run_conformance(args: &RunArgs) -> Result<u8> {
    let baseline = load_baseline(&args.baseline).context("loading baseline failures")?;
    let validator = SchemaValidator::new(&args.schemas).context("loading validator schemas")?;
    let client = CorpusClient::new(args.corpus_url.clone());

    let percentage = if args.all || args.failed_only { 100 } else { DEFAULT_PERCENTAGE };
    let config = RunConfig { percentage, failed_only: args.failed_only };

    let outcome = Runner::new(&client, &validator, &baseline).run(&config).await?;

    if !outcome.has_regressions() {
        return Ok(0);
    }

    if outcome.at_full_coverage() {
        println!("new/updated failures found");
        write_artifacts(&args.baseline, &outcome.failed)?;
    }
    Ok(1)
}

/// Write the updated-failures snapshot and the markdown report next to the
/// baseline file (`failed.json` → `failed.updated.json` / `failed.updated.md`).
fn write_artifacts(baseline_path: &Path, failed: &FailureMap) -> Result<()> {
    let json_path = baseline_path.with_extension("updated.json");
    let md_path = baseline_path.with_extension("updated.md");

    let snapshot = report::to_baseline_json(failed).context("serializing updated failures")?;
    std::fs::write(&json_path, snapshot)
        .with_context(|| format!("writing {}", json_path.display()))?;
    println!("created {}", json_path.display());

    std::fs::write(&md_path, report::render_markdown(failed))
        .with_context(|| format!("writing {}", md_path.display()))?;
    println!("created {}", md_path.display());
    Ok(())
}
