//! The regeneration pipeline, one target at a time.
//!
//! Stage order is fixed: load, rewrite, generate, reconcile, install. Any failure
//! aborts the target before install, so the destination keeps its previous
//! contents. Per-target staging is always fresh and is removed when the target
//! finishes unless `keep_staging` is set.

use crate::error::{GeneratorError, PipelineError};
use crate::ports::{GenerationRequest, Generator, WritePort};
use crate::settings::{RunSettings, TargetSettings};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use genfix_contract::load_contract;
use genfix_domain::Rewriter;
use genfix_edit::{ReconcileOptions, reconcile};
use genfix_install::{ExcludeSet, InstallReport, StagingDir, install};
use genfix_render::{render_ledger_md, render_reconcile_md, render_report_md};
use genfix_types::ledger::CorrespondenceLedger;
use genfix_types::reconcile::ReconcileRecord;
use genfix_types::report::{GenfixReport, TargetReport};
use genfix_types::tool::ToolInfo;
use tracing::{error, info};

pub const CONTRACT_FILE: &str = "contract.yaml";
pub const LEDGER_FILE: &str = "ledger.json";
pub const RECONCILE_FILE: &str = "reconcile.json";
pub const PATCH_FILE: &str = "patch.diff";
pub const REPORT_FILE: &str = "report.json";
const GENERATED_DIR: &str = "generated";

/// Outcome of a successful `run_target`.
#[derive(Debug)]
pub struct TargetOutcome {
    pub name: String,
    pub ledger: CorrespondenceLedger,
    pub reconcile: ReconcileRecord,
    pub patch: String,
    pub install: InstallReport,
    /// Set when the staging directory was kept for inspection.
    pub staging_dir: Option<Utf8PathBuf>,
}

impl TargetOutcome {
    pub fn to_report(&self, destination: &Utf8Path) -> TargetReport {
        let mut report = TargetReport::succeeded(&self.name, destination.as_str());
        report.ledger_entries = self.ledger.len() as u64;
        report.patched = self.reconcile.summary.patched;
        report.already_reconciled = self.reconcile.summary.already_reconciled;
        report.files_installed = self.install.files_installed;
        report
    }
}

/// Run one target end to end.
pub fn run_target(
    target: &TargetSettings,
    run: &RunSettings,
    generator: &dyn Generator,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> Result<TargetOutcome, PipelineError> {
    info!(target = %target.name, contract = %target.contract, "regenerating target");

    let exclude = ExcludeSet::new(&target.exclude)?;
    let staging = StagingDir::create(&run.staging_root, &target.name, run.keep_staging)
        .map_err(|e| anyhow::Error::new(e).context("create staging directory"))?;

    let mut contract = load_contract(&target.contract, &target.spec_version)?;
    let outcome = Rewriter::with_config(run.rewriter.clone()).rewrite(&mut contract, tool.clone());
    let ledger = outcome.ledger;

    let contract_path = staging.join(CONTRACT_FILE);
    let yaml = contract
        .to_yaml()
        .map_err(|e| anyhow::Error::new(e).context("serialize rewritten contract"))?;
    writer.write_file(&contract_path, yaml.as_bytes())?;
    write_ledger(&ledger, staging.path(), writer)?;

    let output_dir = staging.join(GENERATED_DIR);
    generator.generate(&GenerationRequest {
        contract_path: &contract_path,
        output_dir: &output_dir,
        params: &target.params,
    })?;
    ensure_output(&output_dir)?;

    let source_root = target.source_root(&output_dir);
    let opts = ReconcileOptions {
        layout: target.layout.clone(),
        directive: target.directive.clone(),
        dry_run: false,
    };
    let reconciled = reconcile(&source_root, &ledger, &opts, tool).inspect_err(|err| {
        if err.is_mismatch() {
            error!(
                target = %target.name,
                mismatches = err.mismatches().len(),
                ledger_entries = ledger.len(),
                "generated output does not match the ledger; nothing installed"
            );
        }
    })?;
    write_reconcile(&reconciled.record, &reconciled.patch, staging.path(), writer)?;

    let installed = install(&source_root, &target.destination, &exclude, target.strategy)?;

    info!(
        target = %target.name,
        ledger_entries = ledger.len(),
        patched = reconciled.record.summary.patched,
        files_installed = installed.files_installed,
        "target complete"
    );

    Ok(TargetOutcome {
        name: target.name.clone(),
        ledger,
        reconcile: reconciled.record,
        patch: reconciled.patch,
        install: installed,
        staging_dir: staging.keep().then(|| staging.path().to_path_buf()),
    })
}

/// Outcome of `run_all`.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: GenfixReport,
    /// Exit code of the first failing target, if any.
    pub first_failure: Option<i32>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        self.first_failure.unwrap_or(0)
    }
}

/// Run every target in order. A failing target does not stop its siblings.
pub fn run_all(
    run: &RunSettings,
    generator: &dyn Generator,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> RunOutcome {
    let mut report = GenfixReport::new(tool.clone());
    let mut first_failure = None;

    for target in &run.targets {
        match run_target(target, run, generator, writer, tool.clone()) {
            Ok(outcome) => report.push(outcome.to_report(&target.destination)),
            Err(err) => {
                error!(
                    target = %target.name,
                    kind = err.kind(),
                    error = %err,
                    "target failed; destination left unchanged"
                );
                first_failure.get_or_insert(err.exit_code());
                report.push(TargetReport::failed(
                    &target.name,
                    target.destination.as_str(),
                    err.kind(),
                    err.to_string(),
                ));
            }
        }
    }

    report.finish();
    info!(
        targets = report.summary.targets_total,
        succeeded = report.summary.succeeded,
        failed = report.summary.failed,
        "run complete"
    );
    RunOutcome {
        report,
        first_failure,
    }
}

/// Write `ledger.json` and `ledger.md` into `out_dir`.
pub fn write_ledger(
    ledger: &CorrespondenceLedger,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;
    let json = serde_json::to_string_pretty(ledger).context("serialize ledger")?;
    writer.write_file(&out_dir.join(LEDGER_FILE), json.as_bytes())?;
    writer.write_file(
        &out_dir.join("ledger.md"),
        render_ledger_md(ledger).as_bytes(),
    )?;
    Ok(())
}

/// Write `reconcile.json`, `reconcile.md` and `patch.diff` into `out_dir`.
pub fn write_reconcile(
    record: &ReconcileRecord,
    patch: &str,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;
    let json = serde_json::to_string_pretty(record).context("serialize reconcile record")?;
    writer.write_file(&out_dir.join(RECONCILE_FILE), json.as_bytes())?;
    writer.write_file(
        &out_dir.join("reconcile.md"),
        render_reconcile_md(record).as_bytes(),
    )?;
    writer.write_file(&out_dir.join(PATCH_FILE), patch.as_bytes())?;
    Ok(())
}

/// Write `report.json` and `report.md` into `out_dir`.
pub fn write_report(
    report: &GenfixReport,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(&out_dir.join(REPORT_FILE), json.as_bytes())?;
    writer.write_file(
        &out_dir.join("report.md"),
        render_report_md(report).as_bytes(),
    )?;
    Ok(())
}

/// A generator that exits zero but writes nothing is still a failed invocation.
fn ensure_output(output_dir: &Utf8Path) -> Result<(), GeneratorError> {
    let has_entries = output_dir
        .read_dir_utf8()
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false);
    if has_entries {
        Ok(())
    } else {
        Err(GeneratorError::NoOutput(output_dir.to_path_buf()))
    }
}
