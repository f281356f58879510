//! Reconcile generated artifacts against a Correspondence Ledger.
//!
//! The engine is intentionally small:
//! - Compute every edit in memory first (before/after per artifact).
//! - Fail with the full list of mismatched pairs before touching disk.
//! - Only then write changed artifacts, and emit a unified diff of what changed.
//!
//! Only directives for ledger pairs are rewritten. Anything else the generator
//! produced is left byte-identical.

mod directive;
mod error;

pub use directive::{ArtifactLayout, DirectiveTemplate, FIELD_PLACEHOLDER};
pub use error::{Mismatch, MismatchReason, ReconcileError, ReconcileResult};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use fs_err as fs;
use genfix_hash::sha256_hex;
use genfix_types::ledger::CorrespondenceLedger;
use genfix_types::reconcile::{EntryResult, EntryStatus, FileChange, ReconcileRecord};
use genfix_types::tool::ToolInfo;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub layout: ArtifactLayout,
    pub directive: DirectiveTemplate,
    /// Compute and report, but do not write.
    pub dry_run: bool,
}

/// Outcome of a successful reconcile.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub record: ReconcileRecord,
    /// Unified diff of artifact changes. Empty when nothing changed.
    pub patch: String,
}

/// Flip the emit-defaults directive off for every ledger pair under `root`.
///
/// All entries are evaluated before any artifact is written. If any pair cannot be
/// matched exactly once, nothing is written and every offending pair is returned.
pub fn reconcile(
    root: &Utf8Path,
    ledger: &CorrespondenceLedger,
    opts: &ReconcileOptions,
    tool: ToolInfo,
) -> ReconcileResult<ReconcileOutcome> {
    opts.directive.validate()?;

    let before = read_artifacts(root, ledger, &opts.layout)?;
    let mut after = before.clone();
    let mut results = Vec::with_capacity(ledger.len());
    let mut mismatches = Vec::new();

    for entry in ledger.entries() {
        let rel = opts.layout.artifact_path(&entry.type_name);
        let mismatch = |reason| Mismatch {
            type_name: entry.type_name.clone(),
            field_name: entry.field_name.clone(),
            artifact: rel.clone(),
            reason,
        };

        let Some(contents) = after.get_mut(&rel) else {
            mismatches.push(mismatch(MismatchReason::ArtifactMissing));
            continue;
        };

        let on = opts.directive.on(&entry.field_name);
        let off = opts.directive.off(&entry.field_name);
        let status = match (contents.matches(&on).count(), contents.matches(&off).count()) {
            (1, _) => {
                *contents = contents.replacen(&on, &off, 1);
                EntryStatus::Patched
            }
            (0, 1) => EntryStatus::AlreadyReconciled,
            (0, 0) => {
                mismatches.push(mismatch(MismatchReason::DirectiveMissing));
                continue;
            }
            (on_count, off_count) => {
                mismatches.push(mismatch(MismatchReason::Ambiguous {
                    occurrences: on_count + off_count,
                }));
                continue;
            }
        };

        debug!(entry = %entry, artifact = %rel, ?status, "reconciled ledger entry");
        results.push(EntryResult {
            type_name: entry.type_name.clone(),
            field_name: entry.field_name.clone(),
            artifact: rel.clone(),
            status,
        });
    }

    if !mismatches.is_empty() {
        for m in &mismatches {
            error!(
                type_name = %m.type_name,
                field_name = %m.field_name,
                artifact = %m.artifact,
                reason = %m.reason,
                "reconciliation mismatch"
            );
        }
        return Err(ReconcileError::Mismatch(mismatches));
    }

    let mut record = ReconcileRecord::new(
        tool,
        ledger.contract.clone(),
        root.to_path_buf(),
        opts.dry_run,
    );

    for (rel, old) in &before {
        let new = after.get(rel).unwrap_or(old);
        if old == new {
            continue;
        }
        if !opts.dry_run {
            let abs = root.join(rel);
            fs::write(&abs, new).with_context(|| format!("write {}", abs))?;
        }
        record.files.push(FileChange {
            path: rel.clone(),
            sha256_before: sha256_hex(old.as_bytes()),
            sha256_after: sha256_hex(new.as_bytes()),
        });
    }

    record.summary.entries = results.len() as u64;
    record.summary.patched = count(&results, EntryStatus::Patched);
    record.summary.already_reconciled = count(&results, EntryStatus::AlreadyReconciled);
    record.summary.files_modified = record.files.len() as u64;
    record.results = results;

    info!(
        root = %root,
        patched = record.summary.patched,
        already_reconciled = record.summary.already_reconciled,
        files_modified = record.summary.files_modified,
        dry_run = opts.dry_run,
        "reconcile complete"
    );

    let patch = render_patch(&before, &after);
    Ok(ReconcileOutcome { record, patch })
}

/// Read each distinct artifact named by the ledger once. Missing artifacts are
/// simply absent from the map; they surface as mismatches per entry.
fn read_artifacts(
    root: &Utf8Path,
    ledger: &CorrespondenceLedger,
    layout: &ArtifactLayout,
) -> ReconcileResult<BTreeMap<Utf8PathBuf, String>> {
    let mut out = BTreeMap::new();
    for type_name in ledger.type_names() {
        let rel = layout.artifact_path(type_name);
        if out.contains_key(&rel) {
            continue;
        }
        let abs = root.join(&rel);
        if !abs.is_file() {
            continue;
        }
        let contents = fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?;
        out.insert(rel, contents);
    }
    Ok(out)
}

fn count(results: &[EntryResult], status: EntryStatus) -> u64 {
    results.iter().filter(|r| r.status == status).count() as u64
}

fn render_patch(
    before: &BTreeMap<Utf8PathBuf, String>,
    after: &BTreeMap<Utf8PathBuf, String>,
) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, old) in before {
        let new = after.get(path).unwrap_or(old);
        if old == new {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

        let patch = diffy::create_patch(old, new);
        out.push_str(&formatter.fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}
