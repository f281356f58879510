//! Rendering helpers (markdown) for human-readable artifacts.

use genfix_types::ledger::CorrespondenceLedger;
use genfix_types::reconcile::{EntryStatus, ReconcileRecord};
use genfix_types::report::{GenfixReport, TargetStatus};

pub fn render_ledger_md(ledger: &CorrespondenceLedger) -> String {
    let mut out = String::new();
    out.push_str("# genfix ledger\n\n");
    out.push_str(&format!("- Contract: `{}`\n", ledger.contract.path));
    if let Some(sha) = &ledger.contract.sha256 {
        out.push_str(&format!("- Contract sha256: `{}`\n", sha));
    }
    if let Some(v) = &ledger.contract.declared_version {
        out.push_str(&format!("- Declared version: `{}`\n", v));
    }
    out.push_str(&format!("- Entries: {}\n\n", ledger.len()));

    out.push_str("## Fields made nullable\n\n");
    if ledger.is_empty() {
        out.push_str("_No fields rewritten._\n");
        return out;
    }

    out.push_str("| Type | Field |\n|---|---|\n");
    for e in ledger.entries() {
        out.push_str(&format!("| `{}` | `{}` |\n", e.type_name, e.field_name));
    }
    out
}

pub fn render_reconcile_md(record: &ReconcileRecord) -> String {
    let mut out = String::new();
    out.push_str("# genfix reconcile\n\n");
    if record.dry_run {
        out.push_str("_Dry run: no artifacts were written._\n\n");
    }
    out.push_str(&format!(
        "- Entries: {}\n- Patched: {}\n- Already reconciled: {}\n- Files modified: {}\n\n",
        record.summary.entries,
        record.summary.patched,
        record.summary.already_reconciled,
        record.summary.files_modified
    ));

    out.push_str("## Results\n\n");
    if record.results.is_empty() {
        out.push_str("_No results._\n");
        return out;
    }

    for r in &record.results {
        out.push_str(&format!(
            "- `{}.{}` in `{}`: `{}`\n",
            r.type_name,
            r.field_name,
            r.artifact,
            status_label(r.status)
        ));
    }

    if !record.files.is_empty() {
        out.push_str("\n**Files changed**\n\n");
        for fc in &record.files {
            out.push_str(&format!(
                "- `{}` {} → {}\n",
                fc.path, fc.sha256_before, fc.sha256_after
            ));
        }
    }

    out
}

pub fn render_report_md(report: &GenfixReport) -> String {
    let mut out = String::new();
    out.push_str("# genfix run\n\n");
    out.push_str(&format!(
        "- Targets: {} (succeeded {}, failed {})\n\n",
        report.summary.targets_total, report.summary.succeeded, report.summary.failed
    ));

    for t in &report.targets {
        out.push_str(&format!("## {}\n\n", t.name));
        out.push_str(&format!("- Destination: `{}`\n", t.destination));
        match t.status {
            TargetStatus::Succeeded => {
                out.push_str("- Status: `succeeded`\n");
                out.push_str(&format!(
                    "- Ledger entries: {}\n- Patched: {}\n- Already reconciled: {}\n- Files installed: {}\n",
                    t.ledger_entries, t.patched, t.already_reconciled, t.files_installed
                ));
            }
            TargetStatus::Failed => {
                out.push_str("- Status: `failed`\n");
                if let Some(kind) = &t.error_kind {
                    out.push_str(&format!("- Error: `{}`\n", kind));
                }
                if let Some(msg) = &t.message {
                    out.push_str(&format!("\n```text\n{}\n```\n", msg.trim_end()));
                }
            }
        }
        out.push('\n');
    }

    out
}

fn status_label(s: EntryStatus) -> &'static str {
    match s {
        EntryStatus::Patched => "patched",
        EntryStatus::AlreadyReconciled => "already_reconciled",
    }
}
