//! Wire-shape tests for persisted genfix artifacts.

use genfix_types::ledger::{ContractRef, CorrespondenceLedger, LedgerEntry};
use genfix_types::reconcile::{EntryResult, EntryStatus, FileChange, ReconcileRecord};
use genfix_types::report::{GenfixReport, TargetReport, TargetStatus};
use genfix_types::tool::ToolInfo;
use pretty_assertions::assert_eq;
use serde_json::json;

fn tool() -> ToolInfo {
    ToolInfo::genfix("0.0.0")
}

#[test]
fn ledger_serializes_entries_in_order() {
    let mut ledger = CorrespondenceLedger::new(
        tool(),
        ContractRef {
            path: "specs/api.yaml".into(),
            sha256: Some("abc".to_string()),
            declared_version: Some("3.1.0".to_string()),
        },
    );
    ledger.record(LedgerEntry::new("Account", "balance"));
    ledger.record(LedgerEntry::new("Account", "frozen"));

    let v = serde_json::to_value(&ledger).unwrap();
    assert_eq!(v["schema"], "genfix.ledger.v1");
    assert_eq!(
        v["entries"],
        json!([
            { "type_name": "Account", "field_name": "balance" },
            { "type_name": "Account", "field_name": "frozen" }
        ])
    );
    assert_eq!(v["contract"]["declared_version"], "3.1.0");
}

#[test]
fn ledger_reads_back_from_disk_shape() {
    let raw = r#"{
        "schema": "genfix.ledger.v1",
        "tool": { "name": "genfix" },
        "contract": { "path": "api.yaml" },
        "entries": [ { "type_name": "Vault", "field_name": "amount" } ]
    }"#;
    let ledger: CorrespondenceLedger = serde_json::from_str(raw).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains("Vault", "amount"));
    assert_eq!(ledger.contract.sha256, None);
}

#[test]
fn ledger_without_entries_is_empty() {
    let raw = r#"{
        "schema": "genfix.ledger.v1",
        "tool": { "name": "genfix" },
        "contract": { "path": "api.yaml" }
    }"#;
    let ledger: CorrespondenceLedger = serde_json::from_str(raw).unwrap();
    assert!(ledger.is_empty());
}

#[test]
fn entry_status_uses_snake_case() {
    let r = EntryResult {
        type_name: "Account".to_string(),
        field_name: "balance".to_string(),
        artifact: "Model/Account.cs".into(),
        status: EntryStatus::AlreadyReconciled,
    };
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["status"], "already_reconciled");
}

#[test]
fn artifact_paths_serialize_as_plain_strings() {
    let mut rec = ReconcileRecord::new(
        tool(),
        ContractRef {
            path: "specs/api.yaml".into(),
            ..ContractRef::default()
        },
        "staging/core/generated/src/Acme.Sdk".into(),
        false,
    );
    rec.files.push(FileChange {
        path: "Model/Account.cs".into(),
        sha256_before: "a".to_string(),
        sha256_after: "b".to_string(),
    });

    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["contract"]["path"], "specs/api.yaml");
    assert_eq!(v["root"], "staging/core/generated/src/Acme.Sdk");
    assert_eq!(v["files"][0]["path"], "Model/Account.cs");

    let back: ReconcileRecord = serde_json::from_value(v).unwrap();
    assert_eq!(back.files[0].path.file_name(), Some("Account.cs"));
}

#[test]
fn reconcile_record_starts_empty() {
    let rec = ReconcileRecord::new(tool(), ContractRef::default(), "out".into(), true);
    assert_eq!(rec.schema, "genfix.reconcile.v1");
    assert!(rec.results.is_empty());
    assert_eq!(rec.summary.entries, 0);
}

#[test]
fn report_counts_each_target() {
    let mut report = GenfixReport::new(tool());
    report.push(TargetReport {
        name: "models".to_string(),
        destination: "out/models".to_string(),
        status: TargetStatus::Succeeded,
        error_kind: None,
        message: None,
        ledger_entries: 2,
        patched: 2,
        already_reconciled: 0,
        files_installed: 5,
    });
    report.push(TargetReport {
        name: "sdk".to_string(),
        destination: "out/sdk".to_string(),
        status: TargetStatus::Failed,
        error_kind: Some("reconciliation_mismatch".to_string()),
        message: Some("Account.balance".to_string()),
        ledger_entries: 1,
        patched: 0,
        already_reconciled: 0,
        files_installed: 0,
    });
    report.finish();

    assert_eq!(report.summary.targets_total, 2);
    assert_eq!(report.summary.succeeded, 1);
    assert_eq!(report.summary.failed, 1);
    assert!(!report.all_succeeded());

    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["schema"], "genfix.report.v1");
    assert_eq!(v["targets"][1]["status"], "failed");
    assert!(v["targets"][0].get("error_kind").is_none());
}
