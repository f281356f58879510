use crate::ledger::ContractRef;
use crate::tool::ToolInfo;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRecord {
    pub schema: String,
    pub tool: ToolInfo,
    pub contract: ContractRef,
    pub root: Utf8PathBuf,
    pub dry_run: bool,

    #[serde(default)]
    pub results: Vec<EntryResult>,

    #[serde(default)]
    pub files: Vec<FileChange>,

    pub summary: ReconcileSummary,
}

impl ReconcileRecord {
    pub fn new(tool: ToolInfo, contract: ContractRef, root: Utf8PathBuf, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::GENFIX_RECONCILE_V1.to_string(),
            tool,
            contract,
            root,
            dry_run,
            results: vec![],
            files: vec![],
            summary: ReconcileSummary::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryResult {
    pub type_name: String,
    pub field_name: String,
    /// Artifact path relative to the reconcile root.
    pub artifact: Utf8PathBuf,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The emit-defaults directive was flipped from on to off.
    Patched,
    /// The directive already read off; nothing to do.
    AlreadyReconciled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: Utf8PathBuf,
    pub sha256_before: String,
    pub sha256_after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub entries: u64,
    pub patched: u64,
    pub already_reconciled: u64,
    pub files_modified: u64,
}
