//! The Correspondence Ledger: the only record of which fields the rewriter touched.
//!
//! One entry per mutated field, in discovery order, no duplicates. The reconciler
//! consumes it, possibly in another process, so it is a plain serializable list.

use crate::tool::ToolInfo;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub type_name: String,
    pub field_name: String,
}

impl LedgerEntry {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl std::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// Identity of the contract a ledger was produced from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRef {
    pub path: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Specification version the source declared before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceLedger {
    pub schema: String,
    pub tool: ToolInfo,
    pub contract: ContractRef,

    #[serde(default)]
    entries: Vec<LedgerEntry>,
}

impl CorrespondenceLedger {
    pub fn new(tool: ToolInfo, contract: ContractRef) -> Self {
        Self {
            schema: crate::schema::GENFIX_LEDGER_V1.to_string(),
            tool,
            contract,
            entries: vec![],
        }
    }

    /// Append an entry. Returns `false` (and records nothing) if the pair is already present.
    pub fn record(&mut self, entry: LedgerEntry) -> bool {
        if self.contains(&entry.type_name, &entry.field_name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.type_name == type_name && e.field_name == field_name)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct type names in first-seen order.
    pub fn type_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.type_name.as_str()) {
                out.push(e.type_name.as_str());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> CorrespondenceLedger {
        CorrespondenceLedger::new(ToolInfo::genfix("0.0.0"), ContractRef::default())
    }

    #[test]
    fn record_rejects_duplicate_pairs() {
        let mut l = ledger();
        assert!(l.record(LedgerEntry::new("Account", "balance")));
        assert!(!l.record(LedgerEntry::new("Account", "balance")));
        assert!(l.record(LedgerEntry::new("Account", "limit")));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn entries_keep_insertion_order() {
        let mut l = ledger();
        l.record(LedgerEntry::new("Zeta", "b"));
        l.record(LedgerEntry::new("Alpha", "a"));
        l.record(LedgerEntry::new("Zeta", "a"));
        let pairs: Vec<String> = l.entries().iter().map(|e| e.to_string()).collect();
        assert_eq!(pairs, vec!["Zeta.b", "Alpha.a", "Zeta.a"]);
        assert_eq!(l.type_names(), vec!["Zeta", "Alpha"]);
    }
}
