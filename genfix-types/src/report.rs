use crate::tool::ToolInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Run-level report covering every target, one entry per target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenfixReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,

    #[serde(default)]
    pub targets: Vec<TargetReport>,

    pub summary: ReportSummary,
}

impl GenfixReport {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::GENFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                run_id: Uuid::new_v4(),
                started_at: Utc::now(),
                ended_at: None,
            },
            targets: vec![],
            summary: ReportSummary::default(),
        }
    }

    pub fn push(&mut self, target: TargetReport) {
        self.summary.targets_total += 1;
        match target.status {
            TargetStatus::Succeeded => self.summary.succeeded += 1,
            TargetStatus::Failed => self.summary.failed += 1,
        }
        self.targets.push(target);
    }

    pub fn finish(&mut self) {
        self.run.ended_at = Some(Utc::now());
    }

    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    pub name: String,
    pub destination: String,
    pub status: TargetStatus,

    /// Stable token naming the failed stage (`contract_unreadable`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub ledger_entries: u64,

    #[serde(default)]
    pub patched: u64,

    #[serde(default)]
    pub already_reconciled: u64,

    #[serde(default)]
    pub files_installed: u64,
}

impl TargetReport {
    pub fn succeeded(name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination: destination.into(),
            status: TargetStatus::Succeeded,
            error_kind: None,
            message: None,
            ledger_entries: 0,
            patched: 0,
            already_reconciled: 0,
            files_installed: 0,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        destination: impl Into<String>,
        error_kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: TargetStatus::Failed,
            error_kind: Some(error_kind.into()),
            message: Some(message.into()),
            ..Self::succeeded(name, destination)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub targets_total: u64,
    pub succeeded: u64,
    pub failed: u64,
}
