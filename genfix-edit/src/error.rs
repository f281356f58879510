//! Error types for genfix-edit.
//!
//! A mismatch means the generator's output no longer has the shape the reconciler
//! expects. It is never recovered from: installing the artifact anyway would silently
//! reintroduce default-value emission for a field the contract declares nullable.

use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// The top-level error type for reconcile operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// One or more ledger entries could not be matched in the generated output.
    #[error("reconciliation mismatch: {}", describe(.0))]
    Mismatch(Vec<Mismatch>),

    /// The directive template cannot be rendered per field.
    #[error("invalid directive template: {0}")]
    Template(String),

    /// I/O or encoding failure while reading or writing artifacts.
    #[error("runtime error: {0}")]
    Runtime(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub type_name: String,
    pub field_name: String,
    /// Artifact path relative to the reconcile root.
    pub artifact: Utf8PathBuf,
    pub reason: MismatchReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    ArtifactMissing,
    DirectiveMissing,
    Ambiguous { occurrences: usize },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::ArtifactMissing => f.write_str("artifact missing"),
            MismatchReason::DirectiveMissing => f.write_str("directive not found"),
            MismatchReason::Ambiguous { occurrences } => {
                write!(f, "directive found {occurrences} times")
            }
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) in {}: {}",
            self.type_name, self.field_name, self.artifact, self.reason
        )
    }
}

fn describe(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(Mismatch::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ReconcileError {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, ReconcileError::Mismatch(_))
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        match self {
            ReconcileError::Mismatch(m) => m,
            _ => &[],
        }
    }
}

/// Result type alias using ReconcileError.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
