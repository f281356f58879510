//! Shared DTOs (schemas-as-code) for the genfix workspace.
//!
//! # Design constraints
//! - These types are intended to be serialized to disk.
//! - A persisted ledger must be readable by a later, separate reconcile run.
//! - Prefer adding optional fields over changing semantics.

pub mod field;
pub mod ledger;
pub mod params;
pub mod reconcile;
pub mod report;
pub mod tool;

/// Schema identifiers.
pub mod schema {
    pub const GENFIX_LEDGER_V1: &str = "genfix.ledger.v1";
    pub const GENFIX_RECONCILE_V1: &str = "genfix.reconcile.v1";
    pub const GENFIX_REPORT_V1: &str = "genfix.report.v1";
}
