//! Domain logic: decide which contract fields become nullable and record every edit.
//!
//! This crate owns *which* fields change. It does not own *how* generated artifacts are
//! patched afterwards; that's the `genfix-edit` crate, driven by the ledger produced here.

mod eligibility;
mod rewriter;

pub use eligibility::{Decision, RewriterConfig};
pub use rewriter::{RewriteOutcome, Rewriter};
