//! Embeddable core library for genfix.
//!
//! Provides a clap-free entry point that runs one regeneration target, or a whole
//! set of them, from loaded settings.
//!
//! # Port traits
//!
//! I/O that a host may want to replace is abstracted in [`ports`]:
//! - [`Generator`](ports::Generator): invoke the external model generator
//! - [`WritePort`](ports::WritePort): write run artifacts
//!
//! The [`adapters`] module provides the process-backed generator and a
//! filesystem writer.
//!
//! # Entry points
//!
//! - [`run_target`](pipeline::run_target): load, rewrite, generate, reconcile, install
//! - [`run_all`](pipeline::run_all): every configured target, with a run report

pub mod adapters;
mod error;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use error::{GeneratorError, PipelineError};

// Re-exported so embedders don't need the leaf crates directly.
pub use genfix_domain::RewriterConfig;
pub use genfix_edit::{ArtifactLayout, DirectiveTemplate};
pub use genfix_install::InstallStrategy;
