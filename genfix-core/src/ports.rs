//! Port traits abstracting the external generator and artifact writes.

use crate::error::GeneratorError;
use camino::Utf8Path;
use genfix_types::params::GeneratorParams;

/// One generator invocation: a mutated contract in, a source tree out.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub contract_path: &'a Utf8Path,
    pub output_dir: &'a Utf8Path,
    pub params: &'a GeneratorParams,
}

/// The external model generator.
///
/// Implementations must leave the contract untouched and write only under
/// `output_dir`.
pub trait Generator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<(), GeneratorError>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
