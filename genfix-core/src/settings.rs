//! Clap-free settings for the regeneration pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use genfix_contract::DEFAULT_SPEC_VERSION;
use genfix_domain::RewriterConfig;
use genfix_edit::{ArtifactLayout, DirectiveTemplate};
use genfix_install::InstallStrategy;
use genfix_types::params::GeneratorParams;

/// One configured generation target. Paths are already resolved by the caller.
#[derive(Debug, Clone)]
pub struct TargetSettings {
    pub name: String,
    pub contract: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub params: GeneratorParams,
    pub spec_version: String,

    /// Part of the generator output that is reconciled and installed.
    /// `None` means the whole output directory.
    pub source_subpath: Option<Utf8PathBuf>,
    pub layout: ArtifactLayout,
    pub directive: DirectiveTemplate,
    pub exclude: Vec<String>,
    pub strategy: InstallStrategy,
}

impl TargetSettings {
    pub fn new(
        name: impl Into<String>,
        contract: impl Into<Utf8PathBuf>,
        destination: impl Into<Utf8PathBuf>,
        params: GeneratorParams,
    ) -> Self {
        Self {
            name: name.into(),
            contract: contract.into(),
            destination: destination.into(),
            params,
            spec_version: DEFAULT_SPEC_VERSION.to_string(),
            source_subpath: None,
            layout: ArtifactLayout::default(),
            directive: DirectiveTemplate::default(),
            exclude: Vec::new(),
            strategy: InstallStrategy::default(),
        }
    }

    /// Root of the generated tree that is reconciled and installed.
    pub fn source_root(&self, output_dir: &Utf8Path) -> Utf8PathBuf {
        match &self.source_subpath {
            Some(sub) => output_dir.join(sub),
            None => output_dir.to_path_buf(),
        }
    }
}

/// Settings shared by every target in a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub staging_root: Utf8PathBuf,
    /// Leave per-target staging directories in place after the run.
    pub keep_staging: bool,
    pub rewriter: RewriterConfig,
    pub targets: Vec<TargetSettings>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            staging_root: Utf8PathBuf::from("target/genfix-staging"),
            keep_staging: false,
            rewriter: RewriterConfig::default(),
            targets: Vec::new(),
        }
    }
}
