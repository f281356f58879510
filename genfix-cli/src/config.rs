//! Configuration file loading for genfix.
//!
//! Discovers and loads `genfix.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use genfix_contract::DEFAULT_SPEC_VERSION;
use genfix_core::settings::{RunSettings, TargetSettings};
use genfix_core::{ArtifactLayout, DirectiveTemplate, InstallStrategy, RewriterConfig};
use genfix_install::validate_staging_name;
use genfix_types::params::GeneratorParams;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "genfix.toml";

/// Top-level configuration from genfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenfixConfig {
    pub generator: GeneratorConfig,
    pub rewriter: RewriterConfig,
    pub staging: StagingConfig,
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Argv prefix used to invoke the generator.
    pub command: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: vec!["openapi-generator-cli".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub root: Utf8PathBuf,
    /// Leave staging directories in place after the run.
    pub keep: bool,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("target/genfix-staging"),
            keep: false,
        }
    }
}

/// One `[[targets]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub contract: Utf8PathBuf,
    pub destination: Utf8PathBuf,
    pub package: String,

    #[serde(default = "default_flavor")]
    pub flavor: String,

    #[serde(default)]
    pub source_subpath: Option<Utf8PathBuf>,

    #[serde(default = "default_model_subpath")]
    pub model_subpath: Utf8PathBuf,

    #[serde(default = "default_extension")]
    pub extension: String,

    /// Globs left out of the install. Unset means the flavor's default.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    #[serde(default)]
    pub additional_properties: BTreeMap<String, String>,

    #[serde(default)]
    pub global_properties: Vec<String>,

    #[serde(default = "default_spec_version")]
    pub spec_version: String,

    #[serde(default)]
    pub directive: Option<DirectiveTemplate>,

    #[serde(default)]
    pub strategy: InstallStrategy,
}

fn default_flavor() -> String {
    "csharp-netcore".to_string()
}

fn default_model_subpath() -> Utf8PathBuf {
    Utf8PathBuf::from("Model")
}

fn default_extension() -> String {
    "cs".to_string()
}

/// C# flavors emit a project file alongside the sources; the destination keeps its own.
fn default_exclude(flavor: &str) -> Vec<String> {
    if flavor.starts_with("csharp") {
        vec!["*.csproj".to_string()]
    } else {
        vec![]
    }
}

fn default_spec_version() -> String {
    DEFAULT_SPEC_VERSION.to_string()
}

impl TargetConfig {
    /// Resolve into pipeline settings, with relative paths taken from `root`.
    pub fn to_settings(&self, root: &Utf8Path) -> TargetSettings {
        let mut params = GeneratorParams::new(&self.flavor, &self.package);
        params.additional_properties = self.additional_properties.clone();
        params.global_properties = self.global_properties.clone();

        let mut settings = TargetSettings::new(
            &self.name,
            resolve(root, &self.contract),
            resolve(root, &self.destination),
            params,
        );
        settings.spec_version = self.spec_version.clone();
        settings.source_subpath = self.source_subpath.clone();
        settings.layout = ArtifactLayout {
            model_subpath: self.model_subpath.clone(),
            extension: self.extension.clone(),
        };
        settings.directive = self.directive.clone().unwrap_or_default();
        settings.exclude = self
            .exclude
            .clone()
            .unwrap_or_else(|| default_exclude(&self.flavor));
        settings.strategy = self.strategy;
        settings
    }
}

fn resolve(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Discover the genfix.toml config file.
///
/// Searches for `genfix.toml` in the project root directory.
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a genfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<GenfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<GenfixConfig> {
    let config: GenfixConfig = toml::from_str(contents).context("invalid TOML")?;
    let mut seen = Vec::new();
    for t in &config.targets {
        validate_staging_name(&t.name)
            .with_context(|| format!("target name `{}` cannot name a directory", t.name))?;
        if seen.contains(&t.name.as_str()) {
            bail!("duplicate target name `{}`", t.name);
        }
        seen.push(t.name.as_str());
    }
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<GenfixConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(GenfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub generator_command: Vec<String>,
    pub run: RunSettings,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: GenfixConfig,
}

impl ConfigMerger {
    pub fn new(config: GenfixConfig) -> Self {
        Self { config }
    }

    /// Merge with `run` arguments.
    ///
    /// `selected` restricts the run to the named targets, in config order; naming an
    /// unknown target is an error. `keep_staging` only ever turns retention on.
    pub fn merge_run_args(
        self,
        root: &Utf8Path,
        selected: &[String],
        keep_staging: bool,
        staging_root: Option<Utf8PathBuf>,
    ) -> anyhow::Result<MergedConfig> {
        for name in selected {
            if !self.config.targets.iter().any(|t| &t.name == name) {
                bail!("unknown target `{}`", name);
            }
        }

        let targets = self
            .config
            .targets
            .iter()
            .filter(|t| selected.is_empty() || selected.contains(&t.name))
            .map(|t| t.to_settings(root))
            .collect();

        let staging_root = staging_root.unwrap_or(self.config.staging.root);
        Ok(MergedConfig {
            generator_command: self.config.generator.command,
            run: RunSettings {
                staging_root: resolve(root, &staging_root),
                keep_staging: keep_staging || self.config.staging.keep,
                rewriter: self.config.rewriter,
                targets,
            },
        })
    }
}
