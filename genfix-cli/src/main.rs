mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use fs_err as fs;
use genfix_contract::{DEFAULT_SPEC_VERSION, load_contract};
use genfix_core::PipelineError;
use genfix_core::adapters::{FsWritePort, ProcessGenerator};
use genfix_core::pipeline::{CONTRACT_FILE, run_all, write_ledger, write_reconcile, write_report};
use genfix_domain::Rewriter;
use genfix_edit::{ArtifactLayout, ReconcileOptions, reconcile};
use genfix_install::{ExcludeSet, InstallStrategy, install};
use genfix_types::ledger::CorrespondenceLedger;
use genfix_types::tool::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "genfix",
    version,
    about = "Regenerate OpenAPI client models so optional scalars are omitted when unset."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full pipeline for every configured target (or those selected).
    Run(RunArgs),
    /// Rewrite a contract and write the mutated contract plus its ledger.
    Rewrite(RewriteArgs),
    /// Flip emit-defaults directives in a generated tree using a persisted ledger.
    Reconcile(ReconcileArgs),
    /// Replace a destination with a generated tree, minus excluded files.
    Install(InstallArgs),
    /// List configured targets.
    ListTargets(ListTargetsArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Project root containing genfix.toml (default: current directory).
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Explicit config file (default: <root>/genfix.toml).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Only run the named target. May be repeated.
    #[arg(long = "target")]
    targets: Vec<String>,

    /// Keep per-target staging directories for inspection.
    #[arg(long, default_value_t = false)]
    keep_staging: bool,

    /// Staging root (default: from config, else <root>/target/genfix-staging).
    #[arg(long)]
    staging_root: Option<Utf8PathBuf>,

    /// Directory for report.json and report.md (default: staging root).
    #[arg(long)]
    report_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct RewriteArgs {
    /// Source contract (YAML or JSON).
    #[arg(long)]
    contract: Utf8PathBuf,

    /// Output directory for contract.yaml, ledger.json and ledger.md.
    #[arg(long)]
    out_dir: Utf8PathBuf,

    /// Specification version written into the mutated contract.
    #[arg(long, default_value = DEFAULT_SPEC_VERSION)]
    spec_version: String,

    /// Project root whose genfix.toml supplies [rewriter] settings.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct ReconcileArgs {
    /// Persisted ledger (ledger.json).
    #[arg(long)]
    ledger: Utf8PathBuf,

    /// Root of the generated tree.
    #[arg(long)]
    root: Utf8PathBuf,

    /// Model directory relative to the root.
    #[arg(long, default_value = "Model")]
    model_subpath: Utf8PathBuf,

    /// Artifact file extension.
    #[arg(long, default_value = "cs")]
    extension: String,

    /// Report what would change without writing.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write reconcile.json, reconcile.md and patch.diff here.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct InstallArgs {
    /// Generated tree to install.
    #[arg(long)]
    from: Utf8PathBuf,

    /// Destination directory; its contents are replaced.
    #[arg(long)]
    to: Utf8PathBuf,

    /// Glob of files to leave out. May be repeated.
    #[arg(long)]
    exclude: Vec<String>,

    #[arg(long, value_enum, default_value = "swap")]
    strategy: StrategyArg,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    Swap,
    RemoveThenCopy,
}

impl From<StrategyArg> for InstallStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Swap => InstallStrategy::Swap,
            StrategyArg::RemoveThenCopy => InstallStrategy::RemoveThenCopy,
        }
    }
}

#[derive(Debug, Parser)]
struct ListTargetsArgs {
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn real_main() -> Result<u8, PipelineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Rewrite(args) => cmd_rewrite(args).map(|()| 0),
        Command::Reconcile(args) => cmd_reconcile(args).map(|()| 0),
        Command::Install(args) => cmd_install(args).map(|()| 0),
        Command::ListTargets(args) => cmd_list_targets(args).map(|()| 0),
    }
}

fn tool() -> ToolInfo {
    ToolInfo::genfix(env!("CARGO_PKG_VERSION"))
}

fn load_config(
    root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<config::GenfixConfig> {
    match explicit {
        Some(path) => config::load_config(path),
        None => config::load_or_default(root).context("load genfix.toml config"),
    }
}

fn cmd_run(args: RunArgs) -> Result<u8, PipelineError> {
    let file_config = load_config(&args.root, args.config.as_deref())?;
    if file_config.targets.is_empty() {
        return Err(anyhow::anyhow!("no [[targets]] configured under {}", args.root).into());
    }

    let merged = ConfigMerger::new(file_config).merge_run_args(
        &args.root,
        &args.targets,
        args.keep_staging,
        args.staging_root,
    )?;
    debug!(
        "merged config: targets={}, staging_root={}, keep_staging={}",
        merged.run.targets.len(),
        merged.run.staging_root,
        merged.run.keep_staging
    );

    let generator = ProcessGenerator::new(merged.generator_command.clone());
    let outcome = run_all(&merged.run, &generator, &FsWritePort, tool());

    let report_dir = args
        .report_dir
        .unwrap_or_else(|| merged.run.staging_root.clone());
    write_report(&outcome.report, &report_dir, &FsWritePort)?;
    info!(path = %report_dir.join("report.json"), "wrote run report");

    for t in &outcome.report.targets {
        match &t.error_kind {
            None => println!(
                "{}: ok ({} nullable, {} patched, {} files)",
                t.name, t.ledger_entries, t.patched, t.files_installed
            ),
            Some(kind) => println!("{}: failed ({})", t.name, kind),
        }
    }

    Ok(outcome.exit_code() as u8)
}

fn cmd_rewrite(args: RewriteArgs) -> Result<(), PipelineError> {
    let file_config = config::load_or_default(&args.root).context("load genfix.toml config")?;
    let mut contract = load_contract(&args.contract, &args.spec_version)?;
    let outcome = Rewriter::with_config(file_config.rewriter).rewrite(&mut contract, tool());

    fs::create_dir_all(&args.out_dir).with_context(|| format!("create {}", args.out_dir))?;
    let yaml = contract
        .to_yaml()
        .map_err(|e| anyhow::Error::new(e).context("serialize rewritten contract"))?;
    fs::write(args.out_dir.join(CONTRACT_FILE), yaml)
        .with_context(|| format!("write {}", args.out_dir.join(CONTRACT_FILE)))?;
    write_ledger(&outcome.ledger, &args.out_dir, &FsWritePort)?;

    println!(
        "{} field(s) made nullable out of {} examined",
        outcome.ledger.len(),
        outcome.fields_examined
    );
    Ok(())
}

fn cmd_reconcile(args: ReconcileArgs) -> Result<(), PipelineError> {
    let json =
        fs::read_to_string(&args.ledger).with_context(|| format!("read {}", args.ledger))?;
    let ledger: CorrespondenceLedger =
        serde_json::from_str(&json).with_context(|| format!("parse ledger {}", args.ledger))?;

    let opts = ReconcileOptions {
        layout: ArtifactLayout {
            model_subpath: args.model_subpath,
            extension: args.extension,
        },
        dry_run: args.dry_run,
        ..ReconcileOptions::default()
    };
    let outcome = reconcile(&args.root, &ledger, &opts, tool())?;

    if let Some(out_dir) = &args.out_dir {
        write_reconcile(&outcome.record, &outcome.patch, out_dir, &FsWritePort)?;
    }
    if args.dry_run {
        print!("{}", outcome.patch);
    }
    println!(
        "{} patched, {} already reconciled, {} file(s) modified{}",
        outcome.record.summary.patched,
        outcome.record.summary.already_reconciled,
        outcome.record.summary.files_modified,
        if args.dry_run { " (dry run)" } else { "" }
    );
    Ok(())
}

fn cmd_install(args: InstallArgs) -> Result<(), PipelineError> {
    let exclude = ExcludeSet::new(&args.exclude)?;
    let report = install(&args.from, &args.to, &exclude, args.strategy.into())?;
    println!(
        "installed {} file(s) into {} ({} excluded)",
        report.files_installed, report.destination, report.files_excluded
    );
    Ok(())
}

fn cmd_list_targets(args: ListTargetsArgs) -> Result<(), PipelineError> {
    let file_config = load_config(&args.root, args.config.as_deref())?;
    match args.format {
        OutputFormat::Text => {
            for t in &file_config.targets {
                println!(
                    "{}\t{}\t{} -> {}",
                    t.name, t.flavor, t.contract, t.destination
                );
            }
        }
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = file_config
                .targets
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name,
                        "flavor": t.flavor,
                        "package": t.package,
                        "contract": t.contract,
                        "destination": t.destination,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&items).context("serialize targets")?;
            println!("{}", json);
        }
    }
    Ok(())
}
