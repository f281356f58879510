use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::Path;
use std::process::Command as ProcessCommand;

const SAMPLE_CONFIG: &str = r#"[generator]
command = ["openapi-generator-cli"]

[rewriter]
exempt_suffixes = ["OptIns", "Options"]
nullable_kinds = ["number", "integer", "boolean"]

[staging]
root = "target/genfix-staging"
keep = false

[[targets]]
name = "core-api-sdk"
contract = "specs/core-api-spec.yaml"
destination = "src/Acme.CoreApiSdk/generated"
package = "Acme.CoreApiSdk"
flavor = "csharp-netcore"
source_subpath = "src/Acme.CoreApiSdk"
exclude = ["*.csproj"]
additional_properties = { targetFramework = "net8.0" }
"#;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by genfix artifacts.
    PrintSchemas,
    /// Write a starter genfix.toml (refuses to overwrite).
    InitConfig {
        #[arg(long, default_value = "genfix.toml")]
        path: String,
    },
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", genfix_types::schema::GENFIX_LEDGER_V1);
            println!("{}", genfix_types::schema::GENFIX_RECONCILE_V1);
            println!("{}", genfix_types::schema::GENFIX_REPORT_V1);
        }
        Command::InitConfig { path } => {
            if Path::new(&path).exists() {
                anyhow::bail!("{path} already exists");
            }
            fs::write(&path, SAMPLE_CONFIG).with_context(|| format!("write {path}"))?;
            println!("wrote {path}");
        }
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "genfix-domain", "--test", "golden_fixtures"])
                .env("GENFIX_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
    }
    Ok(())
}
