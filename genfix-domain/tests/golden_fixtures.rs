//! Golden fixture tests for the nullability rewriter.
//!
//! Each fixture under `tests/fixtures/<name>/` contains:
//!
//! - `contract.yaml` - the source contract
//! - `expected/ledger.json` - the expected ledger entries, in order
//! - `expected/contract.yaml` - the expected contract after rewriting
//!
//! Set `GENFIX_BLESS=1` to overwrite the expected files with current output.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use genfix_contract::{DEFAULT_SPEC_VERSION, load_contract};
use genfix_domain::Rewriter;
use genfix_types::tool::ToolInfo;
use pretty_assertions::assert_eq;

fn fixtures_root() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("tests")
        .join("fixtures")
}

fn blessing() -> bool {
    std::env::var("GENFIX_BLESS").is_ok_and(|v| v == "1")
}

fn run_fixture(name: &str) {
    let dir = fixtures_root().join(name);
    let expected_dir = dir.join("expected");

    let mut contract = load_contract(&dir.join("contract.yaml"), DEFAULT_SPEC_VERSION).unwrap();
    let outcome = Rewriter::new().rewrite(&mut contract, ToolInfo::genfix("0.0.0"));

    let entries = serde_json::to_value(outcome.ledger.entries()).unwrap();
    let rewritten = contract.to_yaml().unwrap();

    if blessing() {
        fs::write(
            expected_dir.join("ledger.json"),
            serde_json::to_string_pretty(&entries).unwrap() + "\n",
        )
        .unwrap();
        fs::write(expected_dir.join("contract.yaml"), &rewritten).unwrap();
        return;
    }

    let expected_entries: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(expected_dir.join("ledger.json")).unwrap())
            .unwrap();
    assert_eq!(entries, expected_entries, "ledger mismatch for fixture {name}");

    let expected_contract: serde_yaml::Value =
        serde_yaml::from_str(&fs::read_to_string(expected_dir.join("contract.yaml")).unwrap())
            .unwrap();
    assert_eq!(
        contract.document(),
        &expected_contract,
        "rewritten contract mismatch for fixture {name}"
    );
}

#[test]
fn golden_account_balance() {
    run_fixture("account_balance");
}

#[test]
fn golden_option_bundles() {
    run_fixture("option_bundles");
}

#[test]
fn golden_reference_gap() {
    run_fixture("reference_gap");
}
