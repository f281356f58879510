//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates.
//! The helpers here are shared by the step definitions.

use camino::Utf8Path;
use fs_err as fs;
use genfix_core::GeneratorError;
use genfix_core::adapters::StubGenerator;
use genfix_core::ports::{GenerationRequest, Generator};
use std::collections::BTreeMap;

/// Every file under `dir`, keyed by `/`-separated relative path.
pub fn snapshot_tree(dir: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    if dir.is_dir() {
        collect(dir, dir, &mut out);
    }
    out
}

fn collect(root: &Utf8Path, dir: &Utf8Path, out: &mut BTreeMap<String, Vec<u8>>) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, path, out);
        } else if let (Ok(rel), Ok(bytes)) = (path.strip_prefix(root), fs::read(path)) {
            out.insert(rel.as_str().replace('\\', "/"), bytes);
        }
    }
}

/// Stub generator output with every `DataMember` line removed, as a generator
/// upgrade that changed its directive shape would produce.
#[derive(Debug, Default)]
pub struct DirectivelessGenerator;

impl Generator for DirectivelessGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<(), GeneratorError> {
        StubGenerator.generate(request)?;
        let tree = snapshot_tree(request.output_dir);
        for (rel, bytes) in tree {
            if !rel.ends_with(".cs") {
                continue;
            }
            let text = String::from_utf8_lossy(&bytes);
            let kept: Vec<&str> = text
                .lines()
                .filter(|l| !l.contains("[DataMember("))
                .collect();
            fs::write(request.output_dir.join(&rel), kept.join("\n")).map_err(|e| {
                GeneratorError::Failed {
                    status: "in-process".to_string(),
                    stderr: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}
