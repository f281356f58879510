use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use genfix_types::ledger::ContractRef;
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

/// The only specification version the generator accepts.
pub const DEFAULT_SPEC_VERSION: &str = "3.0.0";

const VERSION_KEY: &str = "openapi";

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("contract unreadable: {path}: {reason}")]
    Unreadable { path: Utf8PathBuf, reason: String },

    #[error("serialize contract {path}: {reason}")]
    Serialize { path: Utf8PathBuf, reason: String },
}

/// A parsed contract plus the exact bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct Contract {
    path: Utf8PathBuf,
    raw: Vec<u8>,
    document: Value,
    declared_version: Option<String>,
}

impl Contract {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    /// Version the source declared before normalization, if any.
    pub fn declared_version(&self) -> Option<&str> {
        self.declared_version.as_deref()
    }

    pub fn spec_version(&self) -> Option<&str> {
        self.document.get(VERSION_KEY).and_then(Value::as_str)
    }

    pub fn sha256(&self) -> String {
        genfix_hash::sha256_hex(&self.raw)
    }

    pub fn contract_ref(&self) -> ContractRef {
        ContractRef {
            path: self.path.clone(),
            sha256: Some(self.sha256()),
            declared_version: self.declared_version.clone(),
        }
    }

    /// `components.schemas`, if the document declares any types.
    pub fn schemas(&self) -> Option<&Mapping> {
        self.document
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_mapping)
    }

    pub fn schemas_mut(&mut self) -> Option<&mut Mapping> {
        self.document
            .get_mut("components")
            .and_then(|c| c.get_mut("schemas"))
            .and_then(Value::as_mapping_mut)
    }

    /// Serialize the (possibly mutated) document back to YAML for the generator.
    pub fn to_yaml(&self) -> Result<String, ContractError> {
        serde_yaml::to_string(&self.document).map_err(|e| ContractError::Serialize {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// Read and parse a contract document, forcing its spec version to `spec_version`.
pub fn load_contract(path: &Utf8Path, spec_version: &str) -> Result<Contract, ContractError> {
    let raw = fs::read(path).map_err(|e| ContractError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_contract(path, raw, spec_version)
}

/// Parse contract bytes (YAML or JSON). `path` is only used for identity and messages.
pub fn parse_contract(
    path: &Utf8Path,
    raw: Vec<u8>,
    spec_version: &str,
) -> Result<Contract, ContractError> {
    let unreadable = |reason: String| ContractError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut document: Value = serde_yaml::from_slice(&raw).map_err(|e| unreadable(e.to_string()))?;
    let root = document
        .as_mapping_mut()
        .ok_or_else(|| unreadable("document root is not a mapping".to_string()))?;

    let declared_version = root.get(VERSION_KEY).map(version_label);
    root.insert(
        Value::String(VERSION_KEY.to_string()),
        Value::String(spec_version.to_string()),
    );

    debug!(
        path = %path,
        declared = declared_version.as_deref().unwrap_or("<none>"),
        normalized = spec_version,
        "loaded contract"
    );

    Ok(Contract {
        path: path.to_path_buf(),
        raw,
        document,
        declared_version,
    })
}

fn version_label(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
