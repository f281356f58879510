use crate::error::{ReconcileError, ReconcileResult};
use camino::Utf8PathBuf;
use serde::Deserialize;

/// Placeholder replaced with the field name when rendering a directive.
pub const FIELD_PLACEHOLDER: &str = "{field}";

/// Textual form of a field's serialization directive, as the generator renders it.
///
/// This is coupled to one generator version. When the generator changes its output,
/// reconciliation fails with a mismatch instead of silently matching nothing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectiveTemplate {
    pub emit_on: String,
    pub emit_off: String,
}

impl Default for DirectiveTemplate {
    fn default() -> Self {
        Self {
            emit_on: r#"[DataMember(Name = "{field}", EmitDefaultValue = true)]"#.to_string(),
            emit_off: r#"[DataMember(Name = "{field}", EmitDefaultValue = false)]"#.to_string(),
        }
    }
}

impl DirectiveTemplate {
    pub fn validate(&self) -> ReconcileResult<()> {
        for (label, t) in [("emit_on", &self.emit_on), ("emit_off", &self.emit_off)] {
            if !t.contains(FIELD_PLACEHOLDER) {
                return Err(ReconcileError::Template(format!(
                    "{label} does not contain {FIELD_PLACEHOLDER}"
                )));
            }
        }
        if self.emit_on == self.emit_off {
            return Err(ReconcileError::Template(
                "emit_on and emit_off are identical".to_string(),
            ));
        }
        Ok(())
    }

    pub fn on(&self, field: &str) -> String {
        self.emit_on.replace(FIELD_PLACEHOLDER, field)
    }

    pub fn off(&self, field: &str) -> String {
        self.emit_off.replace(FIELD_PLACEHOLDER, field)
    }
}

/// Where the generator puts the artifact for a declared type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactLayout {
    pub model_subpath: Utf8PathBuf,
    pub extension: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            model_subpath: Utf8PathBuf::from("Model"),
            extension: "cs".to_string(),
        }
    }
}

impl ArtifactLayout {
    /// `<model_subpath>/<TypeName>.<ext>`, relative to the reconcile root.
    pub fn artifact_path(&self, type_name: &str) -> Utf8PathBuf {
        self.model_subpath
            .join(format!("{}.{}", type_name, self.extension.trim_start_matches('.')))
    }
}
