use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed, per-target parameter set handed to the external generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorParams {
    /// Output flavor selector (e.g. `csharp-netcore`).
    pub flavor: String,

    /// Package/module identity string.
    pub package: String,

    /// Enables per-field default-emission directives for optional fields.
    #[serde(default = "default_true")]
    pub optional_emit_default_values: bool,

    /// Enables discriminator-based type lookup for tagged unions.
    #[serde(default = "default_true")]
    pub use_one_of_discriminator_lookup: bool,

    /// Runtime validation code generation.
    #[serde(default)]
    pub validatable: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_properties: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl GeneratorParams {
    pub fn new(flavor: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            flavor: flavor.into(),
            package: package.into(),
            optional_emit_default_values: true,
            use_one_of_discriminator_lookup: true,
            validatable: false,
            additional_properties: BTreeMap::new(),
            global_properties: vec![],
        }
    }

    /// Comma-joined `key=value` list: fixed keys first, then extra keys sorted.
    pub fn additional_properties_arg(&self) -> String {
        let mut parts = vec![
            format!("packageName={}", self.package),
            format!(
                "optionalEmitDefaultValues={}",
                self.optional_emit_default_values
            ),
            format!(
                "useOneOfDiscriminatorLookup={}",
                self.use_one_of_discriminator_lookup
            ),
            format!("validatable={}", self.validatable),
        ];
        for (k, v) in &self.additional_properties {
            parts.push(format!("{k}={v}"));
        }
        parts.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::GeneratorParams;

    #[test]
    fn additional_properties_are_deterministic() {
        let mut p = GeneratorParams::new("csharp-netcore", "Acme.Sdk");
        p.additional_properties
            .insert("targetFramework".to_string(), "net8.0".to_string());
        p.additional_properties
            .insert("nullableReferenceTypes".to_string(), "false".to_string());
        assert_eq!(
            p.additional_properties_arg(),
            "packageName=Acme.Sdk,optionalEmitDefaultValues=true,\
             useOneOfDiscriminatorLookup=true,validatable=false,\
             nullableReferenceTypes=false,targetFramework=net8.0"
        );
    }
}
