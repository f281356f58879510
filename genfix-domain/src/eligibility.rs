use genfix_contract::FieldDef;
use genfix_types::field::FieldKind;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    /// Types whose name ends with one of these are option/flag bundles: zero means absent
    /// there on purpose, so their fields are never rewritten.
    pub exempt_suffixes: Vec<String>,

    /// Declared kinds eligible for rewriting.
    pub nullable_kinds: Vec<FieldKind>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            exempt_suffixes: vec!["OptIns".to_string(), "Options".to_string()],
            nullable_kinds: FieldKind::ALL
                .into_iter()
                .filter(|k| k.is_zero_defaulting_scalar())
                .collect(),
        }
    }
}

/// Outcome of the eligibility predicate for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Eligible,
    Required,
    AlreadyNullable,
    IneligibleKind(FieldKind),
    ExemptType { suffix: String },
}

impl Decision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Decision::Eligible)
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Decision::Eligible => "eligible",
            Decision::Required => "required",
            Decision::AlreadyNullable => "already_nullable",
            Decision::IneligibleKind(_) => "ineligible_kind",
            Decision::ExemptType { .. } => "exempt_type",
        }
    }
}

impl RewriterConfig {
    pub fn exempt_suffix_of(&self, type_name: &str) -> Option<&str> {
        self.exempt_suffixes
            .iter()
            .map(String::as_str)
            .find(|s| !s.is_empty() && type_name.ends_with(s))
    }

    /// Type exemption is checked first so exempt types never reach the field checks.
    pub fn decide(&self, type_name: &str, field: &FieldDef) -> Decision {
        if let Some(suffix) = self.exempt_suffix_of(type_name) {
            return Decision::ExemptType {
                suffix: suffix.to_string(),
            };
        }
        if field.required {
            return Decision::Required;
        }
        if field.nullable {
            return Decision::AlreadyNullable;
        }
        // References are never followed; a `$ref` to a scalar schema stays un-rewritten.
        if !self.nullable_kinds.contains(&field.kind) {
            return Decision::IneligibleKind(field.kind);
        }
        Decision::Eligible
    }
}
