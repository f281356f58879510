use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a contract field.
///
/// The set is closed: anything that is not a plain `type` declaration is either
/// a `Reference` (`$ref`, `allOf`, `oneOf`, `anyOf`) or a free-form `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Number,
    Integer,
    Boolean,
    String,
    Object,
    Array,
    Reference,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Number,
        FieldKind::Integer,
        FieldKind::Boolean,
        FieldKind::String,
        FieldKind::Object,
        FieldKind::Array,
        FieldKind::Reference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::String => "string",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
            FieldKind::Reference => "reference",
        }
    }

    /// Kinds whose zero value the generator emits when the field is absent.
    pub fn is_zero_defaulting_scalar(self) -> bool {
        matches!(
            self,
            FieldKind::Number | FieldKind::Integer | FieldKind::Boolean
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
