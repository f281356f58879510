//! Read-only typed view over `components.schemas`.
//!
//! Only locally declared shape is inspected. A field defined via `$ref` (or a
//! composition keyword) is classified as `Reference` and its target schema is not
//! followed, so aliased scalars are seen as references, never as scalars.

use genfix_types::field::FieldKind;
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub required: Vec<String>,
}

const COMPOSITION_KEYS: [&str; 3] = ["allOf", "oneOf", "anyOf"];

/// Classify a property schema into the closed `FieldKind` set.
pub fn classify_field(schema: &Value) -> FieldKind {
    if schema.get("$ref").is_some() || COMPOSITION_KEYS.iter().any(|k| schema.get(*k).is_some()) {
        return FieldKind::Reference;
    }
    match schema.get("type").and_then(Value::as_str) {
        Some("number") => FieldKind::Number,
        Some("integer") => FieldKind::Integer,
        Some("boolean") => FieldKind::Boolean,
        Some("string") => FieldKind::String,
        Some("array") => FieldKind::Array,
        _ => FieldKind::Object,
    }
}

/// `nullable: true` is the only value that counts as set.
pub fn is_nullable(schema: &Value) -> bool {
    schema.get("nullable").and_then(Value::as_bool) == Some(true)
}

/// Names listed under a type schema's `required`.
pub fn required_names(type_schema: &Value) -> Vec<String> {
    type_schema
        .get("required")
        .and_then(Value::as_sequence)
        .map(|seq| {
            seq.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// All declared types and their fields, in document order.
pub fn type_definitions(schemas: &Mapping) -> Vec<TypeDef> {
    schemas
        .iter()
        .filter_map(|(name, schema)| {
            let name = name.as_str()?;
            let required = required_names(schema);
            let fields = schema
                .get("properties")
                .and_then(Value::as_mapping)
                .map(|props| {
                    props
                        .iter()
                        .filter_map(|(field, prop)| {
                            let field = field.as_str()?;
                            Some(FieldDef {
                                name: field.to_string(),
                                kind: classify_field(prop),
                                nullable: is_nullable(prop),
                                required: required.iter().any(|r| r == field),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Some(TypeDef {
                name: name.to_string(),
                fields,
                required,
            })
        })
        .collect()
}
