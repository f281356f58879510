//! Property-based tests for ledger completeness and exactness.
//!
//! These tests verify that:
//! - Every field the rewriter marks nullable has exactly one ledger entry
//! - No ledger entry exists for a field that was not modified
//! - Rewriting the rewritten contract records nothing further

use camino::Utf8Path;
use genfix_contract::{Contract, parse_contract, type_definitions};
use genfix_domain::{Rewriter, RewriterConfig};
use genfix_types::field::FieldKind;
use genfix_types::tool::ToolInfo;
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct GenField {
    name: String,
    kind: FieldKind,
    nullable: Option<bool>,
    required: bool,
}

#[derive(Debug, Clone)]
struct GenType {
    name: String,
    fields: Vec<GenField>,
}

fn arb_kind() -> impl Strategy<Value = FieldKind> {
    prop::sample::select(FieldKind::ALL.to_vec())
}

fn arb_field() -> impl Strategy<Value = GenField> {
    (
        "[a-z][a-z_]{0,8}",
        arb_kind(),
        prop::option::of(any::<bool>()),
        any::<bool>(),
    )
        .prop_map(|(name, kind, nullable, required)| GenField {
            name,
            kind,
            nullable,
            required,
        })
}

fn arb_type() -> impl Strategy<Value = GenType> {
    (
        "[A-Z][a-z]{0,6}",
        prop::sample::select(vec!["", "Options", "OptIns", "Request"]),
        prop::collection::vec(arb_field(), 0..6),
    )
        .prop_map(|(stem, suffix, mut fields)| {
            let mut seen = BTreeSet::new();
            fields.retain(|f| seen.insert(f.name.clone()));
            GenType {
                name: format!("{stem}{suffix}"),
                fields,
            }
        })
}

fn arb_types() -> impl Strategy<Value = Vec<GenType>> {
    prop::collection::vec(arb_type(), 0..6).prop_map(|mut types| {
        let mut seen = BTreeSet::new();
        types.retain(|t| seen.insert(t.name.clone()));
        types
    })
}

fn field_schema(f: &GenField) -> Value {
    let mut m = Mapping::new();
    match f.kind {
        FieldKind::Reference => {
            m.insert("$ref".into(), "#/components/schemas/Other".into());
        }
        kind => {
            m.insert("type".into(), kind.as_str().into());
        }
    }
    if let Some(n) = f.nullable {
        m.insert("nullable".into(), Value::Bool(n));
    }
    Value::Mapping(m)
}

fn build_contract(types: &[GenType]) -> Contract {
    let mut schemas = Mapping::new();
    for t in types {
        let mut props = Mapping::new();
        let mut required = Vec::new();
        for f in &t.fields {
            props.insert(f.name.as_str().into(), field_schema(f));
            if f.required {
                required.push(Value::from(f.name.as_str()));
            }
        }
        let mut ty = Mapping::new();
        ty.insert("type".into(), "object".into());
        ty.insert("required".into(), Value::Sequence(required));
        ty.insert("properties".into(), Value::Mapping(props));
        schemas.insert(t.name.as_str().into(), Value::Mapping(ty));
    }
    let mut components = Mapping::new();
    components.insert("schemas".into(), Value::Mapping(schemas));
    let mut root = Mapping::new();
    root.insert("openapi".into(), "3.1.0".into());
    root.insert("components".into(), Value::Mapping(components));

    let raw = serde_yaml::to_string(&Value::Mapping(root)).unwrap();
    parse_contract(Utf8Path::new("gen.yaml"), raw.into_bytes(), "3.0.0").unwrap()
}

fn expected_pairs(types: &[GenType]) -> Vec<(String, String)> {
    let exempt = |name: &str| name.ends_with("Options") || name.ends_with("OptIns");
    let mut out = Vec::new();
    for t in types {
        if exempt(&t.name) {
            continue;
        }
        for f in &t.fields {
            if !f.required && f.nullable != Some(true) && f.kind.is_zero_defaulting_scalar() {
                out.push((t.name.clone(), f.name.clone()));
            }
        }
    }
    out
}

fn nullable_pairs(contract: &Contract) -> BTreeSet<(String, String)> {
    let Some(schemas) = contract.schemas() else {
        return BTreeSet::new();
    };
    type_definitions(schemas)
        .into_iter()
        .flat_map(|t| {
            let name = t.name.clone();
            t.fields
                .into_iter()
                .filter(|f| f.nullable)
                .map(move |f| (name.clone(), f.name))
        })
        .collect()
}

proptest! {
    /// The ledger is exactly the predicate's selection, in document order.
    #[test]
    fn ledger_matches_predicate(types in arb_types()) {
        let mut contract = build_contract(&types);
        let out = Rewriter::with_config(RewriterConfig::default())
            .rewrite(&mut contract, ToolInfo::genfix("0.0.0"));

        let got: Vec<(String, String)> = out
            .ledger
            .entries()
            .iter()
            .map(|e| (e.type_name.clone(), e.field_name.clone()))
            .collect();
        prop_assert_eq!(got, expected_pairs(&types));
    }

    /// Fields that became nullable are exactly the ledger entries.
    #[test]
    fn ledger_is_exactly_the_mutation(types in arb_types()) {
        let mut contract = build_contract(&types);
        let before = nullable_pairs(&contract);
        let out = Rewriter::new().rewrite(&mut contract, ToolInfo::genfix("0.0.0"));
        let after = nullable_pairs(&contract);

        let newly: BTreeSet<_> = after.difference(&before).cloned().collect();
        let recorded: BTreeSet<_> = out
            .ledger
            .entries()
            .iter()
            .map(|e| (e.type_name.clone(), e.field_name.clone()))
            .collect();
        prop_assert_eq!(recorded.len(), out.ledger.len(), "duplicate ledger entries");
        prop_assert_eq!(newly, recorded);
        prop_assert!(before.is_subset(&after));
    }

    /// Rewriting is idempotent.
    #[test]
    fn second_rewrite_records_nothing(types in arb_types()) {
        let mut contract = build_contract(&types);
        let rewriter = Rewriter::new();
        rewriter.rewrite(&mut contract, ToolInfo::genfix("0.0.0"));
        let snapshot = contract.to_yaml().unwrap();

        let again = rewriter.rewrite(&mut contract, ToolInfo::genfix("0.0.0"));
        prop_assert!(again.ledger.is_empty());
        prop_assert_eq!(contract.to_yaml().unwrap(), snapshot);
    }
}
