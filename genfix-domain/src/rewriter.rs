use crate::eligibility::RewriterConfig;
use genfix_contract::{Contract, FieldDef, classify_field, is_nullable, required_names};
use genfix_types::ledger::{CorrespondenceLedger, LedgerEntry};
use genfix_types::tool::ToolInfo;
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Ledger plus per-reason counts of the fields that were left alone.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub ledger: CorrespondenceLedger,
    pub fields_examined: u64,
    pub skipped: BTreeMap<&'static str, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    config: RewriterConfig,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RewriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    /// Mark every eligible field `nullable: true`, in document order, and record each edit.
    ///
    /// A field is appended to the ledger only after its schema was actually mutated, so the
    /// ledger is exactly the set of edits. Each (type, field) is visited once.
    pub fn rewrite(&self, contract: &mut Contract, tool: ToolInfo) -> RewriteOutcome {
        let mut outcome = RewriteOutcome {
            ledger: CorrespondenceLedger::new(tool, contract.contract_ref()),
            fields_examined: 0,
            skipped: BTreeMap::new(),
        };

        let Some(schemas) = contract.schemas_mut() else {
            debug!("contract declares no component schemas");
            return outcome;
        };

        for (type_key, type_schema) in schemas.iter_mut() {
            let Some(type_name) = type_key.as_str() else {
                continue;
            };
            let required = required_names(type_schema);
            let Some(props) = type_schema
                .get_mut("properties")
                .and_then(Value::as_mapping_mut)
            else {
                continue;
            };

            for (field_key, prop) in props.iter_mut() {
                let Some(field_name) = field_key.as_str() else {
                    continue;
                };
                outcome.fields_examined += 1;

                let field = FieldDef {
                    name: field_name.to_string(),
                    kind: classify_field(prop),
                    nullable: is_nullable(prop),
                    required: required.iter().any(|r| r == field_name),
                };

                let decision = self.config.decide(type_name, &field);
                if decision.is_eligible() && mark_nullable(prop) {
                    debug!(type_name, field_name, kind = %field.kind, "marked nullable");
                    outcome
                        .ledger
                        .record(LedgerEntry::new(type_name, field_name));
                } else {
                    *outcome.skipped.entry(decision.reason()).or_insert(0) += 1;
                }
            }
        }

        info!(
            examined = outcome.fields_examined,
            rewritten = outcome.ledger.len(),
            "nullability rewrite complete"
        );
        outcome
    }
}

fn mark_nullable(prop: &mut Value) -> bool {
    match prop.as_mapping_mut() {
        Some(map) => {
            map.insert(Value::String("nullable".to_string()), Value::Bool(true));
            true
        }
        None => false,
    }
}
