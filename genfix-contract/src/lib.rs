//! Contract document loading.
//!
//! The contract is held as a `serde_yaml::Value` rather than a fully typed OpenAPI model:
//! genfix only ever touches `openapi` and `components.schemas.*.properties.*.nullable`, and
//! everything else must survive the round trip to the generator untouched and in order.

mod load;
mod schema;

pub use load::{Contract, ContractError, DEFAULT_SPEC_VERSION, load_contract, parse_contract};
pub use schema::{FieldDef, TypeDef, classify_field, is_nullable, required_names, type_definitions};
