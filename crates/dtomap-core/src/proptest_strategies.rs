//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but valid schemas and records for property testing.

#![cfg(test)]

use crate::schema::{PlainFieldDef, PlainSchema, RichFieldDef, RichSchema};
use crate::types::{Record, ScalarType, Value};
use chrono::{TimeZone, Utc};
use proptest::collection::btree_map;
use proptest::prelude::*;

/// Strategy for generating scalar types
pub fn scalar_type_strategy() -> impl Strategy<Value = ScalarType> {
    prop_oneof![
        Just(ScalarType::Bool),
        Just(ScalarType::Int),
        Just(ScalarType::Float),
        Just(ScalarType::Text),
        Just(ScalarType::DateTime),
    ]
}

/// Strategy for generating a value of the given scalar type
pub fn value_strategy(ty: ScalarType) -> BoxedStrategy<Value> {
    match ty {
        ScalarType::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        ScalarType::Int => any::<i64>().prop_map(Value::Int).boxed(),
        // finite range keeps equality meaningful
        ScalarType::Float => (-1.0e9f64..1.0e9).prop_map(Value::Float).boxed(),
        ScalarType::Text => "[a-zA-Z0-9 .,!?]{0,40}".prop_map(Value::Text).boxed(),
        ScalarType::DateTime => (0i64..4_000_000_000)
            .prop_map(|secs| Value::DateTime(Utc.timestamp_opt(secs, 0).unwrap()))
            .boxed(),
    }
}

/// Strategy for generating field names with their types
///
/// Names are unique and sorted, so generated schemas are deterministic.
pub fn field_specs_strategy() -> impl Strategy<Value = Vec<(String, ScalarType)>> {
    btree_map("[a-z][a-z0-9_]{0,10}", scalar_type_strategy(), 1..8)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Strategy for generating a complete record of the given fields
pub fn record_strategy(
    schema: &str,
    fields: Vec<(String, ScalarType)>,
) -> impl Strategy<Value = Record> {
    let schema = schema.to_string();
    let names: Vec<String> = fields.iter().map(|(name, _)| name.clone()).collect();
    let values: Vec<BoxedStrategy<Value>> =
        fields.iter().map(|(_, ty)| value_strategy(*ty)).collect();

    values.prop_map(move |values| {
        names
            .iter()
            .cloned()
            .zip(values)
            .fold(Record::new(schema.clone()), |record, (name, value)| record.with(name, value))
    })
}

/// Rich schema with one typed scalar field per entry
pub fn rich_schema(name: &str, fields: &[(String, ScalarType)]) -> RichSchema {
    fields.iter().fold(RichSchema::new(name), |schema, (field, ty)| {
        schema.field(RichFieldDef::scalar(field.clone(), Some(*ty)))
    })
}

/// Plain schema with one scalar field per entry, each name given a prefix
pub fn plain_schema(name: &str, prefix: &str, fields: &[(String, ScalarType)]) -> PlainSchema {
    fields.iter().fold(PlainSchema::new(name), |schema, (field, ty)| {
        schema.field(PlainFieldDef::scalar(format!("{}{}", prefix, field), *ty))
    })
}
