//! Core types and data structures for the dtomap translation engine
//!
//! This module defines the runtime values, declared field types and record
//! instances shared by both schema kinds.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar types a field can declare and a value can carry at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Int => write!(f, "int"),
            ScalarType::Float => write!(f, "float"),
            ScalarType::Text => write!(f, "text"),
            ScalarType::DateTime => write!(f, "datetime"),
        }
    }
}

/// Type a schema declares for one of its fields
///
/// Rich scalar fields may leave their type open (`Any`); relations and nested
/// plain records resolve to the schema they point to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Any,
    Scalar(ScalarType),
    Schema(String),
}

impl DeclaredType {
    /// Name of the referenced schema, if this is a record type
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            DeclaredType::Schema(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Any => write!(f, "any"),
            DeclaredType::Scalar(ty) => write!(f, "{}", ty),
            DeclaredType::Schema(name) => write!(f, "{}", name),
        }
    }
}

/// Runtime value of a record field
///
/// `Null` is the null sentinel written into unresolved destination fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
    Record(Box<Record>),
}

impl Value {
    /// Runtime scalar type, `None` for `Null` and nested records
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            Value::Bool(_) => Some(ScalarType::Bool),
            Value::Int(_) => Some(ScalarType::Int),
            Value::Float(_) => Some(ScalarType::Float),
            Value::Text(_) => Some(ScalarType::Text),
            Value::DateTime(_) => Some(ScalarType::DateTime),
            Value::Null | Value::Record(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Human readable name of the runtime type
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Record(record) => record.schema().to_string(),
            other => other
                .scalar_type()
                .map(|ty| ty.to_string())
                .unwrap_or_default(),
        }
    }

    /// Convert a JSON scalar into a value
    ///
    /// With `expected == None` the type is inferred from the JSON shape.
    /// Returns `None` when the JSON value can't represent the expected type.
    pub fn from_json_scalar(
        json: &serde_json::Value,
        expected: Option<ScalarType>,
    ) -> Option<Value> {
        use serde_json::Value as Json;

        match (json, expected) {
            (Json::Null, _) => Some(Value::Null),
            (Json::Bool(b), None | Some(ScalarType::Bool)) => Some(Value::Bool(*b)),
            (Json::Number(n), None) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            (Json::Number(n), Some(ScalarType::Int)) => n.as_i64().map(Value::Int),
            (Json::Number(n), Some(ScalarType::Float)) => n.as_f64().map(Value::Float),
            (Json::String(s), None | Some(ScalarType::Text)) => Some(Value::Text(s.clone())),
            (Json::String(s), Some(ScalarType::DateTime)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),
            _ => None,
        }
    }

    /// Convert the value into JSON; nested records become objects
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(dt) => {
                serde_json::Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Record(record) => record.to_json(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Record(record) => write!(f, "{}(..)", record.schema()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(Box::new(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A concrete instance of a schema
///
/// Values are kept in insertion order. The record only knows the name of
/// its schema; the catalog owns the schema definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: String,
    values: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record of the named schema
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            values: Vec::new(),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((field, value)),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert the record into a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let object = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_scalar_type_of_values() {
        assert_eq!(Value::from(5).scalar_type(), Some(ScalarType::Int));
        assert_eq!(Value::from("Alice").scalar_type(), Some(ScalarType::Text));
        assert_eq!(Value::from(1.5).scalar_type(), Some(ScalarType::Float));
        assert_eq!(Value::Null.scalar_type(), None);
        assert_eq!(Value::from(Record::new("Other")).scalar_type(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn test_record_set_replaces_value() {
        let mut record = Record::new("TestModel").with("char_field", "Alice");
        record.set("char_field", "Bob");

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("char_field"), Some(&Value::from("Bob")));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_record_preserves_order() {
        let record = Record::new("TestModel")
            .with("b", 1)
            .with("a", 2)
            .with("c", 3);
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_from_json_scalar() {
        assert_eq!(
            Value::from_json_scalar(&json!(5), None),
            Some(Value::Int(5))
        );
        assert_eq!(
            Value::from_json_scalar(&json!(5), Some(ScalarType::Float)),
            Some(Value::Float(5.0))
        );
        assert_eq!(
            Value::from_json_scalar(&json!("5"), Some(ScalarType::Int)),
            None
        );

        let parsed = Value::from_json_scalar(
            &json!("2024-03-01T10:00:00Z"),
            Some(ScalarType::DateTime),
        );
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parsed, Some(Value::DateTime(expected)));
    }

    #[test]
    fn test_record_to_json() {
        let related = Record::new("TestModelForeignKey").with("char_field", "fk");
        let record = Record::new("TestModel")
            .with("char_field", "Alice")
            .with("integer_field", 5)
            .with("foreign_key", related)
            .with("date_time", Value::Null);

        assert_eq!(
            record.to_json(),
            json!({
                "char_field": "Alice",
                "integer_field": 5,
                "foreign_key": {"char_field": "fk"},
                "date_time": null,
            })
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::from(5).type_name(), "int");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(Record::new("Other")).type_name(), "Other");
    }
}
