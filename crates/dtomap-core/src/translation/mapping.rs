//! Remapping tables: caller-supplied field renames
//!
//! A table maps a source field name either to a destination name, or to a
//! structured entry carrying the destination name and a nested table used
//! when recursing into a relation:
//!
//! ```json
//! {
//!     "char_field": "_char_field",
//!     "foreign_key": {"field_name": "_foreign_key", "submapping": {"char_field": "name"}}
//! }
//! ```
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of a remapping table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemapEntry {
    /// Bare destination name
    Direct(String),
    /// Destination name plus the table applied below this relation
    ///
    /// `field_name` is optional only so a malformed entry can be reported
    /// when it is resolved.
    Nested {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_name: Option<String>,
        #[serde(default, skip_serializing_if = "RemappingTable::is_empty")]
        submapping: RemappingTable,
    },
    /// Any other JSON value, such as `null` or a non-string `field_name`
    ///
    /// Kept so the entry surfaces as a malformed mapping on resolution.
    Invalid(serde_json::Value),
}

/// Source field name to destination field name table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemappingTable {
    entries: HashMap<String, RemapEntry>,
}

impl RemappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(json)?)
    }

    /// Add a bare rename
    pub fn rename(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.entries
            .insert(source.into(), RemapEntry::Direct(destination.into()));
        self
    }

    /// Add a rename carrying a nested table for relation recursion
    pub fn nested(
        mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        submapping: RemappingTable,
    ) -> Self {
        self.entries.insert(
            source.into(),
            RemapEntry::Nested {
                field_name: Some(destination.into()),
                submapping,
            },
        );
        self
    }

    pub fn insert(&mut self, source: impl Into<String>, entry: RemapEntry) -> Option<RemapEntry> {
        self.entries.insert(source.into(), entry)
    }

    pub fn get(&self, source: &str) -> Option<&RemapEntry> {
        self.entries.get(source)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_direct_and_nested_entries() {
        let table = RemappingTable::from_json_value(json!({
            "char_field": "_char_field",
            "foreign_key": {
                "field_name": "_foreign_key",
                "submapping": {"char_field": "name"}
            }
        }))
        .unwrap();

        assert_eq!(
            table.get("char_field"),
            Some(&RemapEntry::Direct("_char_field".to_string()))
        );
        assert_eq!(
            table,
            RemappingTable::new()
                .rename("char_field", "_char_field")
                .nested(
                    "foreign_key",
                    "_foreign_key",
                    RemappingTable::new().rename("char_field", "name")
                )
        );
    }

    #[test]
    fn test_parse_entry_without_field_name() {
        let table = RemappingTable::from_json_str(r#"{"char_field": {"submapping": {}}}"#).unwrap();
        assert_eq!(
            table.get("char_field"),
            Some(&RemapEntry::Nested {
                field_name: None,
                submapping: RemappingTable::new(),
            })
        );
    }

    #[test]
    fn test_rejects_non_table_json() {
        assert!(RemappingTable::from_json_str("[1, 2]").is_err());
        assert!(RemappingTable::from_json_str("\"a\"").is_err());
    }

    #[test]
    fn test_unusable_entries_are_kept() {
        let table = RemappingTable::from_json_value(json!({
            "a": null,
            "b": 5,
            "c": {"field_name": 5}
        }))
        .unwrap();

        assert_eq!(table.get("a"), Some(&RemapEntry::Invalid(json!(null))));
        assert_eq!(table.get("b"), Some(&RemapEntry::Invalid(json!(5))));
        assert_eq!(
            table.get("c"),
            Some(&RemapEntry::Invalid(json!({"field_name": 5})))
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let table = RemappingTable::new()
            .rename("a", "b")
            .nested("fk", "_fk", RemappingTable::new());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, json!({"a": "b", "fk": {"field_name": "_fk"}}));
    }
}
