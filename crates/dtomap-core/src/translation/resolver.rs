//! Field-name reconciliation through a remapping table
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use super::mapping::{RemapEntry, RemappingTable};
use super::view::SchemaView;
use crate::{Error, Result};
use std::borrow::Cow;

/// Resolves destination field names and nested tables for source fields
#[derive(Debug, Clone, Copy)]
pub struct FieldNameResolver<'a> {
    table: &'a RemappingTable,
}

impl<'a> FieldNameResolver<'a> {
    pub fn new(table: &'a RemappingTable) -> Self {
        Self { table }
    }

    /// Destination name for a source field
    ///
    /// Fields without an entry pass through unchanged. An entry that does not
    /// yield a non-empty name is a `MalformedMapping`.
    pub fn resolve_name<'s>(&self, source: &'s str) -> Result<&'s str>
    where
        'a: 's,
    {
        let resolved = match self.table.get(source) {
            None => return Ok(source),
            Some(RemapEntry::Direct(name)) => Some(name.as_str()),
            Some(RemapEntry::Nested { field_name, .. }) => field_name.as_deref(),
            Some(RemapEntry::Invalid(raw)) => {
                return Err(Error::MalformedMapping {
                    field: source.to_string(),
                    message: format!("`{}` is not a usable remapping entry", raw),
                })
            }
        };

        match resolved {
            Some(name) if !name.is_empty() => Ok(name),
            Some(_) => Err(Error::MalformedMapping {
                field: source.to_string(),
                message: "destination name is empty".to_string(),
            }),
            None => Err(Error::MalformedMapping {
                field: source.to_string(),
                message: "can't find `field_name` key in the remapping entry".to_string(),
            }),
        }
    }

    /// Nested table for a source field
    ///
    /// An empty table means no further renaming below this point.
    pub fn resolve_submapping(&self, source: &str) -> Cow<'a, RemappingTable> {
        match self.table.get(source) {
            Some(RemapEntry::Nested { submapping, .. }) => Cow::Borrowed(submapping),
            _ => Cow::Owned(RemappingTable::new()),
        }
    }

    /// Keys of the table that name no visible field of the source schema
    pub fn unknown_keys(&self, source: &SchemaView) -> Vec<&'a str> {
        let mut keys: Vec<&str> = self
            .table
            .keys()
            .filter(|key| !source.has_field(key))
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PlainFieldDef, PlainSchema, Schema};
    use crate::{ErrorKind, ScalarType};
    use serde_json::json;

    #[test]
    fn test_identity_without_entry() {
        let table = RemappingTable::new();
        let resolver = FieldNameResolver::new(&table);
        assert_eq!(resolver.resolve_name("char_field").unwrap(), "char_field");
    }

    #[test]
    fn test_direct_and_nested_entries() {
        let table = RemappingTable::new()
            .rename("char_field", "_char_field")
            .nested("foreign_key", "_fk", RemappingTable::new().rename("a", "b"));
        let resolver = FieldNameResolver::new(&table);

        assert_eq!(resolver.resolve_name("char_field").unwrap(), "_char_field");
        assert_eq!(resolver.resolve_name("foreign_key").unwrap(), "_fk");
        assert_eq!(
            resolver.resolve_submapping("foreign_key").into_owned(),
            RemappingTable::new().rename("a", "b")
        );
    }

    #[test]
    fn test_submapping_defaults_to_empty() {
        let table = RemappingTable::new().rename("char_field", "_char_field");
        let resolver = FieldNameResolver::new(&table);
        assert!(resolver.resolve_submapping("char_field").is_empty());
        assert!(resolver.resolve_submapping("unknown").is_empty());
    }

    #[test]
    fn test_missing_field_name_is_malformed() {
        let table =
            RemappingTable::from_json_value(json!({"char_field": {"submapping": {}}})).unwrap();
        let resolver = FieldNameResolver::new(&table);

        let err = resolver.resolve_name("char_field").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMapping);
        assert!(err.to_string().contains("field_name"));
    }

    #[test]
    fn test_empty_names_are_malformed() {
        let table = RemappingTable::from_json_value(json!({
            "a": "",
            "b": {"field_name": ""}
        }))
        .unwrap();
        let resolver = FieldNameResolver::new(&table);

        assert_eq!(
            resolver.resolve_name("a").unwrap_err().kind(),
            ErrorKind::MalformedMapping
        );
        assert_eq!(
            resolver.resolve_name("b").unwrap_err().kind(),
            ErrorKind::MalformedMapping
        );
    }

    #[test]
    fn test_null_and_non_string_names_are_malformed() {
        let table = RemappingTable::from_json_value(json!({
            "char_field": null,
            "foreign_key": {"field_name": 5, "submapping": {"a": "b"}}
        }))
        .unwrap();
        let resolver = FieldNameResolver::new(&table);

        let err = resolver.resolve_name("char_field").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMapping);
        assert!(err.to_string().contains("null"));

        let err = resolver.resolve_name("foreign_key").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMapping);
        assert!(resolver.resolve_submapping("foreign_key").is_empty());
    }

    #[test]
    fn test_unknown_keys() {
        let schema: Schema = PlainSchema::new("Dto")
            .field(PlainFieldDef::scalar("a", ScalarType::Text))
            .into();
        let view = SchemaView::new(&schema).unwrap();
        let table = RemappingTable::new()
            .rename("a", "x")
            .rename("zz", "y")
            .rename("b", "z");
        let resolver = FieldNameResolver::new(&table);

        assert_eq!(resolver.unknown_keys(&view), vec!["b", "zz"]);
    }
}
