//! Rich record to plain record translation
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use super::field::SchemaField;
use super::instance::InstanceView;
use super::mapping::RemappingTable;
use super::options::ToPlainOptions;
use super::resolver::FieldNameResolver;
use super::view::SchemaView;
use super::{build_destination, check_depth};
use crate::catalog::SchemaCatalog;
use crate::schema::SchemaKind;
use crate::{Error, Record, Result, Value};

/// Translates one rich record into a record of a plain schema
///
/// A translator covers a single relation level; recursing into a relation
/// creates a fresh translator for the related record.
#[derive(Debug)]
pub struct RichToPlainTranslator<'a> {
    catalog: &'a SchemaCatalog,
    source: InstanceView<'a>,
    source_view: &'a SchemaView,
    destination: &'a SchemaView,
    resolver: FieldNameResolver<'a>,
    options: &'a ToPlainOptions,
    depth: usize,
}

impl<'a> RichToPlainTranslator<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        record: &'a Record,
        plain_schema: &str,
        remapping: &'a RemappingTable,
        options: &'a ToPlainOptions,
    ) -> Result<Self> {
        Self::at_depth(catalog, record, plain_schema, remapping, options, 0)
    }

    fn at_depth(
        catalog: &'a SchemaCatalog,
        record: &'a Record,
        plain_schema: &str,
        remapping: &'a RemappingTable,
        options: &'a ToPlainOptions,
        depth: usize,
    ) -> Result<Self> {
        check_depth(plain_schema, depth, options.max_depth)?;

        let source_view = catalog.view_of_kind(record.schema(), SchemaKind::Rich)?;
        let destination = catalog.view_of_kind(plain_schema, SchemaKind::Plain)?;
        let source = InstanceView::new(record, source_view)?;

        let resolver = FieldNameResolver::new(remapping);
        let unknown = resolver.unknown_keys(source_view);
        if !unknown.is_empty() {
            log::warn!(
                "Remapping keys {:?} name no field of `{}` and are ignored",
                unknown,
                source_view.name()
            );
        }

        Ok(Self {
            catalog,
            source,
            source_view,
            destination,
            resolver,
            options,
            depth,
        })
    }

    /// Source fields whose resolved name exists in the destination, in
    /// source order, paired with that destination name
    ///
    /// Every remapping entry of the source schema is resolved here, so a
    /// malformed entry fails before any value is read.
    pub fn mappable_fields(&self) -> Result<Vec<(&'a SchemaField, &'a str)>> {
        let mut mappable = Vec::new();
        for field in self.source_view.fields() {
            let destination_name = self.resolver.resolve_name(field.name())?;
            if self.destination.has_field(destination_name) {
                mappable.push((field, destination_name));
            } else {
                log::trace!(
                    "Dropping `{}.{}`: `{}` has no field `{}`",
                    self.source_view.name(),
                    field.name(),
                    self.destination.name(),
                    destination_name
                );
            }
        }
        Ok(mappable)
    }

    /// Build the destination record
    pub fn translate(&self) -> Result<Record> {
        let _span = tracing::debug_span!(
            "to_plain",
            source = self.source_view.name(),
            destination = self.destination.name(),
            depth = self.depth
        )
        .entered();

        let mut assembled: Vec<(String, Value)> = Vec::new();
        for (field, destination_name) in self.mappable_fields()? {
            let value = if field.is_relation() {
                self.translate_relation(field, destination_name)?
            } else {
                self.translate_scalar(field, destination_name)?
            };
            log::debug!(
                "Mapped `{}.{}` to `{}.{}`",
                self.source_view.name(),
                field.name(),
                self.destination.name(),
                destination_name
            );
            assembled.push((destination_name.to_string(), value));
        }

        build_destination(
            self.catalog,
            self.destination,
            assembled,
            self.options.nullify_missing,
        )
    }

    fn translate_relation(&self, field: &SchemaField, destination_name: &str) -> Result<Value> {
        if !self.options.recurse {
            return Ok(Value::Null);
        }

        let related = match self.source.get(field.name())? {
            Value::Null => return Ok(Value::Null),
            Value::Record(related) => related,
            other => {
                return Err(Error::FieldAccessError {
                    schema: self.source_view.name().to_string(),
                    field: field.name().to_string(),
                    message: format!(
                        "relation holds a `{}` value instead of a record",
                        other.type_name()
                    ),
                })
            }
        };

        let related_view = self.catalog.view_of_kind(related.schema(), SchemaKind::Rich)?;
        if !related_view.is_translatable() {
            return Err(Error::RelationNotTranslatable {
                schema: related_view.name().to_string(),
                field: field.name().to_string(),
            });
        }

        let nested_schema = self
            .destination
            .field_type(destination_name)?
            .schema_name()
            .ok_or_else(|| {
                Error::invalid_schema(
                    self.destination.name(),
                    format!("field `{}` is not a nested record", destination_name),
                )
            })?;

        let submapping = self.resolver.resolve_submapping(field.name());
        let nested = RichToPlainTranslator::at_depth(
            self.catalog,
            related,
            nested_schema,
            &submapping,
            self.options,
            self.depth + 1,
        )?;
        Ok(Value::from(nested.translate()?))
    }

    fn translate_scalar(&self, field: &SchemaField, destination_name: &str) -> Result<Value> {
        let value = self.source.get(field.name())?;

        if self.options.validate_types {
            let destination_field = self.destination.field(destination_name)?;
            if !destination_field.accepts(value) {
                return Err(Error::TypeMismatch {
                    schema: self.source_view.name().to_string(),
                    field: destination_name.to_string(),
                    value: value.to_string(),
                    expected: destination_field.declared_type().to_string(),
                });
            }
        }

        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PlainFieldDef, PlainSchema, RichFieldDef, RichSchema};
    use crate::{ErrorKind, ScalarType};

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::builder()
            .schema(
                RichSchema::new("TestModelForeignKey")
                    .field(RichFieldDef::scalar("char_field", Some(ScalarType::Text))),
            )
            .schema(
                RichSchema::new("TestModel")
                    .field(RichFieldDef::scalar("char_field", Some(ScalarType::Text)))
                    .field(RichFieldDef::scalar("integer_field", Some(ScalarType::Int)))
                    .field(
                        RichFieldDef::foreign_key("foreign_key", "TestModelForeignKey").nullable(),
                    ),
            )
            .schema(
                PlainSchema::new("ForeignKeyDto")
                    .field(PlainFieldDef::scalar("char_field", ScalarType::Text)),
            )
            .schema(
                PlainSchema::new("TestDto")
                    .field(PlainFieldDef::scalar("char_field", ScalarType::Text))
                    .field(PlainFieldDef::scalar("integer_field", ScalarType::Int))
                    .field(PlainFieldDef::record("foreign_key", "ForeignKeyDto").nullable()),
            )
            .build()
            .unwrap()
    }

    fn record() -> Record {
        Record::new("TestModel")
            .with("char_field", "Alice")
            .with("integer_field", 5)
            .with(
                "foreign_key",
                Record::new("TestModelForeignKey").with("char_field", "fk"),
            )
    }

    #[test]
    fn test_mappable_fields_follow_source_order() {
        let catalog = catalog();
        let record = record();
        let table = RemappingTable::new().rename("integer_field", "missing");
        let options = ToPlainOptions::default();
        let translator =
            RichToPlainTranslator::new(&catalog, &record, "TestDto", &table, &options).unwrap();

        let names: Vec<_> = translator
            .mappable_fields()
            .unwrap()
            .into_iter()
            .map(|(field, destination)| (field.name(), destination))
            .collect();
        assert_eq!(
            names,
            vec![("char_field", "char_field"), ("foreign_key", "foreign_key")]
        );
    }

    #[test]
    fn test_relation_is_null_without_recurse() {
        let catalog = catalog();
        let record = record();
        let table = RemappingTable::new();
        let options = ToPlainOptions::default();

        let dto = RichToPlainTranslator::new(&catalog, &record, "TestDto", &table, &options)
            .unwrap()
            .translate()
            .unwrap();
        assert_eq!(dto.get("foreign_key"), Some(&Value::Null));
        assert_eq!(dto.get("integer_field"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_relation_is_translated_with_recurse() {
        let catalog = catalog();
        let record = record();
        let table = RemappingTable::new();
        let options = ToPlainOptions::new().with_recurse(true);

        let dto = RichToPlainTranslator::new(&catalog, &record, "TestDto", &table, &options)
            .unwrap()
            .translate()
            .unwrap();
        let nested = dto.get("foreign_key").and_then(Value::as_record).unwrap();
        assert_eq!(nested.schema(), "ForeignKeyDto");
        assert_eq!(nested.get("char_field"), Some(&Value::from("fk")));
    }

    #[test]
    fn test_destination_must_be_plain() {
        let catalog = catalog();
        let record = record();
        let table = RemappingTable::new();
        let options = ToPlainOptions::default();

        let err = RichToPlainTranslator::new(&catalog, &record, "TestModel", &table, &options)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
    }

    #[test]
    fn test_validate_types_rejects_int_for_text() {
        let catalog = catalog();
        let record = Record::new("TestModel")
            .with("char_field", 7)
            .with("integer_field", 5)
            .with("foreign_key", Value::Null);
        let table = RemappingTable::new();
        let options = ToPlainOptions::new().with_validate_types(true);

        let err = RichToPlainTranslator::new(&catalog, &record, "TestDto", &table, &options)
            .unwrap()
            .translate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert!(err.to_string().contains("TestModel.char_field"));
    }
}
