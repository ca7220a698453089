//! Plain record to rich record translation
//!
//! Mirrors the rich to plain direction. A source field is a relation when its
//! own declared type is a nested record, and values are written without a
//! type check.
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use super::field::SchemaField;
use super::instance::InstanceView;
use super::mapping::RemappingTable;
use super::options::ToRichOptions;
use super::resolver::FieldNameResolver;
use super::view::SchemaView;
use super::{build_destination, check_depth};
use crate::catalog::SchemaCatalog;
use crate::schema::SchemaKind;
use crate::{Error, Record, Result, Value};

/// Translates one plain record into a record of a rich schema
#[derive(Debug)]
pub struct PlainToRichTranslator<'a> {
    catalog: &'a SchemaCatalog,
    source: InstanceView<'a>,
    source_view: &'a SchemaView,
    destination: &'a SchemaView,
    resolver: FieldNameResolver<'a>,
    options: &'a ToRichOptions,
    depth: usize,
}

impl<'a> PlainToRichTranslator<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        record: &'a Record,
        rich_schema: &str,
        remapping: &'a RemappingTable,
        options: &'a ToRichOptions,
    ) -> Result<Self> {
        Self::at_depth(catalog, record, rich_schema, remapping, options, 0)
    }

    fn at_depth(
        catalog: &'a SchemaCatalog,
        record: &'a Record,
        rich_schema: &str,
        remapping: &'a RemappingTable,
        options: &'a ToRichOptions,
        depth: usize,
    ) -> Result<Self> {
        check_depth(rich_schema, depth, options.max_depth)?;

        let source_view = catalog.view_of_kind(record.schema(), SchemaKind::Plain)?;
        let destination = catalog.view_of_kind(rich_schema, SchemaKind::Rich)?;
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
            "to_rich",
            source = self.source_view.name(),
            destination = self.destination.name(),
            depth = self.depth
        )
        .entered();

        let mut assembled: Vec<(String, Value)> = Vec::new();
        for (field, destination_name) in self.mappable_fields()? {
            let value = if field.is_nested_record() {
                self.translate_nested(field, destination_name)?
            } else {
                self.source.get(field.name())?.clone()
            };
            assembled.push((destination_name.to_string(), value));
        }

        build_destination(
            self.catalog,
            self.destination,
            assembled,
            self.options.nullify_missing,
        )
    }

    fn translate_nested(&self, field: &SchemaField, destination_name: &str) -> Result<Value> {
        if !self.options.recurse {
            return Ok(Value::Null);
        }

        let nested = match self.source.get(field.name())? {
            Value::Null => return Ok(Value::Null),
            Value::Record(nested) => nested,
            other => {
                return Err(Error::FieldAccessError {
                    schema: self.source_view.name().to_string(),
                    field: field.name().to_string(),
                    message: format!(
                        "nested field holds a `{}` value instead of a record",
                        other.type_name()
                    ),
                })
            }
        };

        let related_schema = self
            .destination
            .field_type(destination_name)?
            .schema_name()
            .ok_or_else(|| {
                Error::invalid_schema(
                    self.destination.name(),
                    format!("field `{}` is not a relation", destination_name),
                )
            })?;

        let submapping = self.resolver.resolve_submapping(field.name());
        let translator = PlainToRichTranslator::at_depth(
            self.catalog,
            nested,
            related_schema,
            &submapping,
            self.options,
            self.depth + 1,
        )?;
        Ok(Value::from(translator.translate()?))
    }
}
