//! Schema introspection for the translation engine
//!
//! A `SchemaView` is built once per schema, eagerly, and never changes
//! afterwards. Multi-valued relations are filtered out during construction
//! and can never be looked up, mapped, or cause errors.
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use super::field::{FieldClass, SchemaField};
use crate::schema::{Schema, SchemaKind};
use crate::{DeclaredType, Error, Result};
use std::collections::HashMap;

/// Ordered, read-only view over the visible fields of one schema
#[derive(Debug, Clone)]
pub struct SchemaView {
    name: String,
    kind: SchemaKind,
    translatable: bool,
    fields: Vec<SchemaField>,
    index: HashMap<String, usize>,
}

impl SchemaView {
    /// Introspect a schema of either kind
    pub fn new(schema: &Schema) -> Result<Self> {
        schema.validate()?;

        let name = schema.name();
        let (fields, translatable) = match schema {
            Schema::Rich(rich) => {
                let mut fields = Vec::with_capacity(rich.fields.len());
                for def in &rich.fields {
                    match SchemaField::classify_rich(name, def)? {
                        FieldClass::Scalar(field) | FieldClass::SingleRelation(field) => {
                            fields.push(field)
                        }
                        FieldClass::MultiRelationExcluded => {
                            log::trace!("Excluding multi-valued relation `{}.{}`", name, def.name);
                        }
                    }
                }
                (fields, rich.translatable)
            }
            Schema::Plain(plain) => {
                let fields = plain
                    .fields
                    .iter()
                    .map(|def| SchemaField::from_plain(name, def))
                    .collect::<Result<Vec<_>>>()?;
                (fields, true)
            }
        };

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.name().to_string(), i))
            .collect();

        Ok(Self {
            name: name.to_string(),
            kind: schema.kind(),
            translatable,
            fields,
            index,
        })
    }

    /// Introspect a schema that must be rich
    pub fn rich(schema: &Schema) -> Result<Self> {
        let view = Self::new(schema)?;
        view.expect_kind(SchemaKind::Rich)?;
        Ok(view)
    }

    /// Introspect a schema that must be plain
    pub fn plain(schema: &Schema) -> Result<Self> {
        let view = Self::new(schema)?;
        view.expect_kind(SchemaKind::Plain)?;
        Ok(view)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Whether records of this schema opt into translation
    pub fn is_translatable(&self) -> bool {
        self.translatable
    }

    /// Fail with `InvalidSchema` unless the schema has the given kind
    pub fn expect_kind(&self, kind: SchemaKind) -> Result<()> {
        if self.kind != kind {
            return Err(Error::invalid_schema(
                &self.name,
                format!("expected a {} schema, found a {} schema", kind, self.kind),
            ));
        }
        Ok(())
    }

    /// Visible field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(SchemaField::name)
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Result<&SchemaField> {
        self.index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| Error::FieldNotFound {
                schema: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Declared type of a field, or its related schema
    pub fn field_type(&self, name: &str) -> Result<&DeclaredType> {
        self.field(name).map(SchemaField::declared_type)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
