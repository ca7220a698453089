//! Schema catalog: the introspection and construction capabilities
//!
//! The catalog owns every registered schema together with its eagerly built
//! `SchemaView`. It is immutable once built, so it can be shared between
//! threads and concurrent translations without locking.
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use crate::schema::{PlainFieldType, RichFieldKind, Schema, SchemaKind};
use crate::translation::{self, RemappingTable, SchemaView, ToPlainOptions, ToRichOptions};
use crate::{DeclaredType, Error, Record, Result, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Accumulates schema definitions before validating them as a whole
#[derive(Debug, Default)]
pub struct SchemaCatalogBuilder {
    schemas: Vec<Schema>,
}

impl SchemaCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration
    pub fn schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schemas.push(schema.into());
        self
    }

    pub fn add(&mut self, schema: impl Into<Schema>) -> &mut Self {
        self.schemas.push(schema.into());
        self
    }

    /// Validate every schema and every cross-schema reference
    ///
    /// Relations may form cycles; they only need to point at a registered
    /// schema of the right kind.
    pub fn build(self) -> Result<SchemaCatalog> {
        let mut schemas = HashMap::with_capacity(self.schemas.len());
        let mut views = HashMap::with_capacity(self.schemas.len());

        for schema in self.schemas {
            let name = schema.name().to_string();
            if schemas.contains_key(&name) {
                return Err(Error::invalid_schema(name, "schema registered twice"));
            }
            let view = SchemaView::new(&schema)?;
            views.insert(name.clone(), Arc::new(view));
            schemas.insert(name, schema);
        }

        for schema in schemas.values() {
            for (field, target, kind) in references(schema) {
                match schemas.get(target) {
                    Some(other) if other.kind() == kind => {}
                    Some(other) => {
                        return Err(Error::invalid_schema(
                            schema.name(),
                            format!(
                                "field `{}` points to `{}`, a {} schema; expected a {} schema",
                                field,
                                target,
                                other.kind(),
                                kind
                            ),
                        ))
                    }
                    None => {
                        return Err(Error::invalid_schema(
                            schema.name(),
                            format!("field `{}` points to unknown schema `{}`", field, target),
                        ))
                    }
                }
            }
        }

        tracing::debug!(schemas = schemas.len(), "Schema catalog built");
        Ok(SchemaCatalog { schemas, views })
    }
}

/// Schemas referenced by the fields of a schema, with the kind they must have
fn references(schema: &Schema) -> Vec<(&str, &str, SchemaKind)> {
    match schema {
        Schema::Rich(rich) => rich
            .fields
            .iter()
            .filter_map(|field| match &field.kind {
                RichFieldKind::ForeignKey { to } | RichFieldKind::ManyToMany { to } => {
                    Some((field.name.as_str(), to.as_str(), SchemaKind::Rich))
                }
                RichFieldKind::Scalar { .. } => None,
            })
            .collect(),
        Schema::Plain(plain) => plain
            .fields
            .iter()
            .filter_map(|field| match &field.ty {
                PlainFieldType::Record { record } => {
                    Some((field.name.as_str(), record.as_str(), SchemaKind::Plain))
                }
                PlainFieldType::Scalar(_) => None,
            })
            .collect(),
    }
}

/// On-disk catalog document: either a bare array of schemas or an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Schema>),
    Object { schemas: Vec<Schema> },
}

/// Registry of rich and plain schemas
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    schemas: HashMap<String, Schema>,
    views: HashMap<String, Arc<SchemaView>>,
}

impl SchemaCatalog {
    pub fn builder() -> SchemaCatalogBuilder {
        SchemaCatalogBuilder::new()
    }

    pub fn from_schemas<I, S>(schemas: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        schemas
            .into_iter()
            .fold(SchemaCatalogBuilder::new(), |builder, schema| builder.schema(schema))
            .build()
    }

    /// Load a catalog from JSON
    ///
    /// Accepts `[schema, ...]` or `{"schemas": [schema, ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let schemas = match document {
            CatalogDocument::List(schemas) | CatalogDocument::Object { schemas } => schemas,
        };
        Self::from_schemas(schemas)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading schema catalog");
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Cached view of a registered schema
    pub fn view(&self, name: &str) -> Result<&Arc<SchemaView>> {
        self.views
            .get(name)
            .ok_or_else(|| Error::invalid_schema(name, "schema is not registered"))
    }

    /// Cached view of a registered schema that must have the given kind
    pub fn view_of_kind(&self, name: &str, kind: SchemaKind) -> Result<&SchemaView> {
        let view: &SchemaView = self.view(name)?;
        view.expect_kind(kind)?;
        Ok(view)
    }

    /// Build a new record of a schema from a complete name to value set
    ///
    /// Construction is atomic. Unset fields take their declared default;
    /// nullable rich fields fall back to null. Any other unset field, or a
    /// name the schema does not expose, fails the whole construction.
    pub fn construct<I>(&self, schema: &str, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let view = self.view(schema)?;
        let mut supplied: HashMap<String, Value> = HashMap::new();
        for (name, value) in values {
            if !view.has_field(&name) {
                return Err(Error::ConstructionFailed {
                    schema: schema.to_string(),
                    message: format!("unexpected field `{}`", name),
                });
            }
            supplied.insert(name, value);
        }

        let mut record = Record::new(schema);
        let mut missing = Vec::new();
        for field in view.fields() {
            let value = match supplied.remove(field.name()) {
                Some(value) => value,
                None => match field.default() {
                    Some(default) => default.clone(),
                    None if view.kind() == SchemaKind::Rich && field.is_nullable() => Value::Null,
                    None => {
                        missing.push(field.name());
                        continue;
                    }
                },
            };
            record.set(field.name(), value);
        }

        if !missing.is_empty() {
            log::debug!("Construction of `{}` is missing fields: {:?}", schema, missing);
            return Err(Error::ConstructionFailed {
                schema: schema.to_string(),
                message: "some mandatory fields are missing".to_string(),
            });
        }
        Ok(record)
    }

    /// Build a record from a JSON object, guided by the schema's declared types
    ///
    /// Nested objects become nested records of the related schema. Absent
    /// keys follow the `construct` rules.
    pub fn record_from_json(&self, schema: &str, json: &serde_json::Value) -> Result<Record> {
        let view = self.view(schema)?;
        let object = json.as_object().ok_or_else(|| Error::TypeMismatch {
            schema: schema.to_string(),
            field: "*".to_string(),
            value: json.to_string(),
            expected: "object".to_string(),
        })?;

        let mut values = Vec::with_capacity(object.len());
        for (name, raw) in object {
            if self.is_multi_relation(schema, name) {
                log::trace!("Skipping many-to-many data for `{}.{}`", schema, name);
                continue;
            }
            let field = view.field(name)?;
            let value = match field.declared_type() {
                DeclaredType::Schema(_) if raw.is_null() => Value::Null,
                DeclaredType::Schema(related) => {
                    Value::from(self.record_from_json(related, raw)?)
                }
                DeclaredType::Scalar(ty) => Value::from_json_scalar(raw, Some(*ty))
                    .ok_or_else(|| mismatch(schema, name, raw, field.declared_type()))?,
                DeclaredType::Any => Value::from_json_scalar(raw, None)
                    .ok_or_else(|| mismatch(schema, name, raw, field.declared_type()))?,
            };
            values.push((name.clone(), value));
        }

        self.construct(schema, values)
    }

    fn is_multi_relation(&self, schema: &str, field: &str) -> bool {
        match self.schemas.get(schema) {
            Some(Schema::Rich(rich)) => rich.fields.iter().any(|def| {
                def.name == field && matches!(def.kind, RichFieldKind::ManyToMany { .. })
            }),
            _ => false,
        }
    }

    /// Translate a rich record into a new plain record
    pub fn to_plain(
        &self,
        record: &Record,
        plain_schema: &str,
        remapping: Option<&RemappingTable>,
        options: &ToPlainOptions,
    ) -> Result<Record> {
        translation::to_plain(self, record, plain_schema, remapping, options)
    }

    /// Translate a plain record into a new rich record
    pub fn to_rich(
        &self,
        record: &Record,
        rich_schema: &str,
        remapping: Option<&RemappingTable>,
        options: &ToRichOptions,
    ) -> Result<Record> {
        translation::to_rich(self, record, rich_schema, remapping, options)
    }
}

fn mismatch(schema: &str, field: &str, raw: &serde_json::Value, expected: &DeclaredType) -> Error {
    Error::TypeMismatch {
        schema: schema.to_string(),
        field: field.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    }
}
