//! Field descriptors as seen by the translation engine
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use crate::schema::{PlainFieldDef, PlainFieldType, RichFieldDef, RichFieldKind};
use crate::{DeclaredType, Error, Result, ScalarType, Value};

/// Classification of a schema field during introspection
///
/// Only `Scalar` and `SingleRelation` ever surface through a `SchemaView`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldClass {
    Scalar(SchemaField),
    SingleRelation(SchemaField),
    MultiRelationExcluded,
}

/// One visible field of a rich or plain schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    name: String,
    declared_type: DeclaredType,
    relation: bool,
    nullable: bool,
    default: Option<Value>,
}

impl SchemaField {
    /// Classify a rich field definition
    pub fn classify_rich(schema: &str, def: &RichFieldDef) -> Result<FieldClass> {
        let (declared_type, relation) = match &def.kind {
            RichFieldKind::Scalar { ty } => {
                (ty.map_or(DeclaredType::Any, DeclaredType::Scalar), false)
            }
            RichFieldKind::ForeignKey { to } => (DeclaredType::Schema(to.clone()), true),
            RichFieldKind::ManyToMany { .. } => return Ok(FieldClass::MultiRelationExcluded),
        };

        let default = convert_default(schema, &def.name, &declared_type, def.default.as_ref())?;
        let field = SchemaField {
            name: def.name.clone(),
            declared_type,
            relation,
            nullable: def.nullable,
            default,
        };

        Ok(if relation {
            FieldClass::SingleRelation(field)
        } else {
            FieldClass::Scalar(field)
        })
    }

    /// Build the descriptor of a plain field
    ///
    /// Plain fields are never relations; a nested record type is reported
    /// through the declared type instead.
    pub fn from_plain(schema: &str, def: &PlainFieldDef) -> Result<SchemaField> {
        let declared_type = match &def.ty {
            PlainFieldType::Scalar(ty) => DeclaredType::Scalar(*ty),
            PlainFieldType::Record { record } => DeclaredType::Schema(record.clone()),
        };
        let default = convert_default(schema, &def.name, &declared_type, def.default.as_ref())?;

        Ok(SchemaField {
            name: def.name.clone(),
            declared_type,
            relation: false,
            nullable: def.nullable,
            default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, or the related schema for relations and nested records
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    /// Whether this is a single-valued relation of a rich schema
    pub fn is_relation(&self) -> bool {
        self.relation
    }

    /// Whether the declared type is itself a schema
    pub fn is_nested_record(&self) -> bool {
        matches!(self.declared_type, DeclaredType::Schema(_))
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Strict type identity check of a runtime value against the declared type
    ///
    /// Null only passes on nullable fields.
    pub fn accepts(&self, value: &Value) -> bool {
        match (value, &self.declared_type) {
            (Value::Null, _) => self.nullable,
            (_, DeclaredType::Any) => true,
            (Value::Record(record), DeclaredType::Schema(schema)) => record.schema() == schema,
            (value, DeclaredType::Scalar(ty)) => value.scalar_type() == Some(*ty),
            _ => false,
        }
    }
}

fn convert_default(
    schema: &str,
    field: &str,
    declared_type: &DeclaredType,
    default: Option<&serde_json::Value>,
) -> Result<Option<Value>> {
    let Some(json) = default else {
        return Ok(None);
    };

    let expected: Option<ScalarType> = match declared_type {
        DeclaredType::Scalar(ty) => Some(*ty),
        DeclaredType::Any => None,
        DeclaredType::Schema(_) if json.is_null() => return Ok(Some(Value::Null)),
        DeclaredType::Schema(_) => {
            return Err(Error::invalid_schema(
                schema,
                format!("record field `{}` can only default to null", field),
            ))
        }
    };

    Value::from_json_scalar(json, expected)
        .map(Some)
        .ok_or_else(|| {
            Error::invalid_schema(
                schema,
                format!(
                    "default `{}` of field `{}` is not a valid `{}`",
                    json, field, declared_type
                ),
            )
        })
}
