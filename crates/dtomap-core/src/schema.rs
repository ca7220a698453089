//! Schema definitions for rich and plain records
//!
//! A rich schema describes persistence-style records whose fields may point
//! to other rich records. A plain schema describes flat value objects with
//! explicit declared types, where a field may itself be a nested plain record.
//! Both load from JSON:
//!
//! ```json
//! {"kind": "rich", "name": "TestModel", "fields": [
//!     {"name": "char_field", "kind": "scalar", "type": "text"},
//!     {"name": "foreign_key", "kind": "foreign_key", "to": "Related", "nullable": true}
//! ]}
//! {"kind": "plain", "name": "TestDto", "fields": [
//!     {"name": "char_field", "type": "text"},
//!     {"name": "foreign_key", "type": {"record": "RelatedDto"}, "nullable": true}
//! ]}
//! ```

use crate::{Error, Result, ScalarType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

fn identifier_regex() -> &'static Regex {
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex")
    })
}

/// Whether a name is usable as a schema or field identifier
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

fn default_true() -> bool {
    true
}

/// The two schema kinds the engine translates between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Rich,
    Plain,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Rich => write!(f, "rich"),
            SchemaKind::Plain => write!(f, "plain"),
        }
    }
}

/// A schema of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Schema {
    Rich(RichSchema),
    Plain(PlainSchema),
}

impl Schema {
    pub fn name(&self) -> &str {
        match self {
            Schema::Rich(schema) => &schema.name,
            Schema::Plain(schema) => &schema.name,
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Schema::Rich(_) => SchemaKind::Rich,
            Schema::Plain(_) => SchemaKind::Plain,
        }
    }

    /// Check the local shape: identifiers and unique field names
    ///
    /// References to other schemas are checked by the catalog, which knows
    /// every registered schema.
    pub fn validate(&self) -> Result<()> {
        let name = self.name();
        if !is_identifier(name) {
            return Err(Error::invalid_schema(name, "schema name is not a valid identifier"));
        }

        let field_names: Vec<&str> = match self {
            Schema::Rich(schema) => schema.fields.iter().map(|f| f.name.as_str()).collect(),
            Schema::Plain(schema) => schema.fields.iter().map(|f| f.name.as_str()).collect(),
        };

        let mut seen = HashSet::new();
        for field in field_names {
            if !is_identifier(field) {
                return Err(Error::invalid_schema(
                    name,
                    format!("field name `{}` is not a valid identifier", field),
                ));
            }
            if !seen.insert(field) {
                return Err(Error::invalid_schema(
                    name,
                    format!("duplicate field `{}`", field),
                ));
            }
        }
        Ok(())
    }
}

impl From<RichSchema> for Schema {
    fn from(schema: RichSchema) -> Self {
        Schema::Rich(schema)
    }
}

impl From<PlainSchema> for Schema {
    fn from(schema: PlainSchema) -> Self {
        Schema::Plain(schema)
    }
}

/// Persistence-style schema whose fields may be relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichSchema {
    pub name: String,

    pub fields: Vec<RichFieldDef>,

    /// Whether records of this schema opt into translation
    ///
    /// Recursing into a related record whose schema has this unset raises
    /// `RelationNotTranslatable`.
    #[serde(default = "default_true")]
    pub translatable: bool,
}

impl RichSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            translatable: true,
        }
    }

    pub fn field(mut self, field: RichFieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Mark the schema as not supporting translation
    pub fn not_translatable(mut self) -> Self {
        self.translatable = false;
        self
    }
}

/// What a rich field stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RichFieldKind {
    /// Plain column; the type is optional for rich schemas
    Scalar {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        ty: Option<ScalarType>,
    },
    /// Single-valued relation to another rich schema
    ForeignKey { to: String },
    /// Multi-valued relation; never visible to the engine
    ManyToMany { to: String },
}

/// One field of a rich schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichFieldDef {
    pub name: String,

    #[serde(flatten)]
    pub kind: RichFieldKind,

    /// Missing values are stored as null on construction
    #[serde(default)]
    pub nullable: bool,

    /// Value used on construction when the field is not supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl RichFieldDef {
    fn with_kind(name: impl Into<String>, kind: RichFieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
        }
    }

    pub fn scalar(name: impl Into<String>, ty: Option<ScalarType>) -> Self {
        Self::with_kind(name, RichFieldKind::Scalar { ty })
    }

    pub fn foreign_key(name: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_kind(name, RichFieldKind::ForeignKey { to: to.into() })
    }

    pub fn many_to_many(name: impl Into<String>, to: impl Into<String>) -> Self {
        Self::with_kind(name, RichFieldKind::ManyToMany { to: to.into() })
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Flat value-object schema with explicit field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainSchema {
    pub name: String,

    pub fields: Vec<PlainFieldDef>,
}

impl PlainSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: PlainFieldDef) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declared type of a plain field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlainFieldType {
    Scalar(ScalarType),
    /// Nested plain record mirroring a relation
    Record { record: String },
}

/// One field of a plain schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainFieldDef {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: PlainFieldType,

    /// Null is an acceptable value under strict type validation
    #[serde(default)]
    pub nullable: bool,

    /// Value used on construction when the field is not supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl PlainFieldDef {
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty: PlainFieldType::Scalar(ty),
            nullable: false,
            default: None,
        }
    }

    pub fn record(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: PlainFieldType::Record {
                record: schema.into(),
            },
            nullable: false,
            default: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn default_value(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rich_schema_from_json() {
        let schema: Schema = serde_json::from_value(json!({
            "kind": "rich",
            "name": "TestModel",
            "fields": [
                {"name": "char_field", "kind": "scalar", "type": "text"},
                {"name": "notes", "kind": "scalar"},
                {"name": "foreign_key", "kind": "foreign_key", "to": "Related", "nullable": true},
                {"name": "tags", "kind": "many_to_many", "to": "Tag"}
            ]
        }))
        .unwrap();

        let Schema::Rich(rich) = schema else {
            panic!("expected a rich schema");
        };
        assert!(rich.translatable);
        assert_eq!(rich.fields.len(), 4);
        assert_eq!(
            rich.fields[0].kind,
            RichFieldKind::Scalar {
                ty: Some(ScalarType::Text)
            }
        );
        assert_eq!(rich.fields[1].kind, RichFieldKind::Scalar { ty: None });
        assert_eq!(
            rich.fields[2],
            RichFieldDef::foreign_key("foreign_key", "Related").nullable()
        );
    }

    #[test]
    fn test_plain_schema_from_json() {
        let schema: Schema = serde_json::from_value(json!({
            "kind": "plain",
            "name": "TestDto",
            "fields": [
                {"name": "char_field", "type": "text"},
                {"name": "foreign_key", "type": {"record": "RelatedDto"}, "nullable": true},
                {"name": "count", "type": "int", "default": 0}
            ]
        }))
        .unwrap();

        assert_eq!(
            schema,
            Schema::Plain(
                PlainSchema::new("TestDto")
                    .field(PlainFieldDef::scalar("char_field", ScalarType::Text))
                    .field(PlainFieldDef::record("foreign_key", "RelatedDto").nullable())
                    .field(PlainFieldDef::scalar("count", ScalarType::Int).default_value(json!(0)))
            )
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_fields() {
        let schema = Schema::from(
            PlainSchema::new("Dto")
                .field(PlainFieldDef::scalar("a", ScalarType::Int))
                .field(PlainFieldDef::scalar("a", ScalarType::Text)),
        );
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate field `a`"));
    }

    #[test]
    fn test_validate_rejects_bad_identifiers() {
        let schema =
            Schema::from(RichSchema::new("Model").field(RichFieldDef::scalar("bad name", None)));
        assert!(schema.validate().is_err());

        let schema = Schema::from(RichSchema::new("9Model"));
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("_char_field"));
        assert!(is_identifier("field2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2field"));
        assert!(!is_identifier("a-b"));
    }
}
