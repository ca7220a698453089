//! Translation engine between rich records and plain records
//!
//! Both directions share one algorithm: resolve every source field through
//! the remapping table, keep the fields whose resolved name exists in the
//! destination schema, translate each value (recursing into relations when
//! requested), optionally null the destination fields nobody assigned, and
//! finally construct the destination record through the catalog.
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

pub mod field;
pub mod instance;
pub mod mapping;
pub mod options;
pub mod resolver;
pub mod to_plain;
pub mod to_rich;
pub mod view;


use crate::catalog::SchemaCatalog;
use crate::{Error, Record, Result, Value};

pub use field::{FieldClass, SchemaField};
pub use instance::InstanceView;
pub use mapping::{RemapEntry, RemappingTable};
pub use options::{ToPlainOptions, ToRichOptions, DEFAULT_MAX_DEPTH};
pub use resolver::FieldNameResolver;
pub use to_plain::RichToPlainTranslator;
pub use to_rich::PlainToRichTranslator;
pub use view::SchemaView;

/// Translate a rich record into a new record of `plain_schema`
///
/// # Errors
///
/// Returns an error if:
/// - either schema is unknown or of the wrong kind (`InvalidSchema`)
/// - a remapping entry has no usable destination name (`MalformedMapping`)
/// - `validate_types` is set and a scalar value has another type (`TypeMismatch`)
/// - mandatory destination fields stay unassigned (`ConstructionFailed`)
/// - a related record's schema does not support translation (`RelationNotTranslatable`)
///
/// # Example
///
/// ```
/// use dtomap_core::schema::{PlainFieldDef, PlainSchema, RichFieldDef, RichSchema};
/// use dtomap_core::{Record, RemappingTable, ScalarType, SchemaCatalog, ToPlainOptions, Value};
///
/// # fn example() -> dtomap_core::Result<()> {
/// let catalog = SchemaCatalog::builder()
///     .schema(
///         RichSchema::new("Person")
///             .field(RichFieldDef::scalar("name", Some(ScalarType::Text))),
///     )
///     .schema(
///         PlainSchema::new("PersonDto")
///             .field(PlainFieldDef::scalar("_name", ScalarType::Text)),
///     )
///     .build()?;
///
/// let person = Record::new("Person").with("name", "Bob");
/// let remapping = RemappingTable::new().rename("name", "_name");
/// let dto = catalog.to_plain(&person, "PersonDto", Some(&remapping), &ToPlainOptions::default())?;
///
/// assert_eq!(dto.get("_name"), Some(&Value::from("Bob")));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn to_plain(
    catalog: &SchemaCatalog,
    record: &Record,
    plain_schema: &str,
    remapping: Option<&RemappingTable>,
    options: &ToPlainOptions,
) -> Result<Record> {
    let empty = RemappingTable::new();
    let remapping = remapping.unwrap_or(&empty);
    RichToPlainTranslator::new(catalog, record, plain_schema, remapping, options)?.translate()
}

/// Translate a plain record into a new record of `rich_schema`
///
/// Values are not type checked in this direction.
pub fn to_rich(
    catalog: &SchemaCatalog,
    record: &Record,
    rich_schema: &str,
    remapping: Option<&RemappingTable>,
    options: &ToRichOptions,
) -> Result<Record> {
    let empty = RemappingTable::new();
    let remapping = remapping.unwrap_or(&empty);
    PlainToRichTranslator::new(catalog, record, rich_schema, remapping, options)?.translate()
}

pub(crate) fn check_depth(schema: &str, depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(Error::DepthLimitExceeded {
            schema: schema.to_string(),
            max_depth,
        });
    }
    Ok(())
}

/// Null out unassigned fields when requested, then construct the destination
pub(crate) fn build_destination(
    catalog: &SchemaCatalog,
    destination: &SchemaView,
    mut assembled: Vec<(String, Value)>,
    nullify_missing: bool,
) -> Result<Record> {
    if nullify_missing {
        let missing: Vec<String> = destination
            .field_names()
            .filter(|name| !assembled.iter().any(|(assigned, _)| assigned == name))
            .map(str::to_string)
            .collect();
        for name in missing {
            assembled.push((name, Value::Null));
        }
    }

    catalog
        .construct(destination.name(), assembled)
        .map_err(|err| match err {
            Error::ConstructionFailed { schema, message } => Error::ConstructionFailed {
                schema,
                message: format!(
                    "{}; set `nullify_missing` to fill missing fields with null",
                    message
                ),
            },
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PlainFieldDef, PlainSchema, RichFieldDef, RichSchema};
    use crate::{ErrorKind, ScalarType};

    #[test]
    fn test_check_depth() {
        assert!(check_depth("A", 0, 0).is_ok());
        assert!(check_depth("A", 3, 3).is_ok());
        assert_eq!(
            check_depth("A", 4, 3).unwrap_err().kind(),
            ErrorKind::DepthLimitExceeded
        );
    }

    #[test]
    fn test_construction_failure_mentions_escape_hatch() {
        let catalog = SchemaCatalog::builder()
            .schema(RichSchema::new("Model").field(RichFieldDef::scalar("a", None)))
            .schema(
                PlainSchema::new("Dto")
                    .field(PlainFieldDef::scalar("a", ScalarType::Int))
                    .field(PlainFieldDef::scalar("b", ScalarType::Int)),
            )
            .build()
            .unwrap();
        let record = Record::new("Model").with("a", 1);

        let err = to_plain(&catalog, &record, "Dto", None, &ToPlainOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConstructionFailed);
        assert!(err.to_string().contains("`Dto`"));
        assert!(err.to_string().contains("nullify_missing"));

        let dto = to_plain(
            &catalog,
            &record,
            "Dto",
            None,
            &ToPlainOptions::new().with_nullify_missing(true),
        )
        .unwrap();
        assert_eq!(dto.get("b"), Some(&Value::Null));
    }
}
