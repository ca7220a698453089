//! dtomap Core - Translation engine between rich records and plain value objects
//!
//! This crate translates instances of a *rich* schema (persistence-style
//! records whose fields may be relations to other records) into instances of
//! a *plain* schema (flat value objects with explicit field types) and back,
//! without hand-written mapping code per schema pair.
//!
//! # Main Components
//!
//! - **Error Handling**: One error enum using `thiserror`, with `anyhow` interop
//! - **Core Types**: Runtime values, declared types and records
//! - **Schemas and Catalog**: Schema definitions, introspection and record construction
//! - **Translation Engine**: Field renaming, relation recursion, type validation
//!   and missing-field defaulting in both directions
//!
//! # Example
//!
//! ```
//! use dtomap_core::schema::{PlainFieldDef, PlainSchema, RichFieldDef, RichSchema};
//! use dtomap_core::{Record, ScalarType, SchemaCatalog, ToPlainOptions, Value};
//!
//! # fn example() -> dtomap_core::Result<()> {
//! let catalog = SchemaCatalog::builder()
//!     .schema(
//!         RichSchema::new("TestModel")
//!             .field(RichFieldDef::scalar("char_field", Some(ScalarType::Text)))
//!             .field(RichFieldDef::scalar("integer_field", Some(ScalarType::Int))),
//!     )
//!     .schema(
//!         PlainSchema::new("TestDto")
//!             .field(PlainFieldDef::scalar("char_field", ScalarType::Text)),
//!     )
//!     .build()?;
//!
//! let model = Record::new("TestModel")
//!     .with("char_field", "Alice")
//!     .with("integer_field", 5);
//! let dto = catalog.to_plain(&model, "TestDto", None, &ToPlainOptions::default())?;
//! assert_eq!(dto.get("char_field"), Some(&Value::from("Alice")));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod catalog;
pub mod error;
pub mod schema;
pub mod translation;
pub mod types;

mod proptest_strategies;

// Re-export main types for convenience
pub use catalog::{SchemaCatalog, SchemaCatalogBuilder};
pub use error::{Error, ErrorKind, Result};
pub use schema::{Schema, SchemaKind};
pub use translation::{
    to_plain, to_rich, RemapEntry, RemappingTable, SchemaField, SchemaView, ToPlainOptions,
    ToRichOptions,
};
pub use types::{DeclaredType, Record, ScalarType, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::MalformedMapping {
            field: "char_field".to_string(),
            message: "Test error".to_string(),
        };
        assert!(err.to_string().contains("Test error"));
        assert_eq!(err.kind(), ErrorKind::MalformedMapping);
    }
}
