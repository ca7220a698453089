//! Read access to record instances
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use super::view::SchemaView;
use crate::{Error, Record, Result, Value};

/// Read-only view of one record through the view of its schema
#[derive(Debug, Clone, Copy)]
pub struct InstanceView<'a> {
    record: &'a Record,
    view: &'a SchemaView,
}

impl<'a> InstanceView<'a> {
    /// Pair a record with the view of its schema
    ///
    /// Fails with `InvalidSchema` when the record belongs to another schema.
    pub fn new(record: &'a Record, view: &'a SchemaView) -> Result<Self> {
        if record.schema() != view.name() {
            return Err(Error::invalid_schema(
                view.name(),
                format!("record is an instance of `{}`", record.schema()),
            ));
        }
        Ok(Self { record, view })
    }

    /// Current value of a visible field
    pub fn get(&self, field: &str) -> Result<&'a Value> {
        if !self.view.has_field(field) {
            return Err(Error::FieldNotFound {
                schema: self.view.name().to_string(),
                field: field.to_string(),
            });
        }

        self.record.get(field).ok_or_else(|| Error::FieldAccessError {
            schema: self.view.name().to_string(),
            field: field.to_string(),
            message: "record carries no value for this field".to_string(),
        })
    }

    pub fn schema_name(&self) -> &'a str {
        self.view.name()
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }
}
