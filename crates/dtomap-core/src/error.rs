//! Error types for the dtomap core library
//!
//! This module defines the error handling system for dtomap, using thiserror
//! for ergonomic error definitions and anyhow for flexible error contexts.
//! Every error aborts the translation call that raised it, including all
//! enclosing recursive levels; the engine never returns partial results.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for dtomap operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema does not satisfy the rich or plain shape contract
    #[error("Invalid schema `{schema}`: {message}")]
    InvalidSchema { schema: String, message: String },

    /// A field lookup missed
    #[error("Field `{field}` not found in schema `{schema}`")]
    FieldNotFound { schema: String, field: String },

    /// A remapping entry lacks a usable destination name
    #[error("Malformed mapping for `{field}`: {message}")]
    MalformedMapping { field: String, message: String },

    /// Strict runtime type check failed
    #[error("Type mismatch: `{value}` from `{schema}.{field}` does not match type `{expected}`")]
    TypeMismatch {
        schema: String,
        field: String,
        value: String,
        expected: String,
    },

    /// The destination instance could not be built from the assembled fields
    #[error("Can't build `{schema}`: {message}")]
    ConstructionFailed { schema: String, message: String },

    /// Reading a field from an instance failed although the schema declares it
    #[error("Field access error on `{schema}.{field}`: {message}")]
    FieldAccessError {
        schema: String,
        field: String,
        message: String,
    },

    /// Recursion requested into a related record that does not support translation
    #[error("Relation `{field}` points to `{schema}`, which does not support translation")]
    RelationNotTranslatable { schema: String, field: String },

    /// Relation chain deeper than the configured guard
    #[error("Relation depth limit of {max_depth} exceeded at `{schema}`")]
    DepthLimitExceeded { schema: String, max_depth: usize },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic error with context
    ///
    /// The engine never raises this itself. It is where `anyhow` errors from
    /// caller code land when they are propagated with `?` into a dtomap
    /// `Result`, e.g. from a custom loader.
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Discriminant of [`Error`], for callers implementing fallback policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidSchema,
    FieldNotFound,
    MalformedMapping,
    TypeMismatch,
    ConstructionFailed,
    FieldAccessError,
    RelationNotTranslatable,
    DepthLimitExceeded,
    Json,
    Io,
    Internal,
}

impl Error {
    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSchema { .. } => ErrorKind::InvalidSchema,
            Error::FieldNotFound { .. } => ErrorKind::FieldNotFound,
            Error::MalformedMapping { .. } => ErrorKind::MalformedMapping,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::ConstructionFailed { .. } => ErrorKind::ConstructionFailed,
            Error::FieldAccessError { .. } => ErrorKind::FieldAccessError,
            Error::RelationNotTranslatable { .. } => ErrorKind::RelationNotTranslatable,
            Error::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            Error::Json { .. } => ErrorKind::Json,
            Error::Io { .. } => ErrorKind::Io,
            Error::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_schema(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            schema: schema.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Lets callers mix `anyhow` context into code that returns `dtomap_core::Result`
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
