//! Options controlling a translation call
//!
//! Copyright (c) 2025 dtomap Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Maximum relation depth followed when recursing
pub const DEFAULT_MAX_DEPTH: usize = 32;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Options for rich to plain translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToPlainOptions {
    /// Check that every scalar value has exactly the destination's declared type
    pub validate_types: bool,

    /// Translate related records instead of nulling relation fields
    pub recurse: bool,

    /// Fill destination fields nobody assigned with null
    pub nullify_missing: bool,

    /// Relation depth guard
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ToPlainOptions {
    fn default() -> Self {
        Self {
            validate_types: false,
            recurse: false,
            nullify_missing: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ToPlainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validate_types(mut self, validate_types: bool) -> Self {
        self.validate_types = validate_types;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_nullify_missing(mut self, nullify_missing: bool) -> Self {
        self.nullify_missing = nullify_missing;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options for plain to rich translation
///
/// There is no type validation in this direction; constructing a rich record
/// is left to validate its own values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToRichOptions {
    /// Translate nested plain records instead of nulling relation fields
    pub recurse: bool,

    /// Fill destination fields nobody assigned with null
    pub nullify_missing: bool,

    /// Relation depth guard
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ToRichOptions {
    fn default() -> Self {
        Self {
            recurse: false,
            nullify_missing: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ToRichOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn with_nullify_missing(mut self, nullify_missing: bool) -> Self {
        self.nullify_missing = nullify_missing;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
