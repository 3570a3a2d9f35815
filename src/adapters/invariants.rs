// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in cross-field invariant checks.
//!
//! This module provides the stock implementations of the `InvariantCheck`
//! port: mutual exclusion between sibling fields, selectors required by
//! multi-entry collections, referential integrity of selectors, and name
//! pattern enforcement.

use crate::domain::errors::{Result, SchemaError, ValidationError};
use crate::domain::path::{ConfigPath, ScopePath};
use crate::domain::raw_value::RawValue;
use crate::ports::invariant::InvariantCheck;
use regex::Regex;

/// Empty collections count as unset: a defaulted empty map must not trip
/// exclusion checks when a normalized document is processed again.
fn field_is_set(tree: &RawValue, field: &str) -> bool {
    match tree.get(field) {
        Some(RawValue::Map(entries)) => !entries.is_empty(),
        Some(RawValue::List(items)) => !items.is_empty(),
        Some(value) => !value.is_null(),
        None => false,
    }
}

/// At most one of two sibling fields may be set.
///
/// # Examples
///
/// ```
/// use cfgtree::adapters::invariants::MutualExclusion;
///
/// let check = MutualExclusion::new("http_client.default_options", "retry_dsn", "retry_service");
/// ```
pub struct MutualExclusion {
    scope: ScopePath,
    field_a: String,
    field_b: String,
}

impl MutualExclusion {
    /// Creates a mutual-exclusion check between two fields under `scope`.
    pub fn new(
        scope: impl Into<ScopePath>,
        field_a: impl Into<String>,
        field_b: impl Into<String>,
    ) -> Self {
        MutualExclusion {
            scope: scope.into(),
            field_a: field_a.into(),
            field_b: field_b.into(),
        }
    }
}

impl InvariantCheck for MutualExclusion {
    fn name(&self) -> &str {
        "mutual-exclusion"
    }

    fn scope(&self) -> &ScopePath {
        &self.scope
    }

    fn check(&self, scope: &ConfigPath, tree: &RawValue) -> Result<()> {
        if field_is_set(tree, &self.field_a) && field_is_set(tree, &self.field_b) {
            return Err(ValidationError::MutualExclusion {
                field_a: self.field_a.clone(),
                field_b: self.field_b.clone(),
                scope: scope.clone(),
            });
        }
        Ok(())
    }
}

/// A selector field is required once its collection has several entries.
///
/// With zero or one entry the selector may stay unset (defaulting later to
/// the sole entry's name); with two or more entries an unset selector is
/// ambiguous and rejected.
pub struct RequiredSelector {
    scope: ScopePath,
    collection: String,
    selector: String,
}

impl RequiredSelector {
    /// Creates a required-selector check for `selector` over `collection`.
    pub fn new(
        scope: impl Into<ScopePath>,
        collection: impl Into<String>,
        selector: impl Into<String>,
    ) -> Self {
        RequiredSelector {
            scope: scope.into(),
            collection: collection.into(),
            selector: selector.into(),
        }
    }
}

impl InvariantCheck for RequiredSelector {
    fn name(&self) -> &str {
        "required-selector"
    }

    fn scope(&self) -> &ScopePath {
        &self.scope
    }

    fn check(&self, scope: &ConfigPath, tree: &RawValue) -> Result<()> {
        let entries = tree
            .get(&self.collection)
            .and_then(RawValue::as_map)
            .map(|m| m.len())
            .unwrap_or(0);
        if entries > 1 && !field_is_set(tree, &self.selector) {
            return Err(ValidationError::MissingSelector {
                selector: self.selector.clone(),
                scope: scope.clone(),
            });
        }
        Ok(())
    }
}

/// A selector's value must name an existing entry of its collection.
pub struct ResolvedReference {
    scope: ScopePath,
    selector: String,
    collection: String,
}

impl ResolvedReference {
    /// Creates a referential-integrity check for `selector` into `collection`.
    pub fn new(
        scope: impl Into<ScopePath>,
        selector: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        ResolvedReference {
            scope: scope.into(),
            selector: selector.into(),
            collection: collection.into(),
        }
    }
}

impl InvariantCheck for ResolvedReference {
    fn name(&self) -> &str {
        "resolved-reference"
    }

    fn scope(&self) -> &ScopePath {
        &self.scope
    }

    fn check(&self, _scope: &ConfigPath, tree: &RawValue) -> Result<()> {
        let value = match tree.get(&self.selector).and_then(RawValue::as_str) {
            Some(v) => v,
            None => return Ok(()),
        };
        let available: Vec<String> = tree
            .get(&self.collection)
            .and_then(RawValue::as_map)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        if !available.iter().any(|k| k == value) {
            return Err(ValidationError::unresolved_reference(
                self.selector.clone(),
                value,
                available,
            ));
        }
        Ok(())
    }
}

/// A string field must match an allowed-character pattern.
pub struct NamePattern {
    scope: ScopePath,
    field: String,
    pattern: Regex,
}

impl NamePattern {
    /// Creates a name-pattern check for `field` under `scope`.
    ///
    /// The pattern is compiled here; an invalid pattern is a schema
    /// definition error, not a user error.
    pub fn new(
        scope: impl Into<ScopePath>,
        field: impl Into<String>,
        pattern: &str,
    ) -> std::result::Result<Self, SchemaError> {
        let field = field.into();
        let pattern = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
            key: field.clone(),
            source,
        })?;
        Ok(NamePattern {
            scope: scope.into(),
            field,
            pattern,
        })
    }
}

impl InvariantCheck for NamePattern {
    fn name(&self) -> &str {
        "name-pattern"
    }

    fn scope(&self) -> &ScopePath {
        &self.scope
    }

    fn check(&self, scope: &ConfigPath, tree: &RawValue) -> Result<()> {
        if let Some(value) = tree.get(&self.field).and_then(RawValue::as_str) {
            if !self.pattern.is_match(value) {
                return Err(ValidationError::Pattern {
                    field: scope.child(&self.field),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}
