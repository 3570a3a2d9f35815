// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration processor.
//!
//! Two distinct categories live here. `ValidationError` covers bad user input
//! (the only errors `process` returns); `SchemaError` covers a malformed
//! schema definition, which is a programming error in the embedding
//! application, never something the configuration author caused. Both use
//! `thiserror` for proper error handling and conversion.

use crate::domain::path::ConfigPath;
use thiserror::Error;

/// A user-input validation failure.
///
/// Every variant points at the offending path or scope and renders a message
/// suitable for direct CLI or log display. Validation aborts on the first
/// failure; no partial document is returned.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::errors::ValidationError;
/// use cfgtree::domain::path::ConfigPath;
///
/// let err = ValidationError::UnknownKey {
///     path: ConfigPath::from("session.cokie_name"),
/// };
/// assert_eq!(err.to_string(), "unrecognized key 'session.cokie_name'");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A value's shape does not match its schema node.
    #[error("invalid shape at '{path}': expected {expected}, found {found}")]
    Shape {
        /// Path of the offending value.
        path: ConfigPath,
        /// The shape the schema declares.
        expected: String,
        /// The shape actually supplied.
        found: String,
    },

    /// A key appeared that the schema does not declare.
    #[error("unrecognized key '{path}'")]
    UnknownKey {
        /// Path of the unrecognized key.
        path: ConfigPath,
    },

    /// Two mutually exclusive sibling fields were both set.
    #[error("'{field_a}' and '{field_b}' cannot both be set under '{scope}'")]
    MutualExclusion {
        /// First conflicting field name.
        field_a: String,
        /// Second conflicting field name.
        field_b: String,
        /// The enclosing group path.
        scope: ConfigPath,
    },

    /// A selector is required because its collection has multiple entries.
    #[error("'{selector}' must be set under '{scope}' because more than one entry is defined")]
    MissingSelector {
        /// The selector field that must be set.
        selector: String,
        /// The enclosing group path.
        scope: ConfigPath,
    },

    /// A selector names an entry that does not exist in its collection.
    #[error(
        "'{selector}' refers to unknown entry '{value}'; available entries: {}",
        quoted_list(available)
    )]
    UnresolvedReference {
        /// The selector field.
        selector: String,
        /// The value the selector holds.
        value: String,
        /// The entry names that do exist, sorted ascending.
        available: Vec<String>,
    },

    /// A string field contains characters its pattern disallows.
    #[error("invalid value '{value}' for '{field}'")]
    Pattern {
        /// The offending field path.
        field: ConfigPath,
        /// The rejected value.
        value: String,
    },

    /// A value is not among the node's allowed values.
    #[error("invalid value '{value}' at '{path}'; expected one of: {}", quoted_list(allowed))]
    InvalidValue {
        /// Path of the offending value.
        path: ConfigPath,
        /// The rejected value.
        value: String,
        /// The permitted values, sorted ascending.
        allowed: Vec<String>,
    },
}

impl ValidationError {
    /// Creates an `UnresolvedReference` with the available keys sorted.
    ///
    /// Sorting here keeps the rendered message deterministic regardless of
    /// how the caller collected the keys.
    pub fn unresolved_reference(
        selector: impl Into<String>,
        value: impl Into<String>,
        mut available: Vec<String>,
    ) -> Self {
        available.sort();
        ValidationError::UnresolvedReference {
            selector: selector.into(),
            value: value.into(),
            available,
        }
    }

    /// Creates an `InvalidValue` with the allowed values sorted.
    pub fn invalid_value(
        path: ConfigPath,
        value: impl Into<String>,
        mut allowed: Vec<String>,
    ) -> Self {
        allowed.sort();
        ValidationError::InvalidValue {
            path,
            value: value.into(),
            allowed,
        }
    }
}

/// Renders a list of names as `"a", "b", "c"` for error messages.
fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A malformed schema definition.
///
/// These are programming errors in the embedding application, raised when the
/// processor is built, so callers never mistake a broken schema for bad user
/// configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A node key does not match the allowed key syntax.
    #[error("invalid schema key '{key}'")]
    InvalidKey {
        /// The offending key.
        key: String,
    },

    /// A scalar or list node declared children.
    #[error("schema node '{key}' is a leaf and cannot have children")]
    ChildrenNotAllowed {
        /// The offending node key.
        key: String,
    },

    /// Two children of one node share a key.
    #[error("schema node '{parent}' declares child '{key}' twice")]
    DuplicateChild {
        /// The parent node key.
        parent: String,
        /// The duplicated child key.
        key: String,
    },

    /// A group's shorthand target is not one of its children.
    #[error("schema node '{key}' routes shorthand to unknown child '{target}'")]
    UnknownShorthandTarget {
        /// The group node key.
        key: String,
        /// The missing target child.
        target: String,
    },

    /// A default-entry name was declared on a non-map node.
    #[error("schema node '{key}' declares a default entry name but is not a map")]
    DefaultEntryNotAllowed {
        /// The offending node key.
        key: String,
    },

    /// A node's validation pattern failed to compile.
    #[error("schema node '{key}' has an invalid pattern: {source}")]
    InvalidPattern {
        /// The offending node key.
        key: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A default references a sibling collection that does not exist.
    #[error("schema node '{key}' references unknown sibling collection '{collection}'")]
    UnknownCollection {
        /// The node carrying the reference.
        key: String,
        /// The missing collection key.
        collection: String,
    },

    /// A fragment's declared key does not match its schema subtree's root.
    #[error("schema fragment '{declared}' produced a subtree rooted at '{actual}'")]
    FragmentKeyMismatch {
        /// The key the fragment declares.
        declared: String,
        /// The root key of the subtree it produced.
        actual: String,
    },

    /// An enabled-gated group has no boolean `enabled` child.
    #[error("schema node '{key}' is enabled-gated but has no 'enabled' child")]
    MissingEnabledChild {
        /// The offending group key.
        key: String,
    },
}

/// A specialized Result type for configuration processing.
pub type Result<T> = std::result::Result<T, ValidationError>;
