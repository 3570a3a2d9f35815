// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path newtypes for addressing nodes in a configuration tree.
//!
//! This module provides `ConfigPath`, a dotted path identifying one concrete
//! node (used in error messages), and `ScopePath`, a path pattern that may
//! contain `*` segments matching every entry of a named collection (used to
//! bind one invariant to many occurrences).

use std::fmt;

/// A dotted path to one concrete node in a configuration tree.
///
/// `ConfigPath` is a newtype around `String` so paths cannot be confused with
/// plain field names in APIs and error types.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::path::ConfigPath;
///
/// let path = ConfigPath::root().child("lock").child("resources");
/// assert_eq!(path.as_str(), "lock.resources");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigPath(String);

impl ConfigPath {
    /// The empty path addressing the document root.
    pub fn root() -> Self {
        ConfigPath(String::new())
    }

    /// Returns a new path with `key` appended as a child segment.
    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() {
            ConfigPath(key.to_string())
        } else {
            ConfigPath(format!("{}.{}", self.0, key))
        }
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ConfigPath {
    fn from(s: &str) -> Self {
        ConfigPath(s.to_string())
    }
}

impl From<String> for ConfigPath {
    fn from(s: String) -> Self {
        ConfigPath(s)
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One segment of a [`ScopePath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeSegment {
    /// Matches exactly the named key.
    Key(String),
    /// Matches every entry of the map at this position.
    AnyEntry,
}

/// A path pattern binding an invariant to one or more tree locations.
///
/// A scope is a dotted path where a `*` segment stands for "each entry of the
/// named collection here", so `"messenger.buses"` names one group while
/// `"lock.packages.*"` names every package sub-entry. Expansion over `*`
/// visits entries in sorted key order.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::path::{ScopePath, ScopeSegment};
///
/// let scope = ScopePath::parse("lock.packages.*");
/// assert_eq!(scope.segments().len(), 3);
/// assert_eq!(scope.segments()[2], ScopeSegment::AnyEntry);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopePath {
    segments: Vec<ScopeSegment>,
}

impl ScopePath {
    /// Parses a dotted scope string. An empty string is the root scope.
    pub fn parse(scope: &str) -> Self {
        let segments = if scope.is_empty() {
            Vec::new()
        } else {
            scope
                .split('.')
                .map(|seg| {
                    if seg == "*" {
                        ScopeSegment::AnyEntry
                    } else {
                        ScopeSegment::Key(seg.to_string())
                    }
                })
                .collect()
        };
        ScopePath { segments }
    }

    /// The root scope, matching the whole document.
    pub fn root() -> Self {
        ScopePath { segments: Vec::new() }
    }

    /// Returns the scope's segments in order.
    pub fn segments(&self) -> &[ScopeSegment] {
        &self.segments
    }
}

impl From<&str> for ScopePath {
    fn from(s: &str) -> Self {
        ScopePath::parse(s)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for seg in &self.segments {
            if !first {
                write!(f, ".")?;
            }
            first = false;
            match seg {
                ScopeSegment::Key(key) => write!(f, "{}", key)?,
                ScopeSegment::AnyEntry => write!(f, "*")?,
            }
        }
        Ok(())
    }
}
