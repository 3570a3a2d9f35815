// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-field invariant trait definition.
//!
//! This module defines the `InvariantCheck` trait, the port for validation
//! rules that span multiple sibling fields. Built-in checks (mutual
//! exclusion, required selectors, referential integrity, name patterns) live
//! in the adapters layer; applications can register their own.

use crate::domain::errors::Result;
use crate::domain::path::{ConfigPath, ScopePath};
use crate::domain::raw_value::RawValue;

/// A named cross-field check bound to a scope.
///
/// Checks run against the merged, pre-default tree, in registration order;
/// the first failure aborts processing. A check's scope may contain `*`
/// segments, in which case it runs once per matching entry with the concrete
/// path substituted, so one registration covers a rule that applies both at
/// the top level and inside every named sub-entry.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the processor holding them is
/// shared across threads.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::InvariantCheck;
/// use cfgtree::domain::{ConfigPath, RawValue, Result, ScopePath, ValidationError};
///
/// struct RequireName {
///     scope: ScopePath,
/// }
///
/// impl InvariantCheck for RequireName {
///     fn name(&self) -> &str {
///         "require-name"
///     }
///
///     fn scope(&self) -> &ScopePath {
///         &self.scope
///     }
///
///     fn check(&self, scope: &ConfigPath, tree: &RawValue) -> Result<()> {
///         match tree.get("name") {
///             Some(v) if !v.is_null() => Ok(()),
///             _ => Err(ValidationError::UnknownKey {
///                 path: scope.child("name"),
///             }),
///         }
///     }
/// }
/// ```
pub trait InvariantCheck: Send + Sync {
    /// Returns a short identifier for this check, used in trace logging.
    fn name(&self) -> &str;

    /// Returns the scope pattern this check is bound to.
    fn scope(&self) -> &ScopePath;

    /// Runs the check against one concrete occurrence of the scope.
    ///
    /// `scope` is the concrete path of the subtree (with `*` segments
    /// resolved to entry names) and `tree` is the subtree itself. Fields the
    /// user did not supply appear as absent or null; defaults have not been
    /// injected yet.
    fn check(&self, scope: &ConfigPath, tree: &RawValue) -> Result<()>;
}
