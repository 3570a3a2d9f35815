// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema fragment trait definition.
//!
//! Subsystems of a larger application (sessions, locks, message buses) each
//! own one top-level slice of the configuration tree. The `SchemaFragment`
//! trait is how they contribute that slice, together with any cross-field
//! invariants it needs, without the processor knowing about them.

use crate::domain::capability::CapabilitySet;
use crate::ports::invariant::InvariantCheck;
use crate::schema::SchemaNode;

/// One subsystem's contribution to the configuration schema.
///
/// The fragment's schema is a function of the capability set so that
/// availability-dependent defaults stay explicit: a fragment may default its
/// storage backend differently depending on which backends the application
/// declared available, but it may not probe the environment itself.
///
/// # Examples
///
/// ```rust
/// use cfgtree::ports::SchemaFragment;
/// use cfgtree::domain::CapabilitySet;
/// use cfgtree::schema::SchemaNode;
///
/// struct LockFragment;
///
/// impl SchemaFragment for LockFragment {
///     fn key(&self) -> &str {
///         "lock"
///     }
///
///     fn schema(&self, _capabilities: &CapabilitySet) -> SchemaNode {
///         SchemaNode::group("lock")
///             .gated(false)
///             .shorthand_to("resources")
///             .child(SchemaNode::map("resources").default_entry("default").collect())
///     }
/// }
/// ```
pub trait SchemaFragment {
    /// Returns the top-level key this fragment owns.
    ///
    /// `ProcessorBuilder::build` rejects the fragment with a `SchemaError`
    /// when the subtree returned by [`schema`](Self::schema) is rooted at a
    /// different key.
    fn key(&self) -> &str;

    /// Builds the fragment's schema subtree for the given capability set.
    fn schema(&self, capabilities: &CapabilitySet) -> SchemaNode;

    /// Returns the cross-field invariants this fragment registers.
    ///
    /// Defaults to none.
    fn invariants(&self) -> Vec<Box<dyn InvariantCheck>> {
        Vec::new()
    }
}
