// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-default validation.
//!
//! Validation runs on the merged tree before defaults are injected, so every
//! check sees only what the user actually supplied. Node-level checks
//! (patterns, allowed values) run first in schema declaration order, then
//! registered cross-field invariants in registration order. The first failure
//! aborts; there is no error aggregation.

use crate::domain::errors::{Result, ValidationError};
use crate::domain::path::{ConfigPath, ScopeSegment};
use crate::domain::raw_value::RawValue;
use crate::ports::invariant::InvariantCheck;
use crate::schema::{NodeKind, SchemaNode};
use tracing::trace;

/// Checks node-level rules (pattern, allowed values) across the tree.
pub(crate) fn validate_tree(
    node: &SchemaNode,
    value: &RawValue,
    path: &ConfigPath,
) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    match node.kind() {
        NodeKind::Scalar => validate_scalar(node, value, path),
        NodeKind::List => Ok(()),
        NodeKind::Map => {
            if let (Some(prototype), Some(entries)) = (node.entry_prototype(), value.as_map()) {
                for (name, entry) in entries {
                    validate_tree(prototype, entry, &path.child(name))?;
                }
            }
            Ok(())
        }
        NodeKind::Group => {
            // Schema declaration order, not map order, so the first error is
            // the one the schema author declared first.
            for child in node.node_children() {
                if let Some(member) = value.get(child.key()) {
                    validate_tree(child, member, &path.child(child.key()))?;
                }
            }
            Ok(())
        }
    }
}

fn validate_scalar(node: &SchemaNode, value: &RawValue, path: &ConfigPath) -> Result<()> {
    let scalar = match value.as_scalar() {
        Some(s) if !s.is_null() => s,
        _ => return Ok(()),
    };
    if let (Some(pattern), Some(text)) = (node.compiled_pattern(), scalar.as_str()) {
        if !pattern.is_match(text) {
            return Err(ValidationError::Pattern {
                field: path.clone(),
                value: text.to_string(),
            });
        }
    }
    if let Some(allowed) = node.allowed() {
        if !allowed.contains(scalar) {
            return Err(ValidationError::invalid_value(
                path.clone(),
                scalar.to_string(),
                allowed.iter().map(ToString::to_string).collect(),
            ));
        }
    }
    Ok(())
}

/// Runs registered invariants against the merged tree, in order.
pub(crate) fn run_invariants(
    checks: &[Box<dyn InvariantCheck>],
    tree: &RawValue,
) -> Result<()> {
    for check in checks {
        for (path, subtree) in resolve_scope(check.scope().segments(), tree) {
            trace!(check = check.name(), scope = %path, "running invariant");
            check.check(&path, subtree)?;
        }
    }
    Ok(())
}

/// Expands a scope pattern over the tree into concrete (path, subtree) pairs.
///
/// `*` segments fan out over map entries in sorted key order; scopes whose
/// path is absent from the tree match nothing.
fn resolve_scope<'a>(
    segments: &[ScopeSegment],
    tree: &'a RawValue,
) -> Vec<(ConfigPath, &'a RawValue)> {
    let mut matches = vec![(ConfigPath::root(), tree)];
    for segment in segments {
        let mut next = Vec::new();
        for (path, value) in matches {
            match segment {
                ScopeSegment::Key(key) => {
                    if let Some(child) = value.get(key) {
                        next.push((path.child(key), child));
                    }
                }
                ScopeSegment::AnyEntry => {
                    if let Some(entries) = value.as_map() {
                        for (name, entry) in entries {
                            next.push((path.child(name), entry));
                        }
                    }
                }
            }
        }
        matches = next;
    }
    matches
}
