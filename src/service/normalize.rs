// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shorthand normalization.
//!
//! Each layer is normalized against the schema before merging: compact
//! scalar/list shorthand expands into canonical nested form, inline `enabled`
//! flags are extracted, scalar values coerce to their declared types, and
//! anything whose shape cannot match its node fails with a shape error.
//! Normalization is idempotent: canonical form normalizes to itself.

use crate::domain::errors::{Result, ValidationError};
use crate::domain::path::ConfigPath;
use crate::domain::raw_value::{RawValue, Scalar};
use crate::schema::{NodeKind, SchemaNode};
use std::collections::BTreeMap;
use tracing::trace;

fn shape_error(path: &ConfigPath, expected: &str, found: &RawValue) -> ValidationError {
    ValidationError::Shape {
        path: path.clone(),
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}

/// Normalizes one raw value against its schema node.
///
/// Null passes through every kind unchanged; an explicit null means "unset"
/// and is resolved during default injection.
pub(crate) fn normalize(node: &SchemaNode, raw: RawValue, path: &ConfigPath) -> Result<RawValue> {
    if raw.is_null() {
        return Ok(raw);
    }
    match node.kind() {
        NodeKind::Scalar => normalize_scalar(node, raw, path),
        NodeKind::List => normalize_list(node, raw, path),
        NodeKind::Map => normalize_map(node, raw, path),
        NodeKind::Group => normalize_group(node, raw, path),
    }
}

fn normalize_scalar(node: &SchemaNode, raw: RawValue, path: &ConfigPath) -> Result<RawValue> {
    let scalar = match raw {
        RawValue::Scalar(s) => s,
        other => {
            let expected = node
                .scalar_type()
                .map(|t| t.name())
                .unwrap_or("scalar");
            return Err(shape_error(path, expected, &other));
        }
    };
    match node.scalar_type() {
        Some(target) => scalar.coerce(target).map(RawValue::Scalar).ok_or_else(|| {
            shape_error(path, target.name(), &RawValue::Scalar(scalar.clone()))
        }),
        None => Ok(RawValue::Scalar(scalar)),
    }
}

fn normalize_list(_node: &SchemaNode, raw: RawValue, path: &ConfigPath) -> Result<RawValue> {
    match raw {
        // Bare scalar shorthand for a one-element list.
        RawValue::Scalar(s) => Ok(RawValue::List(vec![RawValue::Scalar(s)])),
        RawValue::List(items) => Ok(RawValue::List(items)),
        other => Err(shape_error(path, "list", &other)),
    }
}

fn normalize_map(node: &SchemaNode, raw: RawValue, path: &ConfigPath) -> Result<RawValue> {
    let mut entries: BTreeMap<String, RawValue> = BTreeMap::new();
    match raw {
        RawValue::Scalar(s) => {
            let name = node
                .default_entry_name()
                .ok_or_else(|| shape_error(path, "map", &RawValue::Scalar(s.clone())))?;
            insert_entry(node, &mut entries, name, RawValue::Scalar(s));
        }
        RawValue::List(items) => {
            for item in items {
                match item {
                    // A {name, value} pair becomes a named entry.
                    RawValue::Map(pair) if pair.contains_key("name") => {
                        let name = pair
                            .get("name")
                            .and_then(RawValue::as_str)
                            .ok_or_else(|| {
                                shape_error(&path.child("name"), "string", &RawValue::Map(pair.clone()))
                            })?
                            .to_string();
                        let value = pair.get("value").cloned().unwrap_or_else(|| {
                            // Pairs without an explicit value keep the rest
                            // of the mapping as the entry value.
                            let mut rest = pair.clone();
                            rest.remove("name");
                            RawValue::Map(rest)
                        });
                        insert_entry(node, &mut entries, &name, value);
                    }
                    RawValue::Scalar(s) => {
                        let name = node.default_entry_name().ok_or_else(|| {
                            shape_error(path, "named entries", &RawValue::Scalar(s.clone()))
                        })?;
                        insert_entry(node, &mut entries, name, RawValue::Scalar(s));
                    }
                    other => return Err(shape_error(path, "scalar or {name, value} pair", &other)),
                }
            }
        }
        RawValue::Map(existing) => {
            for (name, value) in existing {
                insert_entry(node, &mut entries, &name, value);
            }
        }
    }

    // Entry values canonicalize through the prototype when one is declared.
    if let Some(prototype) = node.entry_prototype() {
        let mut normalized = BTreeMap::new();
        for (name, value) in entries {
            let child_path = path.child(&name);
            normalized.insert(name, normalize(prototype, value, &child_path)?);
        }
        entries = normalized;
    }
    Ok(RawValue::Map(entries))
}

/// Inserts one map entry, collecting repeats into lists on resource maps.
fn insert_entry(
    node: &SchemaNode,
    entries: &mut BTreeMap<String, RawValue>,
    name: &str,
    value: RawValue,
) {
    if !node.collects_entries() {
        entries.insert(name.to_string(), value);
        return;
    }
    // Resource-list entries are always lists; a repeated name accumulates
    // instead of replacing.
    let mut incoming = match value {
        RawValue::List(items) => items,
        single => vec![single],
    };
    match entries.get_mut(name) {
        Some(RawValue::List(existing)) => existing.append(&mut incoming),
        _ => {
            entries.insert(name.to_string(), RawValue::List(incoming));
        }
    }
}

fn normalize_group(node: &SchemaNode, raw: RawValue, path: &ConfigPath) -> Result<RawValue> {
    let mut members: BTreeMap<String, RawValue> = BTreeMap::new();
    match raw {
        // `section: true` / `section: false` toggles a gated group.
        RawValue::Scalar(Scalar::Bool(b)) if node.is_gated() => {
            members.insert("enabled".to_string(), RawValue::from(b));
        }
        RawValue::Scalar(s) => {
            let target = node
                .shorthand_target()
                .ok_or_else(|| shape_error(path, "map", &RawValue::Scalar(s.clone())))?;
            members.insert(target.to_string(), RawValue::Scalar(s));
        }
        RawValue::List(items) => {
            let target = node
                .shorthand_target()
                .ok_or_else(|| shape_error(path, "map", &RawValue::List(items.clone())))?;
            let mut remaining = Vec::with_capacity(items.len());
            for item in items {
                // An inline `{enabled: ...}` entry configures the group
                // itself rather than the shorthand value.
                match extract_enabled(item) {
                    Ok(flag) => {
                        members.insert("enabled".to_string(), flag);
                    }
                    Err(item) => remaining.push(item),
                }
            }
            members.insert(target.to_string(), RawValue::List(remaining));
        }
        RawValue::Map(existing) => {
            members = existing;
        }
    }

    let mut normalized = BTreeMap::new();
    for (key, value) in members {
        let child = node.find_child(&key).ok_or(ValidationError::UnknownKey {
            path: path.child(&key),
        })?;
        trace!(key = %key, "normalizing group member");
        let child_path = path.child(&key);
        normalized.insert(key, normalize(child, value, &child_path)?);
    }
    Ok(RawValue::Map(normalized))
}

/// Pulls the flag out of an inline `{enabled: ...}` shorthand entry.
///
/// Returns the original item when it is not such an entry.
fn extract_enabled(item: RawValue) -> std::result::Result<RawValue, RawValue> {
    match &item {
        RawValue::Map(entries) if entries.len() == 1 && entries.contains_key("enabled") => {
            Ok(entries.values().next().cloned().unwrap_or_else(RawValue::null))
        }
        _ => Err(item),
    }
}
