// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layer merging and default injection.
//!
//! Normalized layers fold left-to-right into one tree; later layers take
//! priority. Groups merge child-by-child, maps follow their node's merge
//! policy, scalars and atomic lists are replaced. After validation, defaults
//! are injected so every schema key materializes, except under a group whose
//! merged `enabled` flag is false.

use crate::domain::capability::CapabilitySet;
use crate::domain::raw_value::{RawValue, Scalar};
use crate::schema::{DefaultValue, MergePolicy, NodeKind, SchemaNode};
use std::collections::BTreeMap;
use tracing::trace;

/// Folds normalized layers into one merged, pre-default tree.
pub(crate) fn merge_layers(node: &SchemaNode, layers: Vec<RawValue>) -> RawValue {
    let mut merged = RawValue::null();
    for (i, layer) in layers.into_iter().enumerate() {
        trace!(layer = i, "merging layer");
        merged = merge_value(node, merged, layer);
    }
    merged
}

/// Merges one overlay value onto a base value for the given node.
///
/// A null overlay means the layer did not touch this key, so the base wins;
/// a null base means no earlier layer set it, so the overlay wins.
pub(crate) fn merge_value(node: &SchemaNode, base: RawValue, overlay: RawValue) -> RawValue {
    if overlay.is_null() {
        return base;
    }
    if base.is_null() {
        return overlay;
    }
    match node.kind() {
        NodeKind::Group => merge_group(node, base, overlay),
        NodeKind::Map => match node.merge_policy() {
            MergePolicy::Replace => overlay,
            MergePolicy::AppendUnique => merge_map_entries(node, base, overlay, false),
            MergePolicy::MergeMap => merge_map_entries(node, base, overlay, true),
        },
        // Scalars and atomic lists: later layer replaces.
        NodeKind::Scalar | NodeKind::List => overlay,
    }
}

fn merge_group(node: &SchemaNode, base: RawValue, overlay: RawValue) -> RawValue {
    let (mut base_map, overlay_map) = match (base, overlay) {
        (RawValue::Map(b), RawValue::Map(o)) => (b, o),
        // Normalization guarantees maps here; anything else falls back to
        // replacement.
        (_, o) => return o,
    };
    for (key, value) in overlay_map {
        let merged = match (node.find_child(&key), base_map.remove(&key)) {
            (Some(child), Some(existing)) => merge_value(child, existing, value),
            (_, existing) => {
                if value.is_null() {
                    existing.unwrap_or(value)
                } else {
                    value
                }
            }
        };
        base_map.insert(key, merged);
    }
    RawValue::Map(base_map)
}

fn merge_map_entries(node: &SchemaNode, base: RawValue, overlay: RawValue, deep: bool) -> RawValue {
    let (mut base_map, overlay_map) = match (base, overlay) {
        (RawValue::Map(b), RawValue::Map(o)) => (b, o),
        (_, o) => return o,
    };
    for (name, value) in overlay_map {
        let merged = match (deep, node.entry_prototype(), base_map.remove(&name)) {
            (true, Some(prototype), Some(existing)) => merge_value(prototype, existing, value),
            // Append-unique: the later layer's entry wins wholesale.
            (_, _, _) => value,
        };
        base_map.insert(name, merged);
    }
    RawValue::Map(base_map)
}

/// Injects defaults into the merged tree, materializing every schema key.
///
/// Children of a group whose merged `enabled` flag is false are skipped
/// entirely; the group keeps only what the user supplied plus the flag.
pub(crate) fn inject_defaults(
    node: &SchemaNode,
    merged: RawValue,
    capabilities: &CapabilitySet,
) -> RawValue {
    match node.kind() {
        NodeKind::Group => {
            let mut members = match merged {
                RawValue::Map(m) => m,
                _ => BTreeMap::new(),
            };
            if node.is_gated() {
                if !group_enabled(node, &members, capabilities) {
                    members.insert("enabled".to_string(), RawValue::from(false));
                    return RawValue::Map(members);
                }
                // Record the resolved flag so the child loop below does not
                // fall back to the gate's default.
                members.insert("enabled".to_string(), RawValue::from(true));
            }
            for child in node.node_children() {
                let value = match members.remove(child.key()) {
                    Some(v) if !v.is_null() => inject_defaults(child, v, capabilities),
                    _ => default_for(child, &members, capabilities),
                };
                members.insert(child.key().to_string(), value);
            }
            RawValue::Map(members)
        }
        NodeKind::Map => {
            let entries = match merged {
                RawValue::Map(m) => m,
                _ => return RawValue::Map(BTreeMap::new()),
            };
            match node.entry_prototype() {
                Some(prototype) => RawValue::Map(
                    entries
                        .into_iter()
                        .map(|(name, value)| {
                            (name, inject_defaults(prototype, value, capabilities))
                        })
                        .collect(),
                ),
                None => RawValue::Map(entries),
            }
        }
        NodeKind::Scalar | NodeKind::List => merged,
    }
}

fn group_enabled(
    node: &SchemaNode,
    members: &BTreeMap<String, RawValue>,
    capabilities: &CapabilitySet,
) -> bool {
    if let Some(flag) = members.get("enabled").and_then(RawValue::as_bool) {
        return flag;
    }
    // Supplying any value under a gated section enables it implicitly.
    if members.keys().any(|k| k != "enabled") {
        return true;
    }
    let default = node
        .find_child("enabled")
        .map(|child| default_for(child, members, capabilities))
        .unwrap_or_else(RawValue::null);
    default.as_bool().unwrap_or(false)
}

/// Resolves one node's default against its siblings and the capability set.
fn default_for(
    node: &SchemaNode,
    siblings: &BTreeMap<String, RawValue>,
    capabilities: &CapabilitySet,
) -> RawValue {
    match node.default() {
        DefaultValue::Value(value) => value.clone(),
        DefaultValue::Capability {
            name,
            when_available,
            when_unavailable,
        } => {
            if capabilities.has(name) {
                when_available.clone()
            } else {
                when_unavailable.clone()
            }
        }
        DefaultValue::SoleEntryKey { collection } => {
            let entries = siblings.get(collection).and_then(RawValue::as_map);
            match entries {
                Some(m) if m.len() == 1 => {
                    let name = m.keys().next().cloned().unwrap_or_default();
                    RawValue::Scalar(Scalar::Str(name))
                }
                _ => RawValue::null(),
            }
        }
        DefaultValue::None => match node.kind() {
            NodeKind::List => RawValue::List(Vec::new()),
            NodeKind::Map => RawValue::Map(BTreeMap::new()),
            NodeKind::Group => inject_defaults(node, RawValue::null(), capabilities),
            NodeKind::Scalar => RawValue::null(),
        },
    }
}
