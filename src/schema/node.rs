// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative schema nodes.
//!
//! A `SchemaNode` describes one configuration key: its kind (scalar, list,
//! map of named entries, or group of fixed children), its default, its
//! validation rules, and how values for it merge across layers. Schemas are
//! built once with the fluent constructors here, validated when the processor
//! is built, and never mutated afterwards.

use crate::domain::errors::SchemaError;
use crate::domain::raw_value::{RawValue, Scalar, ScalarType};
use once_cell::sync::Lazy;
use regex::Regex;

/// Keys must look like plain identifiers; dots are reserved for paths.
static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_-]*$").expect("key pattern compiles"));

/// The shape a schema node declares for its values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A scalar leaf.
    Scalar,
    /// A list of values, atomic under merge unless configured otherwise.
    List,
    /// A mapping of user-named entries, optionally with an entry prototype.
    Map,
    /// A group of schema-named children.
    Group,
}

/// How values for one node combine across layers.
///
/// Groups always merge child-by-child; this policy governs scalars, lists,
/// and maps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// The later layer's value fully replaces the earlier one.
    Replace,
    /// Map entries from the later layer are appended; duplicate entry names
    /// collapse with the later value winning wholesale.
    AppendUnique,
    /// Map entries merge per key, recursively; keys absent in the later
    /// layer are preserved.
    MergeMap,
}

/// The default injected for a node no layer supplied.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    /// No declared default. The key still materializes: null for scalars, an
    /// empty collection for lists and maps, and recursively-defaulted
    /// children for groups.
    None,
    /// A fixed value.
    Value(RawValue),
    /// A value chosen by an explicitly declared capability.
    Capability {
        /// The capability name looked up in the processor's capability set.
        name: String,
        /// Default when the capability is available.
        when_available: RawValue,
        /// Default when it is not.
        when_unavailable: RawValue,
    },
    /// The name of the sole entry of a sibling map, or null when the map has
    /// zero or several entries. This is how selector fields default to the
    /// only entry of their collection.
    SoleEntryKey {
        /// The sibling map's key.
        collection: String,
    },
}

/// A declarative description of one configuration key.
///
/// # Examples
///
/// ```
/// use cfgtree::schema::{SchemaNode, DefaultValue};
/// use cfgtree::domain::raw_value::RawValue;
///
/// let session = SchemaNode::group("session")
///     .gated(false)
///     .child(
///         SchemaNode::string("name")
///             .default_value(RawValue::from("SESSIONID"))
///             .pattern(r"^[^.\[\]=+]*$"),
///     );
/// assert_eq!(session.key(), "session");
/// ```
#[derive(Clone, Debug)]
pub struct SchemaNode {
    key: String,
    kind: NodeKind,
    default: DefaultValue,
    allowed: Option<Vec<Scalar>>,
    pattern_src: Option<String>,
    pattern: Option<Regex>,
    merge: MergePolicy,
    children: Vec<SchemaNode>,
    default_entry: Option<String>,
    shorthand_target: Option<String>,
    enabled_gate: bool,
    collect_entries: bool,
    scalar_type: Option<ScalarType>,
}

impl SchemaNode {
    fn new(key: impl Into<String>, kind: NodeKind, merge: MergePolicy) -> Self {
        SchemaNode {
            key: key.into(),
            kind,
            default: DefaultValue::None,
            allowed: None,
            pattern_src: None,
            pattern: None,
            merge,
            children: Vec::new(),
            default_entry: None,
            shorthand_target: None,
            enabled_gate: false,
            collect_entries: false,
            scalar_type: None,
        }
    }

    /// An untyped scalar node.
    pub fn scalar(key: impl Into<String>) -> Self {
        Self::new(key, NodeKind::Scalar, MergePolicy::Replace)
    }

    /// A string scalar node.
    pub fn string(key: impl Into<String>) -> Self {
        Self::scalar(key).typed(ScalarType::Str)
    }

    /// A boolean scalar node.
    pub fn boolean(key: impl Into<String>) -> Self {
        Self::scalar(key).typed(ScalarType::Bool)
    }

    /// An integer scalar node.
    pub fn integer(key: impl Into<String>) -> Self {
        Self::scalar(key).typed(ScalarType::Int)
    }

    /// A list node. Lists are atomic under merge: a later layer replaces the
    /// whole list.
    pub fn list(key: impl Into<String>) -> Self {
        Self::new(key, NodeKind::List, MergePolicy::Replace)
    }

    /// A map of user-named entries.
    pub fn map(key: impl Into<String>) -> Self {
        Self::new(key, NodeKind::Map, MergePolicy::MergeMap)
    }

    /// A group with a fixed set of schema-named children.
    pub fn group(key: impl Into<String>) -> Self {
        Self::new(key, NodeKind::Group, MergePolicy::MergeMap)
    }

    /// Sets the scalar type this node coerces values to.
    pub fn typed(mut self, scalar_type: ScalarType) -> Self {
        self.scalar_type = Some(scalar_type);
        self
    }

    /// Sets a fixed default value.
    pub fn default_value(mut self, value: RawValue) -> Self {
        self.default = DefaultValue::Value(value);
        self
    }

    /// Sets a capability-gated default.
    pub fn default_by_capability(
        mut self,
        name: impl Into<String>,
        when_available: RawValue,
        when_unavailable: RawValue,
    ) -> Self {
        self.default = DefaultValue::Capability {
            name: name.into(),
            when_available,
            when_unavailable,
        };
        self
    }

    /// Defaults this node to the name of the sole entry of a sibling map.
    pub fn default_to_sole_entry(mut self, collection: impl Into<String>) -> Self {
        self.default = DefaultValue::SoleEntryKey {
            collection: collection.into(),
        };
        self
    }

    /// Restricts the node to an explicit set of allowed scalar values.
    pub fn allowed_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Scalar>,
    {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    /// Requires string values to match `pattern`. The pattern is compiled
    /// when the schema is validated; a bad pattern is a `SchemaError`.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_src = Some(pattern.into());
        self
    }

    /// Overrides the node's merge policy.
    pub fn merge_with(mut self, policy: MergePolicy) -> Self {
        self.merge = policy;
        self
    }

    /// Adds one child node.
    pub fn child(mut self, node: SchemaNode) -> Self {
        self.children.push(node);
        self
    }

    /// Adds several child nodes.
    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        self.children.extend(nodes);
        self
    }

    /// Sets the entry name unnamed shorthand values land under (maps only).
    pub fn default_entry(mut self, name: impl Into<String>) -> Self {
        self.default_entry = Some(name.into());
        self
    }

    /// Routes scalar/list shorthand given for this group to the named child.
    pub fn shorthand_to(mut self, target: impl Into<String>) -> Self {
        self.shorthand_target = Some(target.into());
        self
    }

    /// Marks this group as gated by an `enabled` boolean child, adding that
    /// child with the given default when it is not already declared. When the
    /// merged `enabled` value is false, sibling defaults are not injected.
    pub fn gated(mut self, enabled_by_default: bool) -> Self {
        self.enabled_gate = true;
        if !self.children.iter().any(|c| c.key == "enabled") {
            self.children.insert(
                0,
                SchemaNode::boolean("enabled").default_value(RawValue::from(enabled_by_default)),
            );
        }
        self
    }

    /// Marks this map as a resource-list: shorthand entry values are wrapped
    /// in one-element lists, an entry name repeated within one layer collects
    /// its values into a list, and cross-layer merging is append-unique.
    pub fn collect(mut self) -> Self {
        self.collect_entries = true;
        self.merge = MergePolicy::AppendUnique;
        self
    }

    /// Sets the per-entry prototype for a map node.
    pub fn entry(mut self, prototype: SchemaNode) -> Self {
        self.children = vec![prototype];
        self
    }

    /// The node's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's merge policy.
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge
    }

    /// The node's default.
    pub fn default(&self) -> &DefaultValue {
        &self.default
    }

    /// The node's children (for maps, the entry prototype if any).
    pub fn node_children(&self) -> &[SchemaNode] {
        &self.children
    }

    /// Looks up a direct child by key.
    pub fn find_child(&self, key: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.key == key)
    }

    /// The entry prototype of a map node, if declared.
    pub fn entry_prototype(&self) -> Option<&SchemaNode> {
        match self.kind {
            NodeKind::Map => self.children.first(),
            _ => None,
        }
    }

    /// The entry name unnamed shorthand values land under.
    pub fn default_entry_name(&self) -> Option<&str> {
        self.default_entry.as_deref()
    }

    /// The child that receives group shorthand, if any.
    pub fn shorthand_target(&self) -> Option<&str> {
        self.shorthand_target.as_deref()
    }

    /// Whether this group is gated by an `enabled` child.
    pub fn is_gated(&self) -> bool {
        self.enabled_gate
    }

    /// Whether this map collects repeated entry names into lists.
    pub fn collects_entries(&self) -> bool {
        self.collect_entries
    }

    /// The scalar type values coerce to, if declared.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.scalar_type
    }

    /// The allowed scalar values, if restricted.
    pub fn allowed(&self) -> Option<&[Scalar]> {
        self.allowed.as_deref()
    }

    /// The compiled validation pattern, if declared.
    ///
    /// Only present after the schema has been validated.
    pub fn compiled_pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Validates this node and its subtree, compiling patterns.
    ///
    /// Called by the processor builder; a failure here is a programming
    /// error, not a configuration error.
    pub(crate) fn validate(&mut self) -> std::result::Result<(), SchemaError> {
        if !KEY_PATTERN.is_match(&self.key) {
            return Err(SchemaError::InvalidKey {
                key: self.key.clone(),
            });
        }

        match self.kind {
            NodeKind::Scalar | NodeKind::List => {
                if !self.children.is_empty() {
                    return Err(SchemaError::ChildrenNotAllowed {
                        key: self.key.clone(),
                    });
                }
            }
            NodeKind::Map => {
                if self.children.len() > 1 {
                    return Err(SchemaError::DuplicateChild {
                        parent: self.key.clone(),
                        key: self.children[1].key.clone(),
                    });
                }
            }
            NodeKind::Group => {
                for (i, child) in self.children.iter().enumerate() {
                    if self.children[..i].iter().any(|c| c.key == child.key) {
                        return Err(SchemaError::DuplicateChild {
                            parent: self.key.clone(),
                            key: child.key.clone(),
                        });
                    }
                }
            }
        }

        if self.default_entry.is_some() && self.kind != NodeKind::Map {
            return Err(SchemaError::DefaultEntryNotAllowed {
                key: self.key.clone(),
            });
        }

        if let Some(target) = &self.shorthand_target {
            if self.kind != NodeKind::Group || self.find_child(target).is_none() {
                return Err(SchemaError::UnknownShorthandTarget {
                    key: self.key.clone(),
                    target: target.clone(),
                });
            }
        }

        if self.enabled_gate
            && (self.kind != NodeKind::Group || self.find_child("enabled").is_none())
        {
            return Err(SchemaError::MissingEnabledChild {
                key: self.key.clone(),
            });
        }

        // Sole-entry defaults must point at a sibling map.
        if self.kind == NodeKind::Group {
            for child in &self.children {
                if let DefaultValue::SoleEntryKey { collection } = &child.default {
                    let target = self.find_child(collection);
                    if !matches!(target.map(SchemaNode::kind), Some(NodeKind::Map)) {
                        return Err(SchemaError::UnknownCollection {
                            key: child.key.clone(),
                            collection: collection.clone(),
                        });
                    }
                }
            }
        }

        if let Some(src) = &self.pattern_src {
            match Regex::new(src) {
                Ok(re) => self.pattern = Some(re),
                Err(source) => {
                    return Err(SchemaError::InvalidPattern {
                        key: self.key.clone(),
                        source,
                    })
                }
            }
        }

        for child in &mut self.children {
            child.validate()?;
        }
        Ok(())
    }
}
