// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration processor.
//!
//! This module provides the `Processor`, the top-level entry point that
//! orchestrates normalization, layer merging, cross-field validation, and
//! default injection, plus the builder that assembles its schema from nodes
//! and fragments.

use crate::domain::capability::CapabilitySet;
use crate::domain::errors::{Result, SchemaError};
use crate::domain::path::ConfigPath;
use crate::domain::raw_value::RawValue;
use crate::ports::fragment::SchemaFragment;
use crate::ports::invariant::InvariantCheck;
use crate::schema::SchemaNode;
use crate::service::{merge, normalize, validate};
use tracing::debug;

/// Processes ordered configuration layers into one normalized document.
///
/// A processor is built once from a schema (assembled from nodes and/or
/// subsystem fragments), a set of cross-field invariants, and an explicit
/// capability set. It is immutable afterwards; `process` is a pure function
/// of its inputs and the processor can be shared freely across threads.
///
/// Processing runs in four strictly ordered phases:
///
/// 1. shorthand normalization of each layer,
/// 2. folding the layers into one tree (later layers override),
/// 3. cross-field validation of the merged, pre-default tree,
/// 4. default injection.
///
/// The first validation failure aborts; no partial document is returned.
///
/// # Examples
///
/// ```rust
/// use cfgtree::prelude::*;
///
/// # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let processor = Processor::builder()
///     .with_node(
///         SchemaNode::group("lock")
///             .gated(false)
///             .shorthand_to("resources")
///             .child(SchemaNode::map("resources").default_entry("default").collect()),
///     )
///     .build()?;
///
/// let layer = RawValue::map([("lock", RawValue::from("flock"))]);
/// let doc = processor.process(&[layer])?;
/// assert_eq!(
///     doc.get("lock").and_then(|l| l.get("enabled")).and_then(RawValue::as_bool),
///     Some(true),
/// );
/// # Ok(())
/// # }
/// ```
pub struct Processor {
    /// The validated schema, rooted at an implicit top-level group.
    root: SchemaNode,
    /// Registered cross-field invariants, in registration order.
    invariants: Vec<Box<dyn InvariantCheck>>,
    /// Capabilities available to capability-gated defaults.
    capabilities: CapabilitySet,
}

impl Processor {
    /// Creates a new processor builder.
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::new()
    }

    /// The schema root this processor was built with.
    pub fn schema(&self) -> &SchemaNode {
        &self.root
    }

    /// The capability set this processor was built with.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Processes ordered layers into one normalized, fully-defaulted document.
    ///
    /// Later layers take priority over earlier ones. Returns the first
    /// validation error encountered, pointing at the offending path.
    pub fn process(&self, layers: &[RawValue]) -> Result<RawValue> {
        let root_path = ConfigPath::root();

        debug!(layers = layers.len(), "normalizing layers");
        let mut normalized = Vec::with_capacity(layers.len());
        for layer in layers {
            normalized.push(normalize::normalize(&self.root, layer.clone(), &root_path)?);
        }

        debug!("merging layers");
        let merged = merge::merge_layers(&self.root, normalized);

        debug!("validating merged tree");
        validate::validate_tree(&self.root, &merged, &root_path)?;
        validate::run_invariants(&self.invariants, &merged)?;

        debug!("injecting defaults");
        Ok(merge::inject_defaults(&self.root, merged, &self.capabilities))
    }
}

/// Builder for constructing a [`Processor`].
///
/// Fragments are resolved when `build` runs, so the capability set may be
/// supplied in any order relative to them.
///
/// # Examples
///
/// ```rust
/// use cfgtree::prelude::*;
///
/// # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let processor = Processor::builder()
///     .with_capabilities(CapabilitySet::new().with("lock.flock"))
///     .with_node(SchemaNode::group("session").gated(false))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ProcessorBuilder {
    nodes: Vec<SchemaNode>,
    fragments: Vec<Box<dyn SchemaFragment>>,
    invariants: Vec<Box<dyn InvariantCheck>>,
    capabilities: CapabilitySet,
}

impl ProcessorBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one top-level schema node.
    pub fn with_node(mut self, node: SchemaNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds a subsystem fragment contributing a subtree and its invariants.
    pub fn with_fragment(mut self, fragment: Box<dyn SchemaFragment>) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Registers one cross-field invariant.
    pub fn with_invariant(mut self, invariant: Box<dyn InvariantCheck>) -> Self {
        self.invariants.push(invariant);
        self
    }

    /// Sets the capability set available to capability-gated defaults.
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Validates the assembled schema and builds the processor.
    ///
    /// A failure here is a schema definition error — a bug in the embedding
    /// application, distinct from any user configuration error.
    pub fn build(self) -> std::result::Result<Processor, SchemaError> {
        let mut root = SchemaNode::group("root").children(self.nodes);
        let mut invariants = self.invariants;
        for fragment in &self.fragments {
            let subtree = fragment.schema(&self.capabilities);
            if subtree.key() != fragment.key() {
                return Err(SchemaError::FragmentKeyMismatch {
                    declared: fragment.key().to_string(),
                    actual: subtree.key().to_string(),
                });
            }
            root = root.child(subtree);
            invariants.extend(fragment.invariants());
        }
        root.validate()?;
        Ok(Processor {
            root,
            invariants,
            capabilities: self.capabilities,
        })
    }
}
