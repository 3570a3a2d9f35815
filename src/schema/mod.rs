// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema layer containing the declarative configuration schema.
//!
//! A schema is a tree of [`SchemaNode`]s rooted at an implicit top-level
//! group. Nodes are defined once at startup, validated when the processor is
//! built, and are immutable and process-wide afterwards.

pub mod node;

// Re-export commonly used types
pub use node::{DefaultValue, MergePolicy, NodeKind, SchemaNode};
