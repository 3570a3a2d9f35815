// SPDX-License-Identifier: MIT OR Apache-2.0

//! A schema-driven configuration tree processor.
//!
//! This crate normalizes hierarchical configuration assembled from multiple
//! partial documents (layers). A declarative schema describes every key's
//! kind, default, validation rules, and merge behavior; the processor expands
//! compact shorthand, folds the layers in priority order, enforces
//! cross-field invariants, and injects defaults, producing one fully
//! normalized document or a validation error pointing at the offending path.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and business logic (`RawValue`, paths,
//!   capability set, errors)
//! - **Schema**: The declarative schema tree (`SchemaNode` and friends)
//! - **Ports**: Trait definitions (`SchemaFragment`, `InvariantCheck`)
//! - **Adapters**: Built-in invariant checks and the YAML layer parser
//! - **Service**: The processing engine and its `Processor` entry point
//!
//! # Features
//!
//! - **Shorthand Expansion**: Bare scalars and lists expand into canonical
//!   nested form, including inline `enabled` flag extraction
//! - **Layer Merging**: Replace, append-unique, and merge-map policies per
//!   node; later layers override earlier ones deterministically
//! - **Cross-Field Validation**: Mutual exclusion, required selectors,
//!   referential integrity, and name patterns, scoped anywhere in the tree
//! - **Explicit Capabilities**: Availability-dependent defaults read a
//!   capability set passed in at construction, never the environment
//! - **Two Error Categories**: User configuration errors are strictly
//!   separated from schema definition bugs
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML layer parser (default)
//!
//! # Quick Start
//!
//! ```rust
//! use cfgtree::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let processor = Processor::builder()
//!     .with_node(
//!         SchemaNode::group("session")
//!             .gated(true)
//!             .child(
//!                 SchemaNode::string("name")
//!                     .default_value(RawValue::from("SESSIONID"))
//!                     .pattern(r"^[^.\[\]=+]*$"),
//!             ),
//!     )
//!     .build()?;
//!
//! let layer = RawValue::map([("session", RawValue::from(true))]);
//! let doc = processor.process(&[layer])?;
//! let session = doc.get("session").expect("session is always present");
//! assert_eq!(session.get("name"), Some(&RawValue::from("SESSIONID")));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod schema;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        CapabilitySet, ConfigPath, RawValue, Result, Scalar, ScalarType, SchemaError, ScopePath,
        ValidationError,
    };
    pub use crate::ports::{InvariantCheck, SchemaFragment};
    pub use crate::schema::{DefaultValue, MergePolicy, NodeKind, SchemaNode};
    pub use crate::service::{Processor, ProcessorBuilder};

    pub use crate::adapters::{MutualExclusion, NamePattern, RequiredSelector, ResolvedReference};
    // Re-export adapters based on feature flags
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlLayerError, YamlLayerParser};
}
