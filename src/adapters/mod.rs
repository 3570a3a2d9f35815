// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing built-in port implementations.
//!
//! This module contains the stock implementations of the ports: the built-in
//! cross-field invariant checks, and the YAML layer parser behind the `yaml`
//! feature.

pub mod invariants;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
pub use invariants::{MutualExclusion, NamePattern, RequiredSelector, ResolvedReference};
#[cfg(feature = "yaml")]
pub use yaml::{YamlLayerError, YamlLayerParser};
