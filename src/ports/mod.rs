// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the
//! interfaces for extending the processor. The built-in implementations live
//! in the adapters layer.

pub mod fragment;
pub mod invariant;

// Re-export commonly used types
pub use fragment::SchemaFragment;
pub use invariant::InvariantCheck;
