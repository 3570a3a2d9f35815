// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the processing engine.
//!
//! This module contains the shorthand normalizer, the layer merger, the
//! validation pass, and the `Processor` that orchestrates them.

pub mod processor;

pub(crate) mod merge;
pub(crate) mod normalize;
pub(crate) mod validate;

// Re-export commonly used types
pub use processor::{Processor, ProcessorBuilder};
