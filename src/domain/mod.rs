// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types for the configuration
//! processor. It is independent of any external concerns and defines the
//! fundamental concepts used throughout the library.

pub mod capability;
pub mod errors;
pub mod path;
pub mod raw_value;

// Re-export commonly used types
pub use capability::CapabilitySet;
pub use errors::{Result, SchemaError, ValidationError};
pub use path::{ConfigPath, ScopePath, ScopeSegment};
pub use raw_value::{RawValue, Scalar, ScalarType};
