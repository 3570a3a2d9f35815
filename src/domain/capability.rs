// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit capability set for availability-gated defaults.
//!
//! Schema defaults may depend on whether an optional feature of the host
//! application is present (a cache backend, a lock store, a mailer transport).
//! Rather than probing the environment, the set of available capabilities is
//! declared once and handed to the processor at construction time, making
//! defaults pure functions of their inputs.

use std::collections::BTreeSet;

/// The set of capabilities available to capability-gated defaults.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::capability::CapabilitySet;
///
/// let caps = CapabilitySet::new().with("lock.flock").with("session.redis");
/// assert!(caps.has("lock.flock"));
/// assert!(!caps.has("mailer.smtp"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    available: BTreeSet<String>,
}

impl CapabilitySet {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a set with `capability` marked available.
    pub fn with(mut self, capability: impl Into<String>) -> Self {
        self.available.insert(capability.into());
        self
    }

    /// Returns `true` if the named capability is available.
    pub fn has(&self, capability: &str) -> bool {
        self.available.contains(capability)
    }

    /// Returns the available capability names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.available.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CapabilitySet {
            available: iter.into_iter().map(Into::into).collect(),
        }
    }
}
