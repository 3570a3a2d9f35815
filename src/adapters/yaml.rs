// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML layer adapter.
//!
//! This module converts parsed YAML documents into `RawValue` layers. The
//! processor itself has no file format; this adapter is the bridge for the
//! common case of layers coming from YAML files.

use crate::domain::path::ConfigPath;
use crate::domain::raw_value::{RawValue, Scalar};
use std::collections::BTreeMap;
use thiserror::Error;

/// An error converting a YAML document into a layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YamlLayerError {
    /// The document is not valid YAML.
    #[error("failed to parse YAML document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The document uses a YAML construct layers cannot represent.
    #[error("unsupported YAML node at '{path}': {reason}")]
    Unsupported {
        /// Path of the offending node.
        path: ConfigPath,
        /// What made the node unrepresentable.
        reason: String,
    },
}

/// Parser turning YAML text into `RawValue` layers.
///
/// # Examples
///
/// ```rust
/// use cfgtree::adapters::yaml::YamlLayerParser;
///
/// let parser = YamlLayerParser::new();
/// let layer = parser.parse("lock: flock\nsession:\n  name: SESSIONID\n").unwrap();
/// assert!(layer.get("lock").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlLayerParser;

impl YamlLayerParser {
    /// Creates a new YAML layer parser.
    pub fn new() -> Self {
        YamlLayerParser
    }

    /// Parses a YAML document into one layer.
    ///
    /// An empty document parses as an empty map, so empty config files are
    /// valid no-op layers.
    pub fn parse(&self, content: &str) -> Result<RawValue, YamlLayerError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if matches!(value, serde_yaml::Value::Null) {
            return Ok(RawValue::empty_map());
        }
        Self::convert(&value, &ConfigPath::root())
    }

    fn convert(value: &serde_yaml::Value, path: &ConfigPath) -> Result<RawValue, YamlLayerError> {
        match value {
            serde_yaml::Value::Null => Ok(RawValue::null()),
            serde_yaml::Value::Bool(b) => Ok(RawValue::from(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(RawValue::from(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(RawValue::from(x))
                } else {
                    Err(YamlLayerError::Unsupported {
                        path: path.clone(),
                        reason: format!("number {} does not fit a layer scalar", n),
                    })
                }
            }
            serde_yaml::Value::String(s) => Ok(RawValue::Scalar(Scalar::Str(s.clone()))),
            serde_yaml::Value::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for (i, item) in seq.iter().enumerate() {
                    items.push(Self::convert(item, &path.child(&i.to_string()))?);
                }
                Ok(RawValue::List(items))
            }
            serde_yaml::Value::Mapping(map) => {
                let mut entries = BTreeMap::new();
                for (key, val) in map {
                    let key = key
                        .as_str()
                        .ok_or_else(|| YamlLayerError::Unsupported {
                            path: path.clone(),
                            reason: "mapping keys must be strings".to_string(),
                        })?
                        .to_string();
                    let child_path = path.child(&key);
                    entries.insert(key, Self::convert(val, &child_path)?);
                }
                Ok(RawValue::Map(entries))
            }
            serde_yaml::Value::Tagged(tagged) => Err(YamlLayerError::Unsupported {
                path: path.clone(),
                reason: format!("tagged value !{}", tagged.tag),
            }),
        }
    }
}
