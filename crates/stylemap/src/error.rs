//! Error and fallback types.
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`StylemapError`]: fatal errors at the I/O edges (reading a document dump,
//!   loading configuration, rendering output). These are returned as `Err`.
//! - [`Fallback`]: recoverable conditions inside the pipeline. A bad record
//!   never blocks the rest of a scan or export; it is replaced by a documented
//!   default and reported through [`Diagnostics`].

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexSet;

use crate::config::ConfigError;

/// Fatal errors returned by document loading and output rendering.
#[derive(Debug, thiserror::Error)]
pub enum StylemapError {
    /// The document dump could not be read from disk.
    #[error("Failed to read document {}: {source}", .path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document dump is not valid JSON for the expected shape.
    #[error("Failed to parse document: {0}")]
    ParseDocument(#[source] serde_json::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result alias for fallible stylemap operations.
pub type Result<T> = std::result::Result<T, StylemapError>;

/// A recoverable condition that was replaced by a default value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// An optional host capability (the variables API) is unavailable.
    MissingCapability { capability: &'static str },
    /// A record lacks an expected field or carries an unusable value.
    MalformedRecord { id: String, field: &'static str },
    /// An alias points at a variable that cannot be found or has no value.
    UnresolvedAlias { id: String, target: String },
    /// An effect type with no known rendering.
    UnknownEffectType { id: String, effect_type: String },
    /// A paint type with no known classification.
    UnknownPaintType { id: String, paint_type: String },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::MissingCapability { capability } => {
                write!(f, "host capability '{}' unavailable", capability)
            }
            Fallback::MalformedRecord { id, field } => {
                write!(f, "record '{}' has a missing or malformed '{}'", id, field)
            }
            Fallback::UnresolvedAlias { id, target } => {
                write!(f, "variable '{}' aliases unresolved variable '{}'", id, target)
            }
            Fallback::UnknownEffectType { id, effect_type } => {
                write!(f, "effect style '{}' uses unknown effect '{}'", id, effect_type)
            }
            Fallback::UnknownPaintType { id, paint_type } => {
                write!(f, "paint style '{}' uses unknown paint '{}'", id, paint_type)
            }
        }
    }
}

/// Collected fallbacks for one scan or export.
///
/// Each pushed fallback is also logged: missing capabilities at `debug`
/// (they are expected on hosts without variables), everything else at `warn`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: IndexSet<Fallback>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fallback, skipping exact duplicates.
    pub fn push(&mut self, fallback: Fallback) {
        if self.entries.contains(&fallback) {
            return;
        }
        match &fallback {
            Fallback::MissingCapability { .. } => tracing::debug!("{}", fallback),
            _ => tracing::warn!("{}", fallback),
        }
        self.entries.insert(fallback);
    }

    /// Appends every entry of `other`.
    pub fn extend(&mut self, other: Diagnostics) {
        for entry in other.entries {
            self.push(entry);
        }
    }

    /// Entries in the order they were first recorded.
    pub fn entries(&self) -> &IndexSet<Fallback> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_display() {
        let err = Fallback::UnresolvedAlias {
            id: "VariableID:1".to_string(),
            target: "VariableID:9".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("VariableID:1"));
        assert!(msg.contains("VariableID:9"));
    }

    #[test]
    fn test_diagnostics_dedup() {
        let mut diags = Diagnostics::new();
        let fallback = Fallback::MissingCapability {
            capability: "variables",
        };
        diags.push(fallback.clone());
        diags.push(fallback);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_diagnostics_keep_first_seen_order() {
        let mut diags = Diagnostics::new();
        for i in 0..200 {
            diags.push(Fallback::UnresolvedAlias {
                id: format!("V:{}", i % 3),
                target: "V:9".to_string(),
            });
        }
        let mut other = Diagnostics::new();
        other.push(Fallback::UnknownPaintType {
            id: "P:1".to_string(),
            paint_type: "VIDEO".to_string(),
        });
        other.push(Fallback::UnresolvedAlias {
            id: "V:1".to_string(),
            target: "V:9".to_string(),
        });
        diags.extend(other);

        assert_eq!(diags.len(), 4);
        let ids: Vec<_> = diags
            .entries()
            .iter()
            .map(|f| match f {
                Fallback::UnresolvedAlias { id, .. } | Fallback::UnknownPaintType { id, .. } => id.as_str(),
                other => panic!("unexpected fallback {:?}", other),
            })
            .collect();
        assert_eq!(ids, ["V:0", "V:1", "V:2", "P:1"]);
    }

    #[test]
    fn test_read_document_error_display() {
        let err = StylemapError::ReadDocument {
            path: PathBuf::from("doc.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("doc.json"));
        assert!(msg.contains("missing"));
    }
}
