//! The host-document collaborator.
//!
//! [`DocumentHost`] is the seam between the pipeline and the design tool.
//! A plugin runtime implements it over the live document; [`DocumentSnapshot`]
//! implements it over a JSON dump, which is what the CLI and the tests use.
//!
//! # Missing capabilities
//!
//! Some hosts have no variables API at all. Those return `None` from the
//! variable listings, which the pipeline treats as zero variables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Diagnostics, Fallback, Result, StylemapError};
use crate::raw::{RawCollection, RawEffectStyle, RawPaintStyle, RawTextStyle, RawVariable};

/// Read access to the styles and variables of a design document.
pub trait DocumentHost {
    /// Local variables, or `None` when the host has no variables API.
    fn list_variables(&self) -> Option<Vec<RawVariable>>;

    /// Local variable collections, or `None` when the host has no variables API.
    fn list_variable_collections(&self) -> Option<Vec<RawCollection>>;

    fn list_paint_styles(&self) -> Vec<RawPaintStyle>;

    fn list_text_styles(&self) -> Vec<RawTextStyle>;

    fn list_effect_styles(&self) -> Vec<RawEffectStyle>;

    /// Looks up an alias target by variable id.
    ///
    /// Hosts that can reach variables outside the local listing (library
    /// variables) should override this; the default searches
    /// [`list_variables`](DocumentHost::list_variables).
    fn resolve_alias_target(&self, variable_id: &str) -> Option<RawVariable> {
        self.list_variables()?
            .into_iter()
            .find(|v| v.id == variable_id)
    }
}

/// Everything read from a host for one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostInventory {
    pub variables: Vec<RawVariable>,
    pub collections: Vec<RawCollection>,
    pub paint_styles: Vec<RawPaintStyle>,
    pub text_styles: Vec<RawTextStyle>,
    pub effect_styles: Vec<RawEffectStyle>,
}

impl HostInventory {
    /// Reads every listing from `host`, substituting empty lists for
    /// missing capabilities.
    pub fn collect<H: DocumentHost + ?Sized>(host: &H, diags: &mut Diagnostics) -> Self {
        let variables = host.list_variables().unwrap_or_else(|| {
            diags.push(Fallback::MissingCapability {
                capability: "variables",
            });
            Vec::new()
        });
        let collections = host.list_variable_collections().unwrap_or_else(|| {
            diags.push(Fallback::MissingCapability {
                capability: "variable collections",
            });
            Vec::new()
        });

        let inventory = Self {
            variables,
            collections,
            paint_styles: host.list_paint_styles(),
            text_styles: host.list_text_styles(),
            effect_styles: host.list_effect_styles(),
        };
        tracing::debug!(
            variables = inventory.variables.len(),
            collections = inventory.collections.len(),
            paint_styles = inventory.paint_styles.len(),
            text_styles = inventory.text_styles.len(),
            effect_styles = inventory.effect_styles.len(),
            "collected host inventory"
        );
        inventory
    }
}

/// A serialized design document.
///
/// Field names follow the plugin API. `variables` and `collections` are
/// optional so that a dump from a host without the variables API is
/// represented faithfully.
///
/// ```rust
/// use stylemap::host::{DocumentHost, DocumentSnapshot};
///
/// let doc = DocumentSnapshot::from_json(r#"{
///     "paintStyles": [
///         { "id": "S:1", "name": "brand/red", "paints": [
///             { "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }
///         ] }
///     ]
/// }"#).unwrap();
///
/// assert!(doc.list_variables().is_none());
/// assert_eq!(doc.list_paint_styles().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<RawVariable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<RawCollection>>,
    #[serde(default)]
    pub paint_styles: Vec<RawPaintStyle>,
    #[serde(default)]
    pub text_styles: Vec<RawTextStyle>,
    #[serde(default)]
    pub effect_styles: Vec<RawEffectStyle>,
    /// Variables reachable only as alias targets (e.g. from libraries).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_variables: Vec<RawVariable>,
}

impl DocumentSnapshot {
    /// Parses a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(StylemapError::ParseDocument)
    }

    /// Reads and parses a snapshot file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StylemapError::ReadDocument {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

impl DocumentHost for DocumentSnapshot {
    fn list_variables(&self) -> Option<Vec<RawVariable>> {
        self.variables.clone()
    }

    fn list_variable_collections(&self) -> Option<Vec<RawCollection>> {
        self.collections.clone()
    }

    fn list_paint_styles(&self) -> Vec<RawPaintStyle> {
        self.paint_styles.clone()
    }

    fn list_text_styles(&self) -> Vec<RawTextStyle> {
        self.text_styles.clone()
    }

    fn list_effect_styles(&self) -> Vec<RawEffectStyle> {
        self.effect_styles.clone()
    }

    fn resolve_alias_target(&self, variable_id: &str) -> Option<RawVariable> {
        self.variables
            .iter()
            .flatten()
            .chain(self.external_variables.iter())
            .find(|v| v.id == variable_id)
            .cloned()
    }
}
