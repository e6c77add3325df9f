//! Raw host records, as the design tool reports them.
//!
//! These types mirror the plugin API's JSON shapes (camelCase field names).
//! Nearly every field is optional or defaulted, so one odd record still
//! deserializes.
//! [`crate::record::normalize`] turns them into [`StyleRecord`](crate::record::StyleRecord)s.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// A color as the host sends it; alpha is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl RawColor {
    pub fn to_rgba(self) -> Rgba {
        Rgba::new(self.r, self.g, self.b, self.a.unwrap_or(1.0))
    }
}

/// Alias payload: `{ "type": "VARIABLE_ALIAS", "id": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAlias {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Value of a variable in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawVariableValue {
    Alias(RawAlias),
    Color(RawColor),
    Boolean(bool),
    Number(f64),
    String(String),
    /// Anything else; normalized into a malformed value.
    Other(serde_json::Value),
}

/// A local variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariable {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `COLOR`, `FLOAT`, `STRING` or `BOOLEAN`.
    #[serde(default)]
    pub resolved_type: String,
    #[serde(default)]
    pub values_by_mode: IndexMap<String, RawVariableValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_collection_id: Option<String>,
}

/// A mode inside a variable collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMode {
    #[serde(default)]
    pub mode_id: String,
    #[serde(default)]
    pub name: String,
}

/// A variable collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modes: Vec<RawMode>,
    #[serde(default)]
    pub variable_ids: Vec<String>,
}

/// One color stop of a gradient paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawGradientStop {
    #[serde(default)]
    pub position: f64,
    pub color: RawColor,
}

/// A single paint entry of a paint style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaint {
    /// `SOLID`, `GRADIENT_LINEAR`, `GRADIENT_RADIAL`, ..., `IMAGE`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RawColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_stops: Vec<RawGradientStop>,
}

/// A paint (fill) style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPaintStyle {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub paints: Vec<RawPaint>,
}

/// Font family and style, e.g. `Inter` / `Semi Bold`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFontName {
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub style: String,
}

/// A dimension with a unit: `{ "unit": "PIXELS", "value": 32 }`.
///
/// Used for line height (`PIXELS`, `PERCENT`, `AUTO`) and letter spacing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDimension {
    #[serde(default)]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// A text style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTextStyle {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub font_name: Option<RawFontName>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub line_height: Option<RawDimension>,
    #[serde(default)]
    pub letter_spacing: Option<RawDimension>,
    #[serde(default)]
    pub paragraph_spacing: Option<f64>,
    #[serde(default)]
    pub list_spacing: Option<f64>,
    #[serde(default)]
    pub text_case: Option<String>,
    #[serde(default)]
    pub text_decoration: Option<String>,
}

/// A 2D offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVector {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One effect of an effect style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEffect {
    /// `DROP_SHADOW`, `INNER_SHADOW`, `LAYER_BLUR`, `BACKGROUND_BLUR`, ...
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub color: Option<RawColor>,
    #[serde(default)]
    pub offset: Option<RawVector>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub visible: Option<bool>,
}

/// An effect style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEffectStyle {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effects: Vec<RawEffect>,
}
