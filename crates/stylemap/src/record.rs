//! Normalized style records.
//!
//! The host reports four differently shaped lists (variables, paint styles,
//! text styles, effect styles). [`normalize`] folds them into one ordered
//! sequence of [`StyleRecord`]s with a closed [`RecordKind`] and a
//! kind-specific [`Payload`], so everything downstream matches exhaustively
//! instead of probing for fields.
//!
//! # Scan order
//!
//! Records come out in the order exports rely on:
//!
//! 1. variables, collection by collection, in each collection's own order
//! 2. variables owned by no known collection, in listing order
//! 3. paint styles, text styles, effect styles, each in listing order
//!
//! # Defaults
//!
//! Normalization never fails. Missing collections become `"No Collection"`
//! with no modes, missing colors become [`FALLBACK_GRAY`], missing font names
//! become empty strings; each substitution is recorded in [`Diagnostics`].

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::color::{Rgba, FALLBACK_GRAY};
use crate::error::{Diagnostics, Fallback};
use crate::host::HostInventory;
use crate::raw::{
    RawCollection, RawDimension, RawEffect, RawEffectStyle, RawPaintStyle, RawTextStyle,
    RawVariable, RawVariableValue,
};

/// Collection name used for variables that belong to no collection.
pub const NO_COLLECTION: &str = "No Collection";

/// Closed classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    ColorVariable,
    NumberVariable,
    StringVariable,
    BooleanVariable,
    PaintSolid,
    PaintGradient,
    PaintImage,
    TextStyle,
    EffectStyle,
}

impl RecordKind {
    /// Classifies a variable by its `resolvedType`.
    pub fn from_resolved_type(resolved_type: &str) -> Option<Self> {
        match resolved_type {
            "COLOR" => Some(RecordKind::ColorVariable),
            "FLOAT" => Some(RecordKind::NumberVariable),
            "STRING" => Some(RecordKind::StringVariable),
            "BOOLEAN" => Some(RecordKind::BooleanVariable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::ColorVariable => "color-variable",
            RecordKind::NumberVariable => "number-variable",
            RecordKind::StringVariable => "string-variable",
            RecordKind::BooleanVariable => "boolean-variable",
            RecordKind::PaintSolid => "paint-solid",
            RecordKind::PaintGradient => "paint-gradient",
            RecordKind::PaintImage => "paint-image",
            RecordKind::TextStyle => "text-style",
            RecordKind::EffectStyle => "effect-style",
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            RecordKind::ColorVariable
                | RecordKind::NumberVariable
                | RecordKind::StringVariable
                | RecordKind::BooleanVariable
        )
    }

    /// `true` for records that export into the `colors` map.
    pub fn is_color_bearing(&self) -> bool {
        matches!(self, RecordKind::ColorVariable | RecordKind::PaintSolid)
    }
}

/// A mode of a variable collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
}

/// The collection a variable belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionContext {
    pub id: Option<String>,
    pub name: String,
    pub modes: Vec<Mode>,
}

impl CollectionContext {
    fn from_raw(raw: &RawCollection) -> Self {
        Self {
            id: Some(raw.id.clone()),
            name: raw.name.clone(),
            modes: raw
                .modes
                .iter()
                .map(|m| Mode {
                    id: m.mode_id.clone(),
                    name: m.name.clone(),
                })
                .collect(),
        }
    }

    fn orphan() -> Self {
        Self {
            id: None,
            name: NO_COLLECTION.to_string(),
            modes: Vec::new(),
        }
    }

    /// Finds a mode by name, case-insensitively.
    pub fn mode_named(&self, name: &str) -> Option<&Mode> {
        let wanted = name.to_lowercase();
        self.modes.iter().find(|m| m.name.to_lowercase() == wanted)
    }
}

/// Value of a variable in one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VariableValue {
    Color(Rgba),
    Number(f64),
    String(String),
    Boolean(bool),
    /// Reference to another variable by id.
    Alias(String),
    /// The host sent something unusable.
    Malformed,
}

/// One stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Rgba,
}

/// The first paint of a paint style.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Paint {
    Solid {
        color: Rgba,
        opacity: f64,
    },
    Gradient {
        gradient_type: String,
        stops: Vec<GradientStop>,
        opacity: f64,
    },
    Image {
        opacity: f64,
    },
    /// A paint type this crate does not classify (video, pattern, ...).
    Other {
        paint_type: String,
    },
}

/// A dimension with a unit, e.g. a line height of 32 `PIXELS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Dimension {
    fn from_raw(raw: &RawDimension) -> Self {
        Self {
            unit: raw.unit.clone(),
            value: raw.value,
        }
    }

    /// The value when the unit is pixels.
    pub fn pixels(&self) -> Option<f64> {
        if self.unit == "PIXELS" {
            self.value
        } else {
            None
        }
    }
}

/// Typography of a text style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetrics {
    pub font_family: String,
    pub font_style: String,
    pub font_size: Option<f64>,
    pub line_height: Option<Dimension>,
    pub letter_spacing: Option<Dimension>,
    pub paragraph_spacing: Option<f64>,
    pub list_spacing: Option<f64>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
}

/// The kind of an effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    Other(String),
}

impl EffectKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "DROP_SHADOW" => EffectKind::DropShadow,
            "INNER_SHADOW" => EffectKind::InnerShadow,
            "LAYER_BLUR" => EffectKind::LayerBlur,
            "BACKGROUND_BLUR" => EffectKind::BackgroundBlur,
            other => EffectKind::Other(other.to_string()),
        }
    }

    /// The host's name for the kind, e.g. `DROP_SHADOW`.
    pub fn as_str(&self) -> &str {
        match self {
            EffectKind::DropShadow => "DROP_SHADOW",
            EffectKind::InnerShadow => "INNER_SHADOW",
            EffectKind::LayerBlur => "LAYER_BLUR",
            EffectKind::BackgroundBlur => "BACKGROUND_BLUR",
            EffectKind::Other(s) => s,
        }
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self, EffectKind::DropShadow | EffectKind::InnerShadow)
    }

    pub fn is_blur(&self) -> bool {
        matches!(self, EffectKind::LayerBlur | EffectKind::BackgroundBlur)
    }
}

/// One shadow or blur of an effect style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub color: Option<Rgba>,
    pub offset: Option<(f64, f64)>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
    pub visible: bool,
}

impl Effect {
    fn from_raw(raw: &RawEffect) -> Self {
        Self {
            kind: EffectKind::parse(&raw.kind),
            color: raw.color.map(|c| c.to_rgba()),
            offset: raw.offset.map(|o| (o.x, o.y)),
            radius: raw.radius,
            spread: raw.spread,
            visible: raw.visible.unwrap_or(true),
        }
    }
}

/// Kind-specific data of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    /// Values keyed by mode id, in host order.
    Variable(IndexMap<String, VariableValue>),
    Paint(Paint),
    Text(TextMetrics),
    Effect(Vec<Effect>),
}

/// A normalized style or variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRecord {
    pub id: String,
    pub kind: RecordKind,
    pub raw_name: String,
    /// Name segments before the leaf; empty for ungrouped names.
    pub group_path: Vec<String>,
    pub leaf_name: String,
    /// Owning collection (variables only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionContext>,
    pub payload: Payload,
}

impl StyleRecord {
    /// Builds a record, deriving `group_path` and `leaf_name` from `raw_name`.
    pub fn new(
        id: impl Into<String>,
        kind: RecordKind,
        raw_name: impl Into<String>,
        collection: Option<CollectionContext>,
        payload: Payload,
    ) -> Self {
        let raw_name = raw_name.into();
        let (group_path, leaf_name) = split_name(&raw_name);
        Self {
            id: id.into(),
            kind,
            raw_name,
            group_path,
            leaf_name,
            collection,
            payload,
        }
    }

    pub fn is_ungrouped(&self) -> bool {
        self.group_path.is_empty()
    }

    /// Values by mode, for variables.
    pub fn variable_values(&self) -> Option<&IndexMap<String, VariableValue>> {
        match &self.payload {
            Payload::Variable(values) => Some(values),
            _ => None,
        }
    }
}

/// Splits a slash-delimited name into its group path and leaf.
///
/// Segments are trimmed; empty group segments (from `a//b`) are dropped.
///
/// ```rust
/// use stylemap::record::split_name;
///
/// let (path, leaf) = split_name("brand / primary / 500");
/// assert_eq!(path, ["brand", "primary"]);
/// assert_eq!(leaf, "500");
///
/// let (path, leaf) = split_name("Body");
/// assert!(path.is_empty());
/// assert_eq!(leaf, "Body");
/// ```
pub fn split_name(raw_name: &str) -> (Vec<String>, String) {
    let mut segments: Vec<&str> = raw_name.split('/').map(str::trim).collect();
    let leaf = segments.pop().unwrap_or_default().to_string();
    let path = segments
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (path, leaf)
}

/// Normalizes a host inventory into records, in scan order.
pub fn normalize(inventory: &HostInventory, diags: &mut Diagnostics) -> Vec<StyleRecord> {
    let mut records = normalize_variables(&inventory.variables, &inventory.collections, diags);
    records.extend(
        inventory
            .paint_styles
            .iter()
            .map(|s| normalize_paint_style(s, diags)),
    );
    records.extend(
        inventory
            .text_styles
            .iter()
            .map(|s| normalize_text_style(s, diags)),
    );
    records.extend(
        inventory
            .effect_styles
            .iter()
            .map(|s| normalize_effect_style(s, diags)),
    );
    tracing::debug!(records = records.len(), "normalized records");
    records
}

fn normalize_variables(
    variables: &[RawVariable],
    collections: &[RawCollection],
    diags: &mut Diagnostics,
) -> Vec<StyleRecord> {
    let by_id: HashMap<&str, &RawVariable> = variables.iter().map(|v| (v.id.as_str(), v)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut records = Vec::with_capacity(variables.len());

    for collection in collections {
        let context = CollectionContext::from_raw(collection);
        let listed = collection
            .variable_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied());
        // Variables that point at the collection but are missing from its id list.
        let claimed = variables
            .iter()
            .filter(|v| v.variable_collection_id.as_deref() == Some(collection.id.as_str()));

        for variable in listed.chain(claimed) {
            if !seen.insert(variable.id.as_str()) {
                continue;
            }
            if let Some(record) = normalize_variable(variable, context.clone(), diags) {
                records.push(record);
            }
        }
    }

    for variable in variables {
        if !seen.insert(variable.id.as_str()) {
            continue;
        }
        if let Some(record) = normalize_variable(variable, CollectionContext::orphan(), diags) {
            records.push(record);
        }
    }

    records
}

fn normalize_variable(
    raw: &RawVariable,
    collection: CollectionContext,
    diags: &mut Diagnostics,
) -> Option<StyleRecord> {
    let Some(kind) = RecordKind::from_resolved_type(&raw.resolved_type) else {
        diags.push(Fallback::MalformedRecord {
            id: raw.id.clone(),
            field: "resolvedType",
        });
        return None;
    };

    let values = raw
        .values_by_mode
        .iter()
        .map(|(mode_id, value)| {
            (
                mode_id.clone(),
                normalize_variable_value(&raw.id, value, diags),
            )
        })
        .collect();

    Some(StyleRecord::new(
        raw.id.clone(),
        kind,
        raw.name.clone(),
        Some(collection),
        Payload::Variable(values),
    ))
}

pub(crate) fn normalize_variable_value(
    id: &str,
    value: &RawVariableValue,
    diags: &mut Diagnostics,
) -> VariableValue {
    match value {
        RawVariableValue::Alias(alias) if alias.kind == "VARIABLE_ALIAS" && !alias.id.is_empty() => {
            VariableValue::Alias(alias.id.clone())
        }
        RawVariableValue::Color(c) => VariableValue::Color(c.to_rgba()),
        RawVariableValue::Number(n) => VariableValue::Number(*n),
        RawVariableValue::String(s) => VariableValue::String(s.clone()),
        RawVariableValue::Boolean(b) => VariableValue::Boolean(*b),
        RawVariableValue::Alias(_) | RawVariableValue::Other(_) => {
            diags.push(Fallback::MalformedRecord {
                id: id.to_string(),
                field: "valuesByMode",
            });
            VariableValue::Malformed
        }
    }
}

fn normalize_paint_style(raw: &RawPaintStyle, diags: &mut Diagnostics) -> StyleRecord {
    let (kind, paint) = match raw.paints.first() {
        None => {
            diags.push(Fallback::MalformedRecord {
                id: raw.id.clone(),
                field: "paints",
            });
            (
                RecordKind::PaintSolid,
                Paint::Solid {
                    color: FALLBACK_GRAY,
                    opacity: 1.0,
                },
            )
        }
        Some(p) if p.kind == "SOLID" => {
            let color = match p.color {
                Some(c) => c.to_rgba(),
                None => {
                    diags.push(Fallback::MalformedRecord {
                        id: raw.id.clone(),
                        field: "color",
                    });
                    FALLBACK_GRAY
                }
            };
            (
                RecordKind::PaintSolid,
                Paint::Solid {
                    color,
                    opacity: p.opacity.unwrap_or(1.0),
                },
            )
        }
        Some(p) if p.kind.starts_with("GRADIENT") => (
            RecordKind::PaintGradient,
            Paint::Gradient {
                gradient_type: p.kind.clone(),
                stops: p
                    .gradient_stops
                    .iter()
                    .map(|s| GradientStop {
                        position: s.position,
                        color: s.color.to_rgba(),
                    })
                    .collect(),
                opacity: p.opacity.unwrap_or(1.0),
            },
        ),
        Some(p) if p.kind == "IMAGE" => (
            RecordKind::PaintImage,
            Paint::Image {
                opacity: p.opacity.unwrap_or(1.0),
            },
        ),
        Some(p) => {
            diags.push(Fallback::UnknownPaintType {
                id: raw.id.clone(),
                paint_type: p.kind.clone(),
            });
            (
                RecordKind::PaintImage,
                Paint::Other {
                    paint_type: p.kind.clone(),
                },
            )
        }
    };

    StyleRecord::new(raw.id.clone(), kind, raw.name.clone(), None, Payload::Paint(paint))
}

fn normalize_text_style(raw: &RawTextStyle, diags: &mut Diagnostics) -> StyleRecord {
    let (font_family, font_style) = match &raw.font_name {
        Some(font) => (font.family.clone(), font.style.clone()),
        None => {
            diags.push(Fallback::MalformedRecord {
                id: raw.id.clone(),
                field: "fontName",
            });
            (String::new(), String::new())
        }
    };

    let metrics = TextMetrics {
        font_family,
        font_style,
        font_size: raw.font_size,
        line_height: raw.line_height.as_ref().map(Dimension::from_raw),
        letter_spacing: raw.letter_spacing.as_ref().map(Dimension::from_raw),
        paragraph_spacing: raw.paragraph_spacing,
        list_spacing: raw.list_spacing,
        text_case: raw.text_case.clone(),
        text_decoration: raw.text_decoration.clone(),
    };

    StyleRecord::new(
        raw.id.clone(),
        RecordKind::TextStyle,
        raw.name.clone(),
        None,
        Payload::Text(metrics),
    )
}

fn normalize_effect_style(raw: &RawEffectStyle, diags: &mut Diagnostics) -> StyleRecord {
    let effects: Vec<Effect> = raw.effects.iter().map(Effect::from_raw).collect();
    for effect in &effects {
        if let EffectKind::Other(effect_type) = &effect.kind {
            diags.push(Fallback::UnknownEffectType {
                id: raw.id.clone(),
                effect_type: effect_type.clone(),
            });
        }
    }

    StyleRecord::new(
        raw.id.clone(),
        RecordKind::EffectStyle,
        raw.name.clone(),
        None,
        Payload::Effect(effects),
    )
}
