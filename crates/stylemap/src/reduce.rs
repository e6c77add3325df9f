//! Reducing records to concrete colors.
//!
//! Color variables hold one value per mode, and a value may be an alias to
//! another variable. [`ColorResolver`] picks the value for a requested mode,
//! follows at most one alias hop, and falls back to [`FALLBACK_GRAY`] with a
//! diagnostic when nothing concrete is found.
//!
//! # Mode selection
//!
//! For a requested mode name the value is taken from, in order:
//!
//! 1. the collection mode with that name (case-insensitive)
//! 2. the collection's first mode
//! 3. the first value the variable carries
//!
//! An alias is followed with the same mode id when the target has it, else
//! with the target's first value.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::color::{Rgba, FALLBACK_GRAY, WHITE};
use crate::error::{Diagnostics, Fallback};
use crate::raw::RawVariable;
use crate::record::{normalize_variable_value, GradientStop, Paint, StyleRecord, VariableValue};

/// A variable that aliases may point at.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTarget {
    pub id: String,
    pub name: String,
    pub values: IndexMap<String, VariableValue>,
}

impl AliasTarget {
    /// Wraps a variable the host resolved outside the local listing.
    pub fn from_raw(raw: &RawVariable, diags: &mut Diagnostics) -> Self {
        Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            values: raw
                .values_by_mode
                .iter()
                .map(|(mode, value)| (mode.clone(), normalize_variable_value(&raw.id, value, diags)))
                .collect(),
        }
    }

    fn from_record(record: &StyleRecord) -> Option<Self> {
        record.variable_values().map(|values| Self {
            id: record.id.clone(),
            name: record.raw_name.clone(),
            values: values.clone(),
        })
    }
}

/// A color as exported: either concrete or a reference to another variable.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    Value(Rgba),
    Alias { target_id: String, target_name: String },
}

/// Looks up alias targets and resolves variable colors.
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    targets: HashMap<String, AliasTarget>,
}

impl ColorResolver {
    /// Indexes every variable record plus `external` targets.
    ///
    /// Local records win over external targets with the same id.
    pub fn new(records: &[StyleRecord], external: &[AliasTarget]) -> Self {
        let mut targets: HashMap<String, AliasTarget> = external
            .iter()
            .map(|t| (t.id.clone(), t.clone()))
            .collect();
        for target in records.iter().filter_map(AliasTarget::from_record) {
            targets.insert(target.id.clone(), target);
        }
        Self { targets }
    }

    pub fn target(&self, id: &str) -> Option<&AliasTarget> {
        self.targets.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.targets.contains_key(id)
    }

    /// The color of a variable in `mode`, following one alias hop.
    pub fn resolve(&self, record: &StyleRecord, mode: Option<&str>, diags: &mut Diagnostics) -> Rgba {
        let mode_id = select_mode_id(record, mode);
        self.resolve_mode(record, mode_id.as_deref(), diags)
    }

    /// Like [`resolve`](Self::resolve), with the mode given by id.
    ///
    /// An id the variable has no value for falls back like an unknown mode
    /// name does.
    pub fn resolve_mode(&self, record: &StyleRecord, mode_id: Option<&str>, diags: &mut Diagnostics) -> Rgba {
        let mode_id = fallback_mode_id(record, mode_id);
        match self.reference_mode(record, mode_id.as_deref(), diags) {
            ColorRef::Value(color) => color,
            ColorRef::Alias { target_id, .. } => {
                self.follow(&record.id, &target_id, mode_id.as_deref(), diags)
            }
        }
    }

    /// The color of a variable in `mode` without following aliases.
    ///
    /// Aliases to unknown targets and unusable values become
    /// [`FALLBACK_GRAY`] with a diagnostic.
    pub fn reference(&self, record: &StyleRecord, mode: Option<&str>, diags: &mut Diagnostics) -> ColorRef {
        let mode_id = select_mode_id(record, mode);
        self.reference_mode(record, mode_id.as_deref(), diags)
    }

    fn reference_mode(&self, record: &StyleRecord, mode_id: Option<&str>, diags: &mut Diagnostics) -> ColorRef {
        let value = record
            .variable_values()
            .zip(mode_id)
            .and_then(|(values, mode_id)| values.get(mode_id));

        match value {
            Some(VariableValue::Color(color)) => ColorRef::Value(*color),
            Some(VariableValue::Alias(target_id)) => match self.targets.get(target_id) {
                Some(target) => ColorRef::Alias {
                    target_id: target.id.clone(),
                    target_name: target.name.clone(),
                },
                None => {
                    diags.push(Fallback::UnresolvedAlias {
                        id: record.id.clone(),
                        target: target_id.clone(),
                    });
                    ColorRef::Value(FALLBACK_GRAY)
                }
            },
            _ => {
                diags.push(Fallback::MalformedRecord {
                    id: record.id.clone(),
                    field: "valuesByMode",
                });
                ColorRef::Value(FALLBACK_GRAY)
            }
        }
    }

    fn follow(&self, id: &str, target_id: &str, mode_id: Option<&str>, diags: &mut Diagnostics) -> Rgba {
        let value = self.targets.get(target_id).and_then(|target| {
            mode_id
                .and_then(|m| target.values.get(m))
                .or_else(|| target.values.values().next())
        });
        match value {
            Some(VariableValue::Color(color)) => *color,
            _ => {
                diags.push(Fallback::UnresolvedAlias {
                    id: id.to_string(),
                    target: target_id.to_string(),
                });
                FALLBACK_GRAY
            }
        }
    }
}

/// Picks the mode id whose value represents `record` for `mode`.
pub fn select_mode_id(record: &StyleRecord, mode: Option<&str>) -> Option<String> {
    let named = mode
        .zip(record.collection.as_ref())
        .and_then(|(name, c)| c.mode_named(name))
        .map(|m| m.id.as_str());
    fallback_mode_id(record, named)
}

/// `preferred` when the variable has a value for it, else the collection's
/// first mode, else the first mode the variable carries.
pub fn fallback_mode_id(record: &StyleRecord, preferred: Option<&str>) -> Option<String> {
    let values = record.variable_values()?;
    let first_mode = record
        .collection
        .as_ref()
        .and_then(|c| c.modes.first())
        .map(|m| m.id.as_str());

    preferred
        .filter(|id| values.contains_key(*id))
        .or(first_mode.filter(|id| values.contains_key(*id)))
        .or_else(|| values.keys().next().map(String::as_str))
        .map(str::to_string)
}

/// The color a paint style contributes, with the paint opacity as alpha.
///
/// Gradients report their first stop and images report nothing.
pub fn paint_color(paint: &Paint) -> Option<Rgba> {
    match paint {
        Paint::Solid { color, opacity } => Some(color.with_alpha(*opacity)),
        Paint::Gradient { stops, .. } => Some(gradient_display_color(stops)),
        Paint::Image { .. } | Paint::Other { .. } => None,
    }
}

/// First stop of a gradient, or white when it has none.
pub fn gradient_display_color(stops: &[GradientStop]) -> Rgba {
    stops.first().map(|s| s.color).unwrap_or(WHITE)
}
