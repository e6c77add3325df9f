//! Theme serialization.
//!
//! Turns selected records into a flat [`ThemeExport`] with three ordered maps
//! (`colors`, `textStyles`, `effects`) and renders it twice: as a JavaScript
//! config module and as JSON.
//!
//! ```text
//! export const theme = extendTheme({
//!   colors: {
//!     "primary-500": "#336699",
//!     "primary-900": "{colors.primary-500}"
//!   },
//!   textStyles: { ... },
//!   effects: { ... }
//! });
//! ```
//!
//! # Names
//!
//! Keys come from [`export_name`]: the last two name segments, dash-joined and
//! lower-cased. Different records can therefore collide (`a/x/y` and `b/x/y`);
//! the first one in scan order wins.
//!
//! # Selection
//!
//! Colors are strictly selection-gated. Ungrouped text and effect styles are
//! always exported, after the selected ones.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::ExportConfig;
use crate::error::{Diagnostics, Result, StylemapError};
use crate::record::{Dimension, Effect, EffectKind, Payload, RecordKind, StyleRecord, TextMetrics};
use crate::reduce::{paint_color, ColorRef, ColorResolver};

// ─── Names and numbers ──────────────────────────────────────────────────────

/// Derives the export key for a record name.
///
/// ```rust
/// use stylemap::theme::export_name;
///
/// assert_eq!(export_name("brand/primary/500"), "primary-500");
/// assert_eq!(export_name("Heading/H1"), "heading-h1");
/// assert_eq!(export_name("Body Large"), "body-large");
/// ```
pub fn export_name(raw_name: &str) -> String {
    let tail = if raw_name.contains('/') {
        let segments: Vec<&str> = raw_name.split('/').collect();
        segments[segments.len().saturating_sub(2)..].join("-")
    } else {
        raw_name.to_string()
    };

    let mut out = String::with_capacity(tail.len());
    let mut in_space = false;
    for c in tail.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if c == '/' {
            out.push('-');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// A number rounded to two decimals.
///
/// Serializes (and displays) as an integer when the rounded value is whole,
/// so `24.0` becomes `24` and `1.234` becomes `1.23`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounded(pub f64);

impl Rounded {
    pub fn new(value: f64) -> Self {
        Rounded((value * 100.0).round() / 100.0)
    }

    fn as_integer(&self) -> Option<i64> {
        let v = self.0;
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
            Some(v as i64)
        } else {
            None
        }
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(i) => write!(f, "{}", i),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Rounded {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

// ─── Descriptors ────────────────────────────────────────────────────────────

/// Line height: a pixel number, or the host's value when in another unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineHeight {
    Pixels(Rounded),
    Raw(Dimension),
}

/// A text style as it appears under `textStyles`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyleDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Rounded>,
    pub font_family: String,
    /// The font style name (`Bold`, `Semi Bold`, ...).
    pub font_weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<LineHeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Rounded>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_spacing: Option<Rounded>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

impl TextStyleDescriptor {
    pub fn from_metrics(metrics: &TextMetrics) -> Self {
        let line_height = metrics.line_height.as_ref().map(|lh| match lh.pixels() {
            Some(px) => LineHeight::Pixels(Rounded::new(px)),
            None => LineHeight::Raw(lh.clone()),
        });
        let text_transform = match metrics.text_case.as_deref() {
            Some("UPPER") => Some("uppercase"),
            Some("LOWER") => Some("lowercase"),
            Some("TITLE") => Some("capitalize"),
            _ => None,
        };
        let text_decoration = metrics
            .text_decoration
            .as_deref()
            .filter(|d| *d != "NONE")
            .map(str::to_lowercase);

        Self {
            font_size: metrics.font_size.map(Rounded::new),
            font_family: metrics.font_family.clone(),
            font_weight: metrics.font_style.clone(),
            line_height,
            letter_spacing: metrics
                .letter_spacing
                .as_ref()
                .and_then(|ls| ls.value)
                .map(Rounded::new),
            paragraph_spacing: metrics.paragraph_spacing.map(Rounded::new),
            text_transform,
            text_decoration,
        }
    }
}

/// Renders one effect as CSS-like text.
///
/// ```rust
/// use stylemap::color::Rgba;
/// use stylemap::record::{Effect, EffectKind};
/// use stylemap::theme::render_effect;
///
/// let shadow = Effect {
///     kind: EffectKind::DropShadow,
///     color: Some(Rgba::new(0.0, 0.0, 0.0, 0.25)),
///     offset: Some((0.0, 4.0)),
///     radius: Some(8.0),
///     spread: None,
///     visible: true,
/// };
/// assert_eq!(render_effect(&shadow), "0px 4px 8px rgba(0,0,0,0.25)");
/// ```
pub fn render_effect(effect: &Effect) -> String {
    let radius = Rounded::new(effect.radius.unwrap_or(0.0));
    match &effect.kind {
        kind if kind.is_shadow() => {
            let (x, y) = effect.offset.unwrap_or((0.0, 0.0));
            let spread = effect
                .spread
                .map(Rounded::new)
                .filter(|s| s.0 != 0.0)
                .map(|s| format!("{}px ", s))
                .unwrap_or_default();
            let (r, g, b, a) = match effect.color {
                Some(c) => {
                    let (r, g, b) = c.to_bytes();
                    (r, g, b, Rounded::new(c.a))
                }
                None => (0, 0, 0, Rounded(1.0)),
            };
            format!(
                "{}px {}px {}px {}rgba({},{},{},{})",
                Rounded::new(x),
                Rounded::new(y),
                radius,
                spread,
                r,
                g,
                b,
                a
            )
        }
        kind if kind.is_blur() => format!("blur({}px)", radius),
        EffectKind::Other(other) => format!("{}(raw)", other.to_lowercase()),
        kind => format!("{}(raw)", kind.as_str().to_lowercase()),
    }
}

/// Joins every effect of a style; `None` when the style has no effects.
pub fn render_effects(effects: &[Effect]) -> Option<String> {
    if effects.is_empty() {
        return None;
    }
    Some(effects.iter().map(render_effect).collect::<Vec<_>>().join(", "))
}

// ─── Export ─────────────────────────────────────────────────────────────────

/// The serialized theme object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExport {
    pub colors: IndexMap<String, String>,
    pub text_styles: IndexMap<String, TextStyleDescriptor>,
    pub effects: IndexMap<String, String>,
}

impl ThemeExport {
    /// Builds the export for `selected`.
    ///
    /// `all` is the full scan, consulted for ungrouped text and effect styles.
    pub fn build(
        selected: &[StyleRecord],
        all: &[StyleRecord],
        resolver: &ColorResolver,
        config: &ExportConfig,
        diags: &mut Diagnostics,
    ) -> Self {
        let mut export = ThemeExport::default();
        let mode = config.mode.as_deref();

        for record in selected {
            match (&record.payload, record.kind) {
                (Payload::Variable(_), RecordKind::ColorVariable) => {
                    let name = export_name(&record.raw_name);
                    if export.colors.contains_key(&name) {
                        continue;
                    }
                    let value = match resolver.reference(record, mode, diags) {
                        ColorRef::Value(color) => color.to_hex(config.hex_case),
                        ColorRef::Alias { target_name, .. } => {
                            format!("{{colors.{}}}", export_name(&target_name))
                        }
                    };
                    export.colors.insert(name, value);
                }
                (Payload::Paint(paint), RecordKind::PaintSolid) => {
                    let name = export_name(&record.raw_name);
                    if let Some(color) = paint_color(paint) {
                        export
                            .colors
                            .entry(name)
                            .or_insert_with(|| color.to_hex(config.hex_case));
                    }
                }
                _ => export.add_style(record),
            }
        }

        for record in all.iter().filter(|r| r.is_ungrouped()) {
            export.add_style(record);
        }

        tracing::debug!(
            colors = export.colors.len(),
            text_styles = export.text_styles.len(),
            effects = export.effects.len(),
            "built theme export"
        );
        export
    }

    /// Adds a text or effect style unless its name is taken.
    fn add_style(&mut self, record: &StyleRecord) {
        match &record.payload {
            Payload::Text(metrics) => {
                self.text_styles
                    .entry(export_name(&record.raw_name))
                    .or_insert_with(|| TextStyleDescriptor::from_metrics(metrics));
            }
            Payload::Effect(effects) => {
                let name = export_name(&record.raw_name);
                if self.effects.contains_key(&name) {
                    return;
                }
                if let Some(rendered) = render_effects(effects) {
                    self.effects.insert(name, rendered);
                }
            }
            Payload::Variable(_) | Payload::Paint(_) => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.text_styles.is_empty() && self.effects.is_empty()
    }

    /// Pretty JSON with two-space indentation.
    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(StylemapError::Serialize)
    }

    /// The JavaScript config module.
    pub fn render_config_source(&self, binding: &str, wrapper: &str) -> Result<String> {
        let section = |value: std::result::Result<String, serde_json::Error>| {
            value
                .map(|json| indent_tail(&json, "  "))
                .map_err(StylemapError::Serialize)
        };
        let colors = section(serde_json::to_string_pretty(&self.colors))?;
        let text_styles = section(serde_json::to_string_pretty(&self.text_styles))?;
        let effects = section(serde_json::to_string_pretty(&self.effects))?;

        let body = format!(
            "{{\n  colors: {},\n  textStyles: {},\n  effects: {}\n}}",
            colors, text_styles, effects
        );
        Ok(if wrapper.is_empty() {
            format!("export const {} = {};", binding, body)
        } else {
            format!("export const {} = {}({});", binding, wrapper, body)
        })
    }
}

/// Indents every line after the first.
fn indent_tail(text: &str, indent: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Output flavour of a theme export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Js,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Js => f.write_str("js"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

/// A built export with both renderings.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeOutput {
    pub export: ThemeExport,
    pub config_source: String,
    pub json: String,
    /// The format the caller asked for.
    pub format: ExportFormat,
}

impl ThemeOutput {
    pub fn render(export: ThemeExport, config: &ExportConfig) -> Result<Self> {
        let config_source = export.render_config_source(&config.binding, &config.wrapper)?;
        let json = export.render_json()?;
        Ok(Self {
            export,
            config_source,
            json,
            format: config.format,
        })
    }

    /// The rendering for the requested format.
    pub fn primary(&self) -> &str {
        match self.format {
            ExportFormat::Js => &self.config_source,
            ExportFormat::Json => &self.json,
        }
    }
}
