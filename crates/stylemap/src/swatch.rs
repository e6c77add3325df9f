//! Swatch planning.
//!
//! The canvas collaborator draws one column of cards per group. This module
//! decides what goes on each card; it never touches a canvas. A host walks the
//! [`SwatchPlan`] and creates nodes, reporting progress with
//! [`SwatchPlan::batches`].
//!
//! Column layout, left to right:
//!
//! - color variables: one column per collection, top-level group and mode,
//!   titled `Tokens/brand [Light]`
//! - paint styles: one column per group id (`paint__brand`,
//!   `gradient__brand`, `image__photos`)
//! - effect styles: one column per group id (`effect__elevation`)
//!
//! Text styles become [`SpecimenColumn`]s, one per top-level group.

use indexmap::IndexMap;
use serde::Serialize;

use crate::color::{use_dark_card, HexCase, Rgba};
use crate::error::Diagnostics;
use crate::record::{Effect, EffectKind, Mode, Paint, Payload, RecordKind, StyleRecord, TextMetrics};
use crate::reduce::ColorResolver;
use crate::theme::Rounded;

/// Everything the canvas collaborator draws for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwatchPlan {
    pub columns: Vec<SwatchColumn>,
    pub text_columns: Vec<SpecimenColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwatchColumn {
    pub title: String,
    pub cards: Vec<SwatchCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwatchCard {
    pub record_id: String,
    /// The leaf name.
    pub name: String,
    /// Second line of the card: the column it belongs to.
    pub subtitle: String,
    pub body: CardBody,
}

/// What a card shows besides its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardBody {
    #[serde(rename_all = "camelCase")]
    Color {
        /// `#RRGGBB`, alpha excluded.
        hex: String,
        oklch: String,
        opacity: f64,
        dark_background: bool,
    },
    /// One `"{percent}% #RRGGBB"` line per stop.
    Gradient { stops: Vec<String> },
    Image,
    #[serde(rename_all = "camelCase")]
    Effect { effect_type: String, params: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecimenColumn {
    pub title: String,
    pub specimens: Vec<TextSpecimen>,
}

/// A text style rendered in its own font, four lines tall.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpecimen {
    pub record_id: String,
    pub lines: [String; 4],
}

/// Cards created so far out of the plan's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddProgress {
    pub current: usize,
    pub total: usize,
}

/// A group of cards followed by a progress tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBatch<'a> {
    pub cards: Vec<&'a SwatchCard>,
    pub progress: AddProgress,
}

impl SwatchPlan {
    /// Plans swatches for `selected` (in scan order).
    pub fn build(selected: &[StyleRecord], resolver: &ColorResolver, diags: &mut Diagnostics) -> Self {
        let mut plan = SwatchPlan::default();
        plan.columns.extend(variable_columns(selected, resolver, diags));
        plan.columns.extend(style_columns(selected, |r| {
            matches!(
                r.kind,
                RecordKind::PaintSolid | RecordKind::PaintGradient | RecordKind::PaintImage
            )
        }));
        plan.columns
            .extend(style_columns(selected, |r| r.kind == RecordKind::EffectStyle));
        plan.text_columns = specimen_columns(selected);

        tracing::debug!(
            columns = plan.columns.len(),
            cards = plan.card_count(),
            text_columns = plan.text_columns.len(),
            "planned swatches"
        );
        plan
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.text_columns.is_empty()
    }

    /// Cards in creation order, in groups of `size` (at least 1).
    ///
    /// ```rust
    /// use stylemap::swatch::SwatchPlan;
    ///
    /// let plan = SwatchPlan::default();
    /// assert_eq!(plan.batches(5).count(), 0);
    /// ```
    pub fn batches(&self, size: usize) -> impl Iterator<Item = CardBatch<'_>> + '_ {
        let size = size.max(1);
        let total = self.card_count();
        let cards: Vec<&SwatchCard> = self.columns.iter().flat_map(|c| c.cards.iter()).collect();
        let chunks: Vec<Vec<&SwatchCard>> = cards.chunks(size).map(<[_]>::to_vec).collect();
        let mut current = 0;
        chunks.into_iter().map(move |cards| {
            current += cards.len();
            CardBatch {
                cards,
                progress: AddProgress { current, total },
            }
        })
    }
}

// ─── Columns ────────────────────────────────────────────────────────────────

/// Key of a variable column family: collection name and top-level group.
type GroupKey = (String, String);

fn variable_columns(
    selected: &[StyleRecord],
    resolver: &ColorResolver,
    diags: &mut Diagnostics,
) -> Vec<SwatchColumn> {
    let mut groups: IndexMap<GroupKey, (Vec<Mode>, Vec<&StyleRecord>)> = IndexMap::new();
    for record in selected.iter().filter(|r| r.kind == RecordKind::ColorVariable) {
        let Some(collection) = &record.collection else {
            continue;
        };
        groups
            .entry((collection.name.clone(), record.top_group_label().to_string()))
            .or_insert_with(|| (collection.modes.clone(), Vec::new()))
            .1
            .push(record);
    }

    let mut columns = Vec::new();
    for ((collection, group), (modes, records)) in groups {
        let base = format!("{}/{}", collection, group);
        // Collections without modes still get one column, from each variable's first value.
        let modes: Vec<Option<&Mode>> = if modes.is_empty() {
            vec![None]
        } else {
            modes.iter().map(Some).collect()
        };
        let single = modes.len() <= 1;

        for mode in modes.iter().copied() {
            let mode_id = mode.map(|m| m.id.as_str());
            let mode_name = mode.map(|m| m.name.as_str());
            let title = match mode_name {
                Some(name) => format!("{} [{}]", base, name),
                None => base.clone(),
            };
            let subtitle = if single { base.clone() } else { title.clone() };
            let cards = records
                .iter()
                .map(|record| {
                    let color = resolver.resolve_mode(record, mode_id, diags);
                    SwatchCard {
                        record_id: record.id.clone(),
                        name: record.leaf_name.clone(),
                        subtitle: subtitle.clone(),
                        body: color_body(&color, color.a, mode_name),
                    }
                })
                .collect();
            columns.push(SwatchColumn { title, cards });
        }
    }
    columns
}

fn style_columns<F>(selected: &[StyleRecord], include: F) -> Vec<SwatchColumn>
where
    F: Fn(&StyleRecord) -> bool,
{
    let mut columns: IndexMap<String, Vec<SwatchCard>> = IndexMap::new();
    for record in selected.iter().filter(|r| include(r)) {
        let Some(body) = style_body(record) else {
            continue;
        };
        let title = record.top_group_id();
        columns.entry(title.clone()).or_default().push(SwatchCard {
            record_id: record.id.clone(),
            name: record.leaf_name.clone(),
            subtitle: title,
            body,
        });
    }
    columns
        .into_iter()
        .map(|(title, cards)| SwatchColumn { title, cards })
        .collect()
}

fn specimen_columns(selected: &[StyleRecord]) -> Vec<SpecimenColumn> {
    let mut columns: IndexMap<String, Vec<TextSpecimen>> = IndexMap::new();
    for record in selected {
        if let Payload::Text(metrics) = &record.payload {
            columns
                .entry(record.top_group_label().to_string())
                .or_default()
                .push(TextSpecimen {
                    record_id: record.id.clone(),
                    lines: specimen_lines(&record.raw_name, metrics),
                });
        }
    }
    columns
        .into_iter()
        .map(|(title, specimens)| SpecimenColumn { title, specimens })
        .collect()
}

// ─── Card bodies ────────────────────────────────────────────────────────────

fn color_body(color: &Rgba, opacity: f64, mode_name: Option<&str>) -> CardBody {
    CardBody::Color {
        hex: color.to_opaque_hex(HexCase::Upper),
        oklch: color.to_oklch().to_string(),
        opacity,
        dark_background: use_dark_card(color, opacity, mode_name),
    }
}

/// `None` for styles that produce no card (a gradient without stops, an
/// effect style without effects).
fn style_body(record: &StyleRecord) -> Option<CardBody> {
    match &record.payload {
        Payload::Paint(Paint::Solid { color, opacity }) => {
            Some(color_body(&color.with_alpha(*opacity), *opacity, None))
        }
        Payload::Paint(Paint::Gradient { stops, .. }) if !stops.is_empty() => {
            Some(CardBody::Gradient {
                stops: stops
                    .iter()
                    .map(|s| {
                        format!(
                            "{}% {}",
                            (s.position * 100.0).round(),
                            s.color.to_opaque_hex(HexCase::Upper)
                        )
                    })
                    .collect(),
            })
        }
        Payload::Paint(Paint::Gradient { .. }) => None,
        Payload::Paint(Paint::Image { .. } | Paint::Other { .. }) => Some(CardBody::Image),
        Payload::Effect(effects) => effects.first().map(|first| CardBody::Effect {
            effect_type: humanize_effect_type(&first.kind),
            params: effect_params(first),
        }),
        Payload::Variable(_) | Payload::Text(_) => None,
    }
}

/// `DROP_SHADOW` → `Drop Shadow`.
pub fn humanize_effect_type(kind: &EffectKind) -> String {
    kind.as_str()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parameter line of an effect card.
pub fn effect_params(effect: &Effect) -> String {
    let radius = Rounded::new(effect.radius.unwrap_or(0.0));
    if effect.kind.is_shadow() {
        let (x, y) = effect.offset.unwrap_or((0.0, 0.0));
        format!(
            "radius: {}, x: {}, y: {}, spread: {}",
            radius,
            Rounded::new(x),
            Rounded::new(y),
            Rounded::new(effect.spread.unwrap_or(0.0))
        )
    } else if effect.kind.is_blur() {
        format!("radius: {}", radius)
    } else {
        String::new()
    }
}

/// The four specimen lines: name, font, size/line height, list/paragraph spacing.
pub fn specimen_lines(name: &str, metrics: &TextMetrics) -> [String; 4] {
    let size = metrics.font_size.map(Rounded::new);
    let line_height = metrics
        .line_height
        .as_ref()
        .and_then(|lh| lh.pixels())
        .map(Rounded::new)
        .or(size);
    let show = |v: Option<Rounded>| v.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());

    [
        name.to_string(),
        format!("{}, {}", metrics.font_family, metrics.font_style),
        format!("{}/{}", show(size), show(line_height)),
        format!(
            "{}/{}",
            Rounded::new(metrics.list_spacing.unwrap_or(0.0)),
            Rounded::new(metrics.paragraph_spacing.unwrap_or(0.0))
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CollectionContext, Dimension, GradientStop, VariableValue};

    fn collection(modes: &[&str]) -> CollectionContext {
        CollectionContext {
            id: Some("C:1".into()),
            name: "Tokens".into(),
            modes: modes
                .iter()
                .enumerate()
                .map(|(i, name)| Mode {
                    id: format!("1:{}", i),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    fn color_var(id: &str, name: &str, modes: &[&str], colors: &[Rgba]) -> StyleRecord {
        let values = colors
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("1:{}", i), VariableValue::Color(*c)))
            .collect();
        StyleRecord::new(
            id,
            RecordKind::ColorVariable,
            name,
            Some(collection(modes)),
            Payload::Variable(values),
        )
    }

    fn paint(id: &str, name: &str, kind: RecordKind, paint: Paint) -> StyleRecord {
        StyleRecord::new(id, kind, name, None, Payload::Paint(paint))
    }

    fn plan(records: &[StyleRecord]) -> SwatchPlan {
        let resolver = ColorResolver::new(records, &[]);
        SwatchPlan::build(records, &resolver, &mut Diagnostics::new())
    }

    const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    const NAVY: Rgba = Rgba::new(0.0, 0.0, 0.5, 1.0);

    #[test]
    fn test_variable_columns_per_mode() {
        let records = vec![
            color_var("V:1", "brand/bg", &["Light", "Dark"], &[WHITE, NAVY]),
            color_var("V:2", "brand/fg", &["Light", "Dark"], &[NAVY, WHITE]),
        ];
        let plan = plan(&records);
        let titles: Vec<_> = plan.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["Tokens/brand [Light]", "Tokens/brand [Dark]"]);

        let dark = &plan.columns[1];
        assert_eq!(dark.cards.len(), 2);
        assert_eq!(dark.cards[0].name, "bg");
        assert_eq!(dark.cards[0].subtitle, "Tokens/brand [Dark]");
        match &dark.cards[0].body {
            CardBody::Color {
                hex,
                dark_background,
                ..
            } => {
                assert_eq!(hex, "#000080");
                assert!(*dark_background);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_case_variant_modes_keep_their_own_values() {
        let records = vec![color_var("V:1", "brand/bg", &["Light", "light"], &[WHITE, NAVY])];
        let plan = plan(&records);
        let hexes: Vec<_> = plan
            .columns
            .iter()
            .map(|c| match &c.cards[0].body {
                CardBody::Color { hex, .. } => hex.as_str(),
                other => panic!("unexpected body {:?}", other),
            })
            .collect();
        assert_eq!(hexes, ["#FFFFFF", "#000080"]);
    }

    #[test]
    fn test_single_mode_subtitle_drops_mode() {
        let records = vec![color_var("V:1", "bg", &["Light"], &[WHITE])];
        let plan = plan(&records);
        assert_eq!(plan.columns[0].title, "Tokens/Ungrouped [Light]");
        assert_eq!(plan.columns[0].cards[0].subtitle, "Tokens/Ungrouped");
    }

    #[test]
    fn test_translucent_gray_paint_gets_dark_card() {
        let records = vec![paint(
            "P:1",
            "overlay/scrim",
            RecordKind::PaintSolid,
            Paint::Solid {
                color: Rgba::new(0.5, 0.5, 0.5, 1.0),
                opacity: 0.5,
            },
        )];
        let plan = plan(&records);
        assert_eq!(plan.columns[0].title, "paint__overlay");
        match &plan.columns[0].cards[0].body {
            CardBody::Color {
                hex,
                opacity,
                dark_background,
                ..
            } => {
                assert_eq!(hex, "#808080");
                assert_eq!(*opacity, 0.5);
                assert!(*dark_background);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_translucent_dark_gray_paint_keeps_light_card() {
        let records = vec![paint(
            "P:1",
            "overlay/shade",
            RecordKind::PaintSolid,
            Paint::Solid {
                color: Rgba::new(0.1, 0.1, 0.1, 1.0),
                opacity: 0.5,
            },
        )];
        match &plan(&records).columns[0].cards[0].body {
            CardBody::Color {
                dark_background, ..
            } => assert!(!*dark_background),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_gradient_and_image_columns() {
        let records = vec![
            paint(
                "P:1",
                "brand/sunset",
                RecordKind::PaintGradient,
                Paint::Gradient {
                    gradient_type: "GRADIENT_LINEAR".into(),
                    stops: vec![
                        GradientStop {
                            position: 0.0,
                            color: Rgba::new(1.0, 0.0, 0.0, 1.0),
                        },
                        GradientStop {
                            position: 0.5,
                            color: Rgba::new(0.0, 0.0, 1.0, 1.0),
                        },
                    ],
                    opacity: 1.0,
                },
            ),
            paint(
                "P:2",
                "brand/empty",
                RecordKind::PaintGradient,
                Paint::Gradient {
                    gradient_type: "GRADIENT_RADIAL".into(),
                    stops: vec![],
                    opacity: 1.0,
                },
            ),
            paint("P:3", "photos/hero", RecordKind::PaintImage, Paint::Image { opacity: 1.0 }),
        ];
        let plan = plan(&records);
        let titles: Vec<_> = plan.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["gradient__brand", "image__photos"]);
        assert_eq!(
            plan.columns[0].cards[0].body,
            CardBody::Gradient {
                stops: vec!["0% #FF0000".into(), "50% #0000FF".into()]
            }
        );
        assert_eq!(plan.columns[1].cards[0].body, CardBody::Image);
    }

    #[test]
    fn test_effect_card() {
        let shadow = Effect {
            kind: EffectKind::DropShadow,
            color: None,
            offset: Some((0.0, 2.0)),
            radius: Some(4.0),
            spread: None,
            visible: true,
        };
        let records = vec![
            StyleRecord::new(
                "E:1",
                RecordKind::EffectStyle,
                "elevation/1",
                None,
                Payload::Effect(vec![shadow]),
            ),
            StyleRecord::new("E:2", RecordKind::EffectStyle, "elevation/0", None, Payload::Effect(vec![])),
        ];
        let plan = plan(&records);
        assert_eq!(plan.columns.len(), 1);
        assert_eq!(plan.columns[0].title, "effect__elevation");
        assert_eq!(
            plan.columns[0].cards[0].body,
            CardBody::Effect {
                effect_type: "Drop Shadow".into(),
                params: "radius: 4, x: 0, y: 2, spread: 0".into()
            }
        );
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize_effect_type(&EffectKind::BackgroundBlur), "Background Blur");
        assert_eq!(humanize_effect_type(&EffectKind::Other("GLASS".into())), "Glass");
    }

    #[test]
    fn test_specimens() {
        let metrics = TextMetrics {
            font_family: "Inter".into(),
            font_style: "Semi Bold".into(),
            font_size: Some(24.0),
            line_height: Some(Dimension {
                unit: "PIXELS".into(),
                value: Some(32.0),
            }),
            paragraph_spacing: Some(8.0),
            ..TextMetrics::default()
        };
        let records = vec![StyleRecord::new(
            "T:1",
            RecordKind::TextStyle,
            "Heading/H1",
            None,
            Payload::Text(metrics),
        )];
        let plan = plan(&records);
        assert!(plan.columns.is_empty());
        assert_eq!(plan.text_columns[0].title, "Heading");
        assert_eq!(
            plan.text_columns[0].specimens[0].lines,
            ["Heading/H1", "Inter, Semi Bold", "24/32", "0/8"].map(String::from)
        );
    }

    #[test]
    fn test_specimen_line_height_falls_back_to_size() {
        let metrics = TextMetrics {
            font_size: Some(14.0),
            line_height: Some(Dimension {
                unit: "AUTO".into(),
                value: None,
            }),
            ..TextMetrics::default()
        };
        assert_eq!(specimen_lines("Body", &metrics)[2], "14/14");
        assert_eq!(specimen_lines("Body", &TextMetrics::default())[2], "-/-");
    }

    #[test]
    fn test_batches() {
        let colors: Vec<_> = (0..7)
            .map(|i| color_var(&format!("V:{}", i), &format!("g/c{}", i), &["Light"], &[WHITE]))
            .collect();
        let plan = plan(&colors);
        let progress: Vec<_> = plan.batches(5).map(|b| (b.cards.len(), b.progress)).collect();
        assert_eq!(
            progress,
            [
                (5, AddProgress { current: 5, total: 7 }),
                (2, AddProgress { current: 7, total: 7 }),
            ]
        );
        assert_eq!(plan.batches(0).count(), 7);
    }
}
