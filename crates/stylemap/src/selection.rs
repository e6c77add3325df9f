//! Resolving selected group identifiers back to records.
//!
//! A record is selected when any identifier on its chain (bucket, collection,
//! each enclosing group) is selected. Selecting every bucket id therefore
//! selects every record, and selecting a group selects everything beneath it.

use std::collections::HashSet;

use crate::record::StyleRecord;
use crate::tree::GroupTree;

/// Returns the records, in scan order, reachable from `selected`.
///
/// ```rust
/// use stylemap::record::{Payload, RecordKind, StyleRecord};
/// use stylemap::selection::resolve;
///
/// let records = vec![
///     StyleRecord::new("T:1", RecordKind::TextStyle, "Heading/H1", None, Payload::Text(Default::default())),
///     StyleRecord::new("T:2", RecordKind::TextStyle, "Body", None, Payload::Text(Default::default())),
/// ];
///
/// let picked = resolve(&records, &["text-style__heading".to_string()]);
/// assert_eq!(picked.len(), 1);
/// assert_eq!(picked[0].id, "T:1");
/// ```
pub fn resolve<S: AsRef<str>>(records: &[StyleRecord], selected: &[S]) -> Vec<StyleRecord> {
    let wanted: HashSet<&str> = selected.iter().map(|s| s.as_ref()).collect();
    if wanted.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| record.group_ids().iter().any(|id| wanted.contains(id.as_str())))
        .cloned()
        .collect()
}

/// Like [`resolve`], logging identifiers that name no node of `tree`.
pub fn resolve_in<S: AsRef<str>>(
    tree: &GroupTree,
    records: &[StyleRecord],
    selected: &[S],
) -> Vec<StyleRecord> {
    for id in selected {
        if !tree.contains(id.as_ref()) {
            tracing::debug!(id = id.as_ref(), "selection names an unknown group");
        }
    }
    let picked = resolve(records, selected);
    tracing::debug!(
        selected = selected.len(),
        records = picked.len(),
        "resolved selection"
    );
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::record::{CollectionContext, Mode, Paint, Payload, RecordKind, TextMetrics};

    fn text(id: &str, name: &str) -> StyleRecord {
        StyleRecord::new(id, RecordKind::TextStyle, name, None, Payload::Text(TextMetrics::default()))
    }

    fn paint(id: &str, name: &str) -> StyleRecord {
        StyleRecord::new(
            id,
            RecordKind::PaintSolid,
            name,
            None,
            Payload::Paint(Paint::Solid {
                color: Rgba::new(0.0, 0.0, 0.0, 1.0),
                opacity: 1.0,
            }),
        )
    }

    fn color_var(id: &str, name: &str, collection: &str) -> StyleRecord {
        StyleRecord::new(
            id,
            RecordKind::ColorVariable,
            name,
            Some(CollectionContext {
                id: Some("C:1".into()),
                name: collection.into(),
                modes: vec![Mode {
                    id: "1:0".into(),
                    name: "Light".into(),
                }],
            }),
            Payload::Variable(Default::default()),
        )
    }

    fn ids(records: &[StyleRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn sample() -> Vec<StyleRecord> {
        vec![
            color_var("V:1", "brand/primary/500", "Tokens"),
            color_var("V:2", "brand/accent", "Tokens"),
            color_var("V:3", "neutral/100", "Tokens"),
            paint("P:1", "brand/red"),
            text("T:1", "Heading/H1"),
            text("T:2", "Body"),
        ]
    }

    #[test]
    fn test_select_group_includes_descendants() {
        let picked = resolve(&sample(), &["variable-color__tokens__brand"]);
        assert_eq!(ids(&picked), ["V:1", "V:2"]);
    }

    #[test]
    fn test_select_nested_group() {
        let picked = resolve(&sample(), &["variable-color__tokens__brand__primary"]);
        assert_eq!(ids(&picked), ["V:1"]);
    }

    #[test]
    fn test_same_label_in_other_bucket_is_distinct() {
        let picked = resolve(&sample(), &["paint__brand"]);
        assert_eq!(ids(&picked), ["P:1"]);
    }

    #[test]
    fn test_ungrouped_only_through_ungrouped_id() {
        let picked = resolve(&sample(), &["text-style__heading"]);
        assert_eq!(ids(&picked), ["T:1"]);

        let picked = resolve(&sample(), &["text-style__ungrouped"]);
        assert_eq!(ids(&picked), ["T:2"]);
    }

    #[test]
    fn test_select_all_buckets() {
        let records = sample();
        let tree = GroupTree::build(&records);
        let picked = resolve(&records, &tree.bucket_ids());
        assert_eq!(picked, records);
    }

    #[test]
    fn test_unknown_and_empty_selection() {
        let records = sample();
        assert!(resolve::<&str>(&records, &[]).is_empty());
        assert!(resolve(&records, &["nope"]).is_empty());

        let tree = GroupTree::build(&records);
        let picked = resolve_in(&tree, &records, &["nope", "text-style"]);
        assert_eq!(ids(&picked), ["T:1", "T:2"]);
    }

    #[test]
    fn test_scan_order_kept() {
        let picked = resolve(&sample(), &["text-style", "variable-color"]);
        assert_eq!(ids(&picked), ["V:1", "V:2", "V:3", "T:1", "T:2"]);
    }
}
