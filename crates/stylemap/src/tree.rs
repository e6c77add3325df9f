//! Hierarchical grouping of records by name.
//!
//! Records are sorted into fixed top-level [`Bucket`]s by kind, then nested by
//! their slash-delimited names. Variables get one extra level for their
//! collection:
//!
//! ```text
//! Variable Color                      variable-color
//! └── Tokens                          variable-color__tokens
//!     └── brand (Light, Dark)         variable-color__tokens__brand
//!         └── primary                 variable-color__tokens__brand__primary
//! Text Style                          text-style
//! ├── Heading                         text-style__heading
//! └── Ungrouped                       text-style__ungrouped
//! ```
//!
//! The leaf segment of a name (`500` in `brand/primary/500`) never becomes a
//! node; the record is counted on the deepest group it reaches. Names without
//! a `/` land in a synthetic [`UNGROUPED`] node.
//!
//! # Identifiers
//!
//! A node's identifier is the [`normalize_label`]ed labels from the bucket
//! down to the node, joined with [`ID_SEPARATOR`]. Records compute the same
//! identifiers from their own names via [`StyleRecord::group_ids`], which is
//! what lets a selection made on the tree be resolved back to records later.
//!
//! Sibling labels merge only when they are exactly equal. Labels that differ
//! only in case or in whitespace run length (`Brand` and `brand`, `A  B` and
//! `A B`) stay separate nodes that share one identifier. [`GroupTree::find`]
//! returns the first of them, and selecting the shared identifier selects
//! the records of both.

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{Mode, RecordKind, StyleRecord};

/// Label of the synthetic group holding records whose name has no `/`.
pub const UNGROUPED: &str = "Ungrouped";

/// Joins normalized labels into a group identifier.
pub const ID_SEPARATOR: &str = "__";

/// Top-level grouping by record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Bucket {
    VariableColor,
    VariableNumber,
    VariableString,
    VariableBoolean,
    TextStyle,
    Effect,
    Paint,
    Gradient,
    Image,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Bucket; 9] = [
        Bucket::VariableColor,
        Bucket::VariableNumber,
        Bucket::VariableString,
        Bucket::VariableBoolean,
        Bucket::TextStyle,
        Bucket::Effect,
        Bucket::Paint,
        Bucket::Gradient,
        Bucket::Image,
    ];

    pub fn of(kind: RecordKind) -> Self {
        match kind {
            RecordKind::ColorVariable => Bucket::VariableColor,
            RecordKind::NumberVariable => Bucket::VariableNumber,
            RecordKind::StringVariable => Bucket::VariableString,
            RecordKind::BooleanVariable => Bucket::VariableBoolean,
            RecordKind::TextStyle => Bucket::TextStyle,
            RecordKind::EffectStyle => Bucket::Effect,
            RecordKind::PaintSolid => Bucket::Paint,
            RecordKind::PaintGradient => Bucket::Gradient,
            RecordKind::PaintImage => Bucket::Image,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::VariableColor => "Variable Color",
            Bucket::VariableNumber => "Variable Number",
            Bucket::VariableString => "Variable String",
            Bucket::VariableBoolean => "Variable Boolean",
            Bucket::TextStyle => "Text Style",
            Bucket::Effect => "Effect",
            Bucket::Paint => "Paint",
            Bucket::Gradient => "Gradient",
            Bucket::Image => "Image",
        }
    }

    /// The bucket's group identifier, e.g. `variable-color`.
    pub fn id(&self) -> String {
        normalize_label(self.label())
    }

    /// `true` when the bucket nests records under their collection.
    pub fn has_collections(&self) -> bool {
        matches!(
            self,
            Bucket::VariableColor
                | Bucket::VariableNumber
                | Bucket::VariableString
                | Bucket::VariableBoolean
        )
    }
}

/// Lower-cases a label and replaces each whitespace run with `-`.
///
/// ```rust
/// use stylemap::tree::normalize_label;
///
/// assert_eq!(normalize_label("Brand  Tokens"), "brand-tokens");
/// assert_eq!(normalize_label("Text Style"), "text-style");
/// ```
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(c.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Builds the identifier for a path of labels (bucket label first).
pub fn group_id<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(|l| normalize_label(l.as_ref()))
        .collect::<Vec<_>>()
        .join(ID_SEPARATOR)
}

impl StyleRecord {
    pub fn bucket(&self) -> Bucket {
        Bucket::of(self.kind)
    }

    /// Labels from the bucket root down to the deepest group of this record.
    pub fn label_chain(&self) -> Vec<&str> {
        let mut chain = vec![self.bucket().label()];
        if let Some(collection) = &self.collection {
            chain.push(collection.name.as_str());
        }
        if self.group_path.is_empty() {
            chain.push(UNGROUPED);
        } else {
            chain.extend(self.group_path.iter().map(String::as_str));
        }
        chain
    }

    /// Identifiers of every group containing this record, outermost first.
    pub fn group_ids(&self) -> Vec<String> {
        let chain = self.label_chain();
        (1..=chain.len()).map(|n| group_id(&chain[..n])).collect()
    }

    /// Identifier of the deepest group containing this record.
    pub fn group_id(&self) -> String {
        group_id(&self.label_chain())
    }

    /// Identifier of the first-level group (below the collection for variables).
    pub fn top_group_id(&self) -> String {
        let chain = self.label_chain();
        let depth = if self.collection.is_some() { 3 } else { 2 };
        group_id(&chain[..depth.min(chain.len())])
    }

    /// Label of the first-level group, or [`UNGROUPED`].
    pub fn top_group_label(&self) -> &str {
        self.group_path.first().map(String::as_str).unwrap_or(UNGROUPED)
    }
}

/// A node of the group tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    pub id: String,
    pub label: String,
    pub children: Vec<GroupNode>,
    /// Records terminating at or beneath this node.
    pub leaf_count: usize,
    /// Records terminating directly at this node, in scan order.
    #[serde(rename = "memberRecordIds", skip_serializing_if = "Vec::is_empty")]
    pub member_ids: Vec<String>,
    /// Modes of the owning collection (first-level variable groups only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<Mode>,
}

impl GroupNode {
    /// The label annotated with mode names when the group spans several modes.
    pub fn display_label(&self) -> String {
        if self.modes.len() > 1 {
            let names: Vec<&str> = self.modes.iter().map(|m| m.name.as_str()).collect();
            format!("{} ({})", self.label, names.join(", "))
        } else {
            self.label.clone()
        }
    }

    /// This node and every descendant, depth-first.
    pub fn walk(&self) -> Vec<&GroupNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&GroupNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }
}

/// The full grouping of one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTree {
    /// Non-empty buckets in [`Bucket::ALL`] order.
    pub groups: Vec<GroupNode>,
    /// Number of (bucket, immediate child) pairs; a coarse progress unit.
    pub total: usize,
}

impl GroupTree {
    /// Builds the tree from records in scan order.
    pub fn build(records: &[StyleRecord]) -> Self {
        let mut roots: IndexMap<Bucket, TrieNode> =
            Bucket::ALL.iter().map(|b| (*b, TrieNode::default())).collect();

        for record in records {
            let chain = record.label_chain();
            let Some(root) = roots.get_mut(&record.bucket()) else {
                continue;
            };
            let mut node = root;
            for (depth, label) in chain.iter().enumerate().skip(1) {
                node = node.children.entry((*label).to_string()).or_default();
                // depth 1 is the collection, depth 2 its first-level group
                if depth == 2 && node.modes.is_empty() {
                    if let Some(collection) = &record.collection {
                        node.modes = collection.modes.clone();
                    }
                }
            }
            node.members.push(record.id.clone());
        }

        let groups: Vec<GroupNode> = roots
            .into_iter()
            .map(|(bucket, trie)| trie.materialize(bucket.label(), None))
            .filter(|bucket| !bucket.children.is_empty())
            .collect();
        let total = groups.iter().map(|g| g.children.len()).sum();

        tracing::debug!(buckets = groups.len(), total, "built group tree");
        Self { groups, total }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Identifiers of the top-level buckets; selecting all of them selects
    /// every record.
    pub fn bucket_ids(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.id.clone()).collect()
    }

    /// Every node, depth-first.
    pub fn nodes(&self) -> Vec<&GroupNode> {
        self.groups.iter().flat_map(|g| g.walk()).collect()
    }

    pub fn find(&self, id: &str) -> Option<&GroupNode> {
        self.groups.iter().find_map(|g| g.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

/// Construction-time node, keyed by exact label.
#[derive(Debug, Default)]
struct TrieNode {
    children: IndexMap<String, TrieNode>,
    members: Vec<String>,
    modes: Vec<Mode>,
}

impl TrieNode {
    fn materialize(self, label: &str, parent_id: Option<&str>) -> GroupNode {
        let id = match parent_id {
            Some(parent) => format!("{}{}{}", parent, ID_SEPARATOR, normalize_label(label)),
            None => normalize_label(label),
        };
        let children: Vec<GroupNode> = self
            .children
            .into_iter()
            .map(|(child_label, child)| child.materialize(&child_label, Some(&id)))
            .filter(|child| !(child.children.is_empty() && child.leaf_count == 0))
            .collect();
        let leaf_count = self.members.len() + children.iter().map(|c| c.leaf_count).sum::<usize>();

        GroupNode {
            id,
            label: label.to_string(),
            children,
            leaf_count,
            member_ids: self.members,
            modes: self.modes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Diagnostics;
    use crate::host::{DocumentSnapshot, HostInventory};
    use crate::record::normalize;
    use serde_json::json;

    fn records(doc: serde_json::Value) -> Vec<StyleRecord> {
        let doc: DocumentSnapshot = serde_json::from_value(doc).unwrap();
        let mut diags = Diagnostics::new();
        let inventory = HostInventory::collect(&doc, &mut diags);
        normalize(&inventory, &mut diags)
    }

    fn sample() -> Vec<StyleRecord> {
        records(json!({
            "collections": [{
                "id": "C:1", "name": "Brand Tokens",
                "modes": [{ "modeId": "1:0", "name": "Light" }, { "modeId": "1:1", "name": "Dark" }],
                "variableIds": ["V:1", "V:2", "V:3", "V:4"]
            }],
            "variables": [
                { "id": "V:1", "name": "brand/primary/500", "resolvedType": "COLOR" },
                { "id": "V:2", "name": "brand/primary/900", "resolvedType": "COLOR" },
                { "id": "V:3", "name": "brand/accent", "resolvedType": "COLOR" },
                { "id": "V:4", "name": "spacing", "resolvedType": "FLOAT" }
            ],
            "textStyles": [
                { "id": "T:1", "name": "Heading/H1" },
                { "id": "T:2", "name": "Body" }
            ]
        }))
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Variable Color"), "variable-color");
        assert_eq!(normalize_label(" a \t b "), "-a-b-");
        assert_eq!(normalize_label("ÄBC"), "äbc");
    }

    #[test]
    fn test_group_id() {
        assert_eq!(group_id(&["Paint", "Brand Colors"]), "paint__brand-colors");
        assert_eq!(group_id::<&str>(&[]), "");
    }

    #[test]
    fn test_bucket_order_and_pruning() {
        let tree = GroupTree::build(&sample());
        let labels: Vec<_> = tree.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["Variable Color", "Variable Number", "Text Style"]);
    }

    #[test]
    fn test_leaf_counts() {
        let tree = GroupTree::build(&sample());
        let brand = tree.find("variable-color__brand-tokens__brand").unwrap();
        assert_eq!(brand.leaf_count, 3);
        assert_eq!(brand.member_ids, ["V:3"]);

        let primary = tree
            .find("variable-color__brand-tokens__brand__primary")
            .unwrap();
        assert_eq!(primary.leaf_count, 2);
        assert_eq!(primary.member_ids, ["V:1", "V:2"]);

        let color = &tree.groups[0];
        assert_eq!(color.leaf_count, 3);
    }

    #[test]
    fn test_ungrouped_node() {
        let tree = GroupTree::build(&sample());
        let spacing = tree
            .find("variable-number__brand-tokens__ungrouped")
            .unwrap();
        assert_eq!(spacing.label, UNGROUPED);
        assert_eq!(spacing.leaf_count, 1);

        let body = tree.find("text-style__ungrouped").unwrap();
        assert_eq!(body.member_ids, ["T:2"]);
    }

    #[test]
    fn test_modes_on_first_level_groups() {
        let tree = GroupTree::build(&sample());
        let collection = tree.find("variable-color__brand-tokens").unwrap();
        assert!(collection.modes.is_empty());

        let brand = tree.find("variable-color__brand-tokens__brand").unwrap();
        assert_eq!(brand.modes.len(), 2);
        assert_eq!(brand.display_label(), "brand (Light, Dark)");

        let primary = tree
            .find("variable-color__brand-tokens__brand__primary")
            .unwrap();
        assert!(primary.modes.is_empty());
        assert_eq!(primary.display_label(), "primary");
    }

    #[test]
    fn test_total_counts_bucket_children() {
        let tree = GroupTree::build(&sample());
        // color: Brand Tokens; number: Brand Tokens; text: Heading, Ungrouped
        assert_eq!(tree.total, 4);
    }

    #[test]
    fn test_record_group_ids_match_tree() {
        let records = sample();
        let tree = GroupTree::build(&records);
        for record in &records {
            for id in record.group_ids() {
                assert!(tree.contains(&id), "missing {}", id);
            }
        }
        assert_eq!(
            records[0].group_ids(),
            [
                "variable-color",
                "variable-color__brand-tokens",
                "variable-color__brand-tokens__brand",
                "variable-color__brand-tokens__brand__primary",
            ]
        );
        assert_eq!(
            records[0].top_group_id(),
            "variable-color__brand-tokens__brand"
        );
        assert_eq!(records[4].top_group_id(), "text-style__heading");
    }

    #[test]
    fn test_sibling_labels_merge() {
        let records = records(json!({
            "paintStyles": [
                { "id": "P:1", "name": "brand/red", "paints": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }] },
                { "id": "P:2", "name": "other/x", "paints": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }] },
                { "id": "P:3", "name": "brand/blue", "paints": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 1 } }] }
            ]
        }));
        let tree = GroupTree::build(&records);
        let paint = &tree.groups[0];
        assert_eq!(paint.children.len(), 2);
        assert_eq!(paint.children[0].label, "brand");
        assert_eq!(paint.children[0].leaf_count, 2);
        assert_eq!(paint.children[0].id, "paint__brand");
    }

    #[test]
    fn test_case_variants_stay_separate_but_share_id() {
        let records = records(json!({
            "paintStyles": [
                { "id": "P:1", "name": "Brand/red", "paints": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 } }] },
                { "id": "P:2", "name": "brand/blue", "paints": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 1 } }] }
            ]
        }));
        let tree = GroupTree::build(&records);
        let siblings: Vec<_> = tree.groups[0]
            .children
            .iter()
            .map(|c| (c.label.as_str(), c.id.as_str()))
            .collect();
        assert_eq!(siblings, [("Brand", "paint__brand"), ("brand", "paint__brand")]);
        assert_eq!(tree.find("paint__brand").unwrap().label, "Brand");

        let picked = crate::selection::resolve(&records, &["paint__brand"]);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let tree = GroupTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.total, 0);
    }

    #[test]
    fn test_serialized_shape() {
        let tree = GroupTree::build(&sample());
        let value = serde_json::to_value(&tree).unwrap();
        let primary = &value["groups"][0]["children"][0]["children"][0]["children"][0];
        assert_eq!(primary["leafCount"], 2);
        assert_eq!(primary["memberRecordIds"], json!(["V:1", "V:2"]));
    }
}
