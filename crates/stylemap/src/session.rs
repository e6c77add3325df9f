//! Request-scoped pipeline state.
//!
//! A [`Session`] owns a [`DocumentHost`] and the result of the latest scan.
//! Each [`Session::scan`] starts a new [`ScanContext`] with a fresh
//! generation number and [`CancelToken`], cancelling the previous one. Exports
//! and swatch plans read the latest snapshot; they scan first when nothing has
//! been scanned yet.
//!
//! ```rust
//! use stylemap::host::DocumentSnapshot;
//! use stylemap::session::Session;
//!
//! let doc = DocumentSnapshot::from_json(r#"{
//!     "textStyles": [{ "id": "T:1", "name": "Heading/H1", "fontSize": 24 }]
//! }"#).unwrap();
//!
//! let mut session = Session::new(doc);
//! let scan = session.scan();
//! assert_eq!(scan.groups[0].label, "Text Style");
//!
//! let output = session.build_theme_export(&["text-style__heading"]).unwrap();
//! assert!(output.export.text_styles.contains_key("heading-h1"));
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::config::ExportConfig;
use crate::error::{Diagnostics, Fallback, Result};
use crate::host::{DocumentHost, HostInventory};
use crate::progress::{CancelToken, ScanTicks};
use crate::record::{normalize, StyleRecord, VariableValue};
use crate::reduce::{AliasTarget, ColorResolver};
use crate::selection;
use crate::swatch::SwatchPlan;
use crate::theme::{ThemeExport, ThemeOutput};
use crate::tree::{GroupNode, GroupTree};

/// What a scan returns to the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanResult {
    pub groups: Vec<GroupNode>,
    pub total: usize,
}

/// Records and grouping read by one scan.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<StyleRecord>,
    pub tree: GroupTree,
    /// Alias targets that are not local records.
    pub external_targets: Vec<AliasTarget>,
    pub diagnostics: Diagnostics,
}

impl Snapshot {
    /// Reads and normalizes everything `host` exposes.
    pub fn capture<H: DocumentHost + ?Sized>(host: &H) -> Self {
        let mut diagnostics = Diagnostics::new();
        let inventory = HostInventory::collect(host, &mut diagnostics);
        let records = normalize(&inventory, &mut diagnostics);
        let external_targets = external_alias_targets(host, &records, &mut diagnostics);
        let tree = GroupTree::build(&records);
        Self {
            records,
            tree,
            external_targets,
            diagnostics,
        }
    }

    pub fn resolver(&self) -> ColorResolver {
        ColorResolver::new(&self.records, &self.external_targets)
    }
}

/// Asks the host for alias targets that are missing from `records`.
fn external_alias_targets<H: DocumentHost + ?Sized>(
    host: &H,
    records: &[StyleRecord],
    diags: &mut Diagnostics,
) -> Vec<AliasTarget> {
    let local: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut requested: HashSet<&str> = HashSet::new();
    let mut targets = Vec::new();

    for values in records.iter().filter_map(StyleRecord::variable_values) {
        for value in values.values() {
            let VariableValue::Alias(target) = value else {
                continue;
            };
            if local.contains(target.as_str()) || !requested.insert(target.as_str()) {
                continue;
            }
            match host.resolve_alias_target(target) {
                Some(raw) => targets.push(AliasTarget::from_raw(&raw, diags)),
                None => tracing::debug!(target = %target, "alias target not found on host"),
            }
        }
    }
    targets
}

/// One scan's identity, cancellation flag and result.
#[derive(Debug, Clone)]
pub struct ScanContext {
    pub generation: u64,
    pub cancel: CancelToken,
    pub snapshot: Snapshot,
}

/// The pipeline bound to one host.
#[derive(Debug)]
pub struct Session<H> {
    host: H,
    config: ExportConfig,
    generation: u64,
    context: Option<ScanContext>,
    request_diagnostics: Diagnostics,
}

impl<H: DocumentHost> Session<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ExportConfig::default())
    }

    pub fn with_config(host: H, config: ExportConfig) -> Self {
        Self {
            host,
            config,
            generation: 0,
            context: None,
            request_diagnostics: Diagnostics::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }

    /// The current scan, if any.
    pub fn context(&self) -> Option<&ScanContext> {
        self.context.as_ref()
    }

    /// Reads the host and rebuilds the group tree.
    pub fn scan(&mut self) -> ScanResult {
        let context = self.next_context();
        let result = ScanResult {
            groups: context.snapshot.tree.groups.clone(),
            total: context.snapshot.tree.total,
        };
        self.context = Some(context);
        result
    }

    fn next_context(&mut self) -> ScanContext {
        if let Some(previous) = &self.context {
            previous.cancel.cancel();
        }
        self.generation += 1;
        let snapshot = Snapshot::capture(&self.host);
        tracing::info!(
            generation = self.generation,
            records = snapshot.records.len(),
            groups = snapshot.tree.groups.len(),
            "scan complete"
        );
        ScanContext {
            generation: self.generation,
            cancel: CancelToken::new(),
            snapshot,
        }
    }

    /// Cancels progress reporting for the current scan. The snapshot is kept.
    pub fn cancel_scan(&self) {
        if let Some(context) = &self.context {
            if !context.cancel.is_cancelled() {
                tracing::debug!(generation = context.generation, "scan cancelled");
            }
            context.cancel.cancel();
        }
    }

    /// Progress ticks for the current scan.
    pub fn progress(&self) -> ScanTicks {
        match &self.context {
            Some(context) => ScanTicks::new(context.snapshot.tree.total, context.cancel.clone()),
            None => ScanTicks::new(0, CancelToken::new()),
        }
    }

    /// Records reachable from the selected group ids, in scan order.
    pub fn resolve_selection<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<StyleRecord> {
        let snapshot = self.snapshot();
        selection::resolve_in(&snapshot.tree, &snapshot.records, ids)
    }

    /// Builds the theme export for the selected group ids.
    pub fn build_theme_export<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<ThemeOutput> {
        let selected = self.resolve_selection(ids);
        let config = self.config.clone();
        let snapshot = self.snapshot();
        let resolver = snapshot.resolver();

        let mut diags = Diagnostics::new();
        let export = ThemeExport::build(&selected, &snapshot.records, &resolver, &config, &mut diags);
        let output = ThemeOutput::render(export, &config)?;
        self.request_diagnostics = diags;
        Ok(output)
    }

    /// Plans swatch cards for the selected group ids.
    pub fn plan_swatches<S: AsRef<str>>(&mut self, ids: &[S]) -> SwatchPlan {
        let selected = self.resolve_selection(ids);
        let resolver = self.snapshot().resolver();

        let mut diags = Diagnostics::new();
        let plan = SwatchPlan::build(&selected, &resolver, &mut diags);
        self.request_diagnostics = diags;
        plan
    }

    /// Fallbacks of the current scan followed by those of the last request.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Fallback> + '_ {
        self.context
            .iter()
            .flat_map(|c| c.snapshot.diagnostics.entries())
            .chain(self.request_diagnostics.entries())
    }

    fn snapshot(&mut self) -> &Snapshot {
        let context = match self.context.take() {
            Some(context) => context,
            None => self.next_context(),
        };
        &self.context.insert(context).snapshot
    }
}
