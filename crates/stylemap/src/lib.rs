//! Grouping, selection and theme export for design-system styles.
//!
//! `stylemap` takes the variables and styles of a design document (color,
//! number, string and boolean variables, plus paint, text and effect styles),
//! groups them by their slash-delimited names, and exports a selection of
//! groups as a theme config or as a plan of canvas swatches.
//!
//! # Quick Start
//!
//! ```rust
//! use stylemap::{DocumentSnapshot, Session};
//!
//! let doc = DocumentSnapshot::from_json(r#"{
//!     "collections": [{
//!         "id": "C:1", "name": "Tokens",
//!         "modes": [{ "modeId": "1:0", "name": "Light" }],
//!         "variableIds": ["V:1", "V:2"]
//!     }],
//!     "variables": [
//!         { "id": "V:1", "name": "brand/primary/500", "resolvedType": "COLOR",
//!           "valuesByMode": { "1:0": { "r": 0.2, "g": 0.4, "b": 0.6, "a": 1 } } },
//!         { "id": "V:2", "name": "brand/primary/900", "resolvedType": "COLOR",
//!           "valuesByMode": { "1:0": { "type": "VARIABLE_ALIAS", "id": "V:1" } } }
//!     ]
//! }"#).unwrap();
//!
//! let mut session = Session::new(doc);
//! let scan = session.scan();
//! let brand = &scan.groups[0].children[0].children[0];
//! assert_eq!(brand.id, "variable-color__tokens__brand");
//! assert_eq!(brand.leaf_count, 2);
//!
//! let output = session.build_theme_export(&[brand.id.as_str()]).unwrap();
//! assert_eq!(output.export.colors["primary-500"], "#336699");
//! assert_eq!(output.export.colors["primary-900"], "{colors.primary-500}");
//! ```
//!
//! # Pipeline
//!
//! ```text
//! DocumentHost ──► record::normalize ──► GroupTree::build ──► UI selection
//!                                                                 │
//!              ThemeOutput ◄── ThemeExport::build ◄── selection::resolve
//!              SwatchPlan  ◄── SwatchPlan::build  ◄──┘
//! ```
//!
//! - [`host`]: the [`DocumentHost`] trait and the JSON [`DocumentSnapshot`]
//! - [`record`]: normalized [`StyleRecord`]s in scan order
//! - [`tree`]: the [`GroupTree`] and group identifiers
//! - [`selection`]: group identifiers back to records
//! - [`color`], [`reduce`]: hex and OKLCH rendering, alias following
//! - [`theme`]: the theme object, config source and JSON
//! - [`swatch`]: card layout for the canvas
//! - [`session`], [`progress`]: per-scan state, progress and cancellation
//!
//! Nothing in the pipeline fails on bad data. Substituted defaults are
//! recorded as [`Fallback`]s and logged through `tracing`; only reading files
//! and rendering output return [`StylemapError`].

pub mod color;
pub mod config;
pub mod error;
pub mod host;
pub mod progress;
pub mod raw;
pub mod record;
pub mod reduce;
pub mod selection;
pub mod session;
pub mod swatch;
pub mod theme;
pub mod tree;

pub use color::{HexCase, Rgba};
pub use config::{ConfigError, ExportConfig};
pub use error::{Diagnostics, Fallback, Result, StylemapError};
pub use host::{DocumentHost, DocumentSnapshot};
pub use progress::{CancelToken, ScanProgress, ScanTicks};
pub use record::{RecordKind, StyleRecord};
pub use session::{ScanResult, Session};
pub use swatch::{AddProgress, SwatchPlan};
pub use theme::{ExportFormat, ThemeExport, ThemeOutput};
pub use tree::{Bucket, GroupNode, GroupTree};
