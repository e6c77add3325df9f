//! Export configuration.
//!
//! [`ExportConfig`] controls how a selection is serialized: output format,
//! which mode's values are used for multi-mode variables, hex letter case, the
//! names used in the generated config source, and the swatch batch size.
//!
//! Every field has a default, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! format: json
//! mode: Dark
//! hex_case: upper
//! binding: tokens
//! wrapper: createTheme
//! batch_size: 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::HexCase;
use crate::theme::ExportFormat;

/// Errors from loading or validating an [`ExportConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config{}: {}", describe_path(.path), .source)]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config value for `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Options for theme export and swatch planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Which rendering [`ThemeOutput::primary`](crate::theme::ThemeOutput::primary) returns.
    pub format: ExportFormat,
    /// Mode name used to pick variable values; the collection's first mode when unset.
    pub mode: Option<String>,
    pub hex_case: HexCase,
    /// Name of the exported constant in the config source.
    pub binding: String,
    /// Function wrapping the theme object in the config source.
    pub wrapper: String,
    /// Swatch cards per progress tick.
    pub batch_size: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Js,
            mode: None,
            hex_case: HexCase::Lower,
            binding: "theme".to_string(),
            wrapper: "extendTheme".to_string(),
            batch_size: 5,
        }
    }
}

impl ExportConfig {
    /// Parses and validates a YAML config.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    /// Reads, parses and validates a YAML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content, Some(path))?;
        tracing::debug!(path = %path.display(), "loaded export config");
        Ok(config)
    }

    fn parse(yaml: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "batch_size",
                message: "must be at least 1".to_string(),
            });
        }
        if !is_identifier(&self.binding) {
            return Err(ConfigError::Invalid {
                field: "binding",
                message: format!("'{}' is not a JavaScript identifier", self.binding),
            });
        }
        if !self.wrapper.is_empty() && !self.wrapper.split('.').all(is_identifier) {
            return Err(ConfigError::Invalid {
                field: "wrapper",
                message: format!("'{}' is not a function name", self.wrapper),
            });
        }
        Ok(())
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
