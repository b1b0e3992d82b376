//! Configuration module for the trainer desk
//!
//! This module provides the configuration structures controlling breadcrumb
//! labels and CSV exports, loadable from an optional TOML file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid route pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}

/// Extra route pattern supplied through configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLabel {
    /// Regular expression over the cumulative path
    pub pattern: String,

    /// Label yielded when the pattern matches
    pub label: String,
}

/// Breadcrumb label overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreadcrumbConfig {
    /// Exact path to label entries, overriding the built-in table
    pub labels: BTreeMap<String, String>,

    /// Patterns tried after the built-in ones
    pub patterns: Vec<PatternLabel>,
}

impl BreadcrumbConfig {
    /// Add an exact label (builder pattern)
    pub fn with_label(mut self, path: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(path.into(), label.into());
        self
    }

    /// Add a pattern label (builder pattern)
    pub fn with_pattern(mut self, pattern: impl Into<String>, label: impl Into<String>) -> Self {
        self.patterns.push(PatternLabel {
            pattern: pattern.into(),
            label: label.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.patterns.is_empty()
    }
}

/// Settings for CSV exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory downloads are written to
    pub output_dir: PathBuf,

    /// chrono format used for dates in profile exports
    pub date_format: String,

    /// Token for active accounts
    pub active_label: String,

    /// Token for inactive accounts
    pub inactive_label: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            date_format: "%d/%m/%Y".to_string(),
            active_label: "Ativo".to_string(),
            inactive_label: "Inativo".to_string(),
        }
    }
}

impl ExportConfig {
    /// Set output directory (builder pattern)
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set date format (builder pattern)
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Set the status tokens (builder pattern)
    pub fn with_status_labels(
        mut self,
        active: impl Into<String>,
        inactive: impl Into<String>,
    ) -> Self {
        self.active_label = active.into();
        self.inactive_label = inactive.into();
        self
    }

    /// Token for an account status
    pub fn status_label(&self, active: bool) -> &str {
        if active {
            &self.active_label
        } else {
            &self.inactive_label
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub breadcrumbs: BreadcrumbConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load configuration if the file exists, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Set breadcrumb config (builder pattern)
    pub fn with_breadcrumbs(mut self, breadcrumbs: BreadcrumbConfig) -> Self {
        self.breadcrumbs = breadcrumbs;
        self
    }

    /// Set export config (builder pattern)
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.breadcrumbs.is_empty());
        assert_eq!(config.export.date_format, "%d/%m/%Y");
        assert_eq!(config.export.status_label(true), "Ativo");
        assert_eq!(config.export.status_label(false), "Inativo");
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
[breadcrumbs.labels]
"/personal/agenda" = "Agenda"

[[breadcrumbs.patterns]]
pattern = "^/personal/agenda/[^/]+$"
label = "Sessão"

[export]
date_format = "%Y-%m-%d"
active_label = "Sim"
"#;
        let config = AppConfig::from_toml_str(text).unwrap();

        assert_eq!(
            config.breadcrumbs.labels.get("/personal/agenda").map(String::as_str),
            Some("Agenda")
        );
        assert_eq!(config.breadcrumbs.patterns.len(), 1);
        assert_eq!(config.export.date_format, "%Y-%m-%d");
        assert_eq!(config.export.active_label, "Sim");
        assert_eq!(config.export.inactive_label, "Inativo");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("[export\n"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::default()
            .with_breadcrumbs(BreadcrumbConfig::default().with_label("/x", "X"))
            .with_export(ExportConfig::default().with_status_labels("On", "Off"));

        assert!(!config.breadcrumbs.is_empty());
        assert_eq!(config.export.status_label(false), "Off");
    }
}
