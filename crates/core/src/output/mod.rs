//! Output formatting module
//!
//! This module provides formatters for JSON, YAML, ANSI and plain-text
//! output of breadcrumb trails, route label tables and export receipts.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::{format_receipt_ansi, format_rules_ansi, format_trail_ansi};
pub use json::format_json;
pub use yaml::format_yaml;

use crate::breadcrumbs::LabelRule;
use crate::export::DownloadReceipt;
use crate::models::BreadcrumbTrail;
use serde::Serialize;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Plain text summary
    Summary,
}

/// Serializable view of a label rule
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RuleView<'a> {
    Exact { path: &'a str, label: &'a str },
    Pattern { pattern: &'a str, label: &'a str },
}

impl<'a> From<&'a LabelRule> for RuleView<'a> {
    fn from(rule: &'a LabelRule) -> Self {
        match rule {
            LabelRule::Exact { path, label } => RuleView::Exact {
                path: path.as_str(),
                label: label.as_str(),
            },
            LabelRule::Pattern { regex, label } => RuleView::Pattern {
                pattern: regex.as_str(),
                label: label.as_str(),
            },
        }
    }
}

/// Format a breadcrumb trail in the specified format
pub fn format_trail(trail: &BreadcrumbTrail, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(trail),
        OutputFormat::Yaml => format_yaml(trail),
        OutputFormat::Ansi => Ok(format_trail_ansi(trail)),
        OutputFormat::Summary => Ok(format_trail_summary(trail)),
    }
}

/// Format an export receipt; `None` means nothing was exported
pub fn format_receipt(
    receipt: Option<&DownloadReceipt>,
    format: OutputFormat,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(&receipt),
        OutputFormat::Yaml => format_yaml(&receipt),
        OutputFormat::Ansi => Ok(format_receipt_ansi(receipt)),
        OutputFormat::Summary => Ok(format_receipt_summary(receipt)),
    }
}

/// Format the label rules of a resolver
pub fn format_rules(rules: &[LabelRule], format: OutputFormat) -> Result<String, FormatError> {
    let views: Vec<RuleView<'_>> = rules.iter().map(RuleView::from).collect();
    match format {
        OutputFormat::Json => format_json(&views),
        OutputFormat::Yaml => format_yaml(&views),
        OutputFormat::Ansi => Ok(format_rules_ansi(rules)),
        OutputFormat::Summary => Ok(format_rules_summary(rules)),
    }
}

/// Format a trail as plain text
fn format_trail_summary(trail: &BreadcrumbTrail) -> String {
    let mut output = String::new();

    output.push_str(&format!("Path: {}\n", trail.requested_path));
    if let Some(role) = trail.role {
        output.push_str(&format!("Role: {}\n", role.display_name()));
    }
    output.push_str(&format!("Trail: {}\n", trail.display()));

    for (idx, item) in trail.items.iter().enumerate() {
        let marker = if item.is_current { " (current)" } else { "" };
        output.push_str(&format!("  {}. {} -> {}{}\n", idx + 1, item.label, item.path, marker));
    }

    output
}

fn format_receipt_summary(receipt: Option<&DownloadReceipt>) -> String {
    let Some(receipt) = receipt else {
        return "Nothing to export\n".to_string();
    };

    let mut output = String::new();
    output.push_str(&format!("File: {}\n", receipt.file_name));
    if let Some(ref location) = receipt.location {
        output.push_str(&format!("Location: {}\n", location.display()));
    }
    output.push_str(&format!("Type: {}\n", receipt.mime_type));
    output.push_str(&format!("Rows: {}\n", receipt.rows));
    output.push_str(&format!("Bytes: {}\n", receipt.bytes));
    output
}

fn format_rules_summary(rules: &[LabelRule]) -> String {
    rules
        .iter()
        .map(|rule| match rule {
            LabelRule::Exact { path, label } => format!("{}  {}\n", path, label),
            LabelRule::Pattern { regex, label } => format!("{}  {}\n", regex.as_str(), label),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breadcrumbs::{resolve, BreadcrumbResolver};
    use crate::models::Role;

    #[test]
    fn test_trail_summary() {
        let trail = resolve("/admin/alunos/7", Some(Role::Admin));
        let text = format_trail(&trail, OutputFormat::Summary).unwrap();

        assert!(text.contains("Role: Administrador"));
        assert!(text.contains("Trail: Início > Admin > Alunos > Detalhes do Aluno"));
        assert!(text.contains("4. Detalhes do Aluno -> /admin/alunos/7 (current)"));
    }

    #[test]
    fn test_receipt_formats() {
        let receipt = DownloadReceipt {
            file_name: "alunos.csv".to_string(),
            location: None,
            mime_type: "text/csv; charset=utf-8".to_string(),
            rows: 3,
            bytes: 42,
        };

        let json = format_receipt(Some(&receipt), OutputFormat::Json).unwrap();
        assert!(json.contains("\"rows\": 3"));
        assert!(!json.contains("location"));

        assert_eq!(format_receipt(None, OutputFormat::Json).unwrap(), "null");
        assert_eq!(
            format_receipt(None, OutputFormat::Summary).unwrap(),
            "Nothing to export\n"
        );
    }

    #[test]
    fn test_rules_json() {
        let rules = BreadcrumbResolver::new().rules();
        let json = format_rules(&rules, OutputFormat::Json).unwrap();

        assert!(json.contains("\"kind\": \"exact\""));
        assert!(json.contains("\"kind\": \"pattern\""));
        assert!(json.contains("Histórico do Aluno"));
    }
}
