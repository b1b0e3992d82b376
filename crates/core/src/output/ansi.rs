//! ANSI colored output formatter
//!
//! This module provides colorful terminal output for breadcrumb trails,
//! label tables and export receipts.

use crate::breadcrumbs::LabelRule;
use crate::export::DownloadReceipt;
use crate::models::{BreadcrumbItem, BreadcrumbTrail};

// ANSI escape codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const CYAN: &str = "\x1b[36m";
const BRIGHT_GREEN: &str = "\x1b[92m";
const BRIGHT_YELLOW: &str = "\x1b[93m";
const BRIGHT_CYAN: &str = "\x1b[96m";
const BRIGHT_WHITE: &str = "\x1b[97m";

const BG_BLUE: &str = "\x1b[44m";

fn item_color(item: &BreadcrumbItem) -> &'static str {
    if item.is_current {
        BRIGHT_WHITE
    } else {
        CYAN
    }
}

/// Format a breadcrumb trail as a single ANSI line
pub fn format_trail_ansi(trail: &BreadcrumbTrail) -> String {
    if trail.items.is_empty() {
        return format!("{}(root){}", DIM, RESET);
    }

    trail
        .items
        .iter()
        .map(|item| {
            let weight = if item.is_current { BOLD } else { "" };
            format!("{}{}{}{}", weight, item_color(item), item.label, RESET)
        })
        .collect::<Vec<_>>()
        .join(&format!(" {}>{} ", DIM, RESET))
}

/// Format label rules as an ANSI table
pub fn format_rules_ansi(rules: &[LabelRule]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}{}  Breadcrumb Labels  {}{}\n\n",
        BOLD, BG_BLUE, RESET, RESET
    ));

    for rule in rules {
        let line = match rule {
            LabelRule::Exact { path, label } => format!(
                "  {}={} {}{}{} {}{}{}\n",
                DIM, RESET, BRIGHT_CYAN, path, RESET, BOLD, label, RESET
            ),
            LabelRule::Pattern { regex, label } => format!(
                "  {}~{} {}{}{} {}{}{}\n",
                DIM,
                RESET,
                BRIGHT_YELLOW,
                regex.as_str(),
                RESET,
                BOLD,
                label,
                RESET
            ),
        };
        output.push_str(&line);
    }

    output
}

/// Format an export receipt
pub fn format_receipt_ansi(receipt: Option<&DownloadReceipt>) -> String {
    let Some(receipt) = receipt else {
        return format!("{}Nothing to export{}\n", DIM, RESET);
    };

    let mut output = format!(
        "{}{}✔ {}{} {}({} rows, {} bytes){}\n",
        BOLD, BRIGHT_GREEN, receipt.file_name, RESET, DIM, receipt.rows, receipt.bytes, RESET
    );
    if let Some(ref location) = receipt.location {
        output.push_str(&format!("  {}{}{}\n", DIM, location.display(), RESET));
    }
    output
}
