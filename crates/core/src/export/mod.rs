//! CSV export module
//!
//! Builds escaped CSV documents from ordered records and hands them to a
//! [`DownloadSink`] that materializes the `<filename>.csv` download.

mod profiles;
mod sink;

pub use profiles::{
    student_records, trainer_records, ProfileExporter, STUDENT_COLUMNS, TRAINER_COLUMNS,
};
pub use sink::{DirectorySink, DownloadReceipt, DownloadSink, MemorySink, PreparedDownload};

use crate::models::Record;
use thiserror::Error;
use tracing::{info, warn};

/// MIME type of exported documents
pub const CSV_MIME_TYPE: &str = "text/csv; charset=utf-8";

/// UTF-8 byte-order marker prefixed to every document
pub const BOM: char = '\u{feff}';

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist download {file_name}: {source}")]
    Persist {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

/// An escaped, ready-to-render CSV document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvDocument {
    /// Build a document from records.
    ///
    /// Columns come from the first record's field order. Fields missing in
    /// later records render empty; fields only present in later records are
    /// dropped. Returns `None` for an empty slice.
    pub fn from_records(records: &[Record]) -> Option<Self> {
        let first = records.first()?;
        let header: Vec<String> = first.field_names().map(str::to_string).collect();

        let rows = records
            .iter()
            .map(|record| {
                header
                    .iter()
                    .map(|name| {
                        record
                            .get(name)
                            .map(|v| escape_cell(&v.canonical()))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Some(Self {
            header: header.iter().map(|h| escape_cell(h)).collect(),
            rows,
        })
    }

    /// Escaped header cells
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render lines without the byte-order marker
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|cells| cells.join(","))
            .collect()
    }

    /// Render the full document, BOM included
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push(BOM);
        out.push_str(&self.lines().join("\n"));
        out
    }

    /// Rendered document as UTF-8 bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.render().into_bytes()
    }
}

/// Escape a single cell.
///
/// Values containing a comma, a double quote or a line feed are wrapped in
/// double quotes with embedded quotes doubled; everything else is emitted
/// as is. A bare carriage return is quoted as well, so CRLF text inside a
/// cell reads back as one field in spreadsheet tools.
pub fn escape_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Ensure a download name ends in `.csv` and cannot leave its directory
pub fn csv_file_name(filename: &str) -> String {
    let cleaned: String = filename
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let stem = cleaned.strip_suffix(".csv").unwrap_or(&cleaned);
    let stem = if stem.is_empty() { "export" } else { stem };
    format!("{}.csv", stem)
}

/// Generic record exporter
pub struct TabularExporter<S: DownloadSink> {
    sink: S,
}

impl<S: DownloadSink> TabularExporter<S> {
    /// Create an exporter writing to `sink`
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Get the underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Export `records` as `<filename>.csv`.
    ///
    /// Empty input is logged and skipped: no download happens and `Ok(None)`
    /// is returned.
    pub fn export(
        &self,
        records: &[Record],
        filename: &str,
    ) -> Result<Option<DownloadReceipt>, ExportError> {
        let Some(document) = CsvDocument::from_records(records) else {
            warn!(filename, "no records to export");
            return Ok(None);
        };

        let download = PreparedDownload {
            file_name: csv_file_name(filename),
            mime_type: CSV_MIME_TYPE.to_string(),
            bytes: document.to_bytes(),
            rows: document.row_count(),
        };

        let receipt = self.sink.deliver(&download)?;
        info!(
            file = %receipt.file_name,
            rows = receipt.rows,
            bytes = receipt.bytes,
            "export delivered"
        );
        Ok(Some(receipt))
    }
}
