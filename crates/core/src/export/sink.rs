//! Download sinks
//!
//! A sink materializes a prepared document as a named download. The
//! directory sink stages the bytes in a temporary file next to the target
//! and persists it in one step; the staged file is removed on every path.

use super::ExportError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// A rendered document waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDownload {
    /// Download name, `.csv` included
    pub file_name: String,

    /// MIME type of the content
    pub mime_type: String,

    /// Encoded document
    pub bytes: Vec<u8>,

    /// Number of data rows in the document
    pub rows: usize,
}

/// Result of a delivered download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReceipt {
    pub file_name: String,

    /// Where the file landed, for sinks that write to disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,

    pub mime_type: String,
    pub rows: usize,
    pub bytes: usize,
}

impl DownloadReceipt {
    fn for_download(download: &PreparedDownload, location: Option<PathBuf>) -> Self {
        Self {
            file_name: download.file_name.clone(),
            location,
            mime_type: download.mime_type.clone(),
            rows: download.rows,
            bytes: download.bytes.len(),
        }
    }
}

/// Trait for download targets
pub trait DownloadSink {
    /// Deliver a prepared document
    fn deliver(&self, download: &PreparedDownload) -> Result<DownloadReceipt, ExportError>;
}

impl<T: DownloadSink + ?Sized> DownloadSink for &T {
    fn deliver(&self, download: &PreparedDownload) -> Result<DownloadReceipt, ExportError> {
        (**self).deliver(download)
    }
}

/// Writes downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, download: &PreparedDownload) -> Result<DownloadReceipt, ExportError> {
        fs::create_dir_all(&self.dir)?;

        // Dropping the staged handle deletes it unless it was persisted
        let mut staged = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        staged.write_all(&download.bytes)?;
        staged.flush()?;

        let target = self.dir.join(&download.file_name);
        staged
            .persist(&target)
            .map_err(|e| ExportError::Persist {
                file_name: download.file_name.clone(),
                source: e.error,
            })?;

        debug!(target = %target.display(), bytes = download.bytes.len(), "download persisted");
        Ok(DownloadReceipt::for_download(download, Some(target)))
    }
}

/// Keeps downloads in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    downloads: Mutex<Vec<PreparedDownload>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the delivered downloads
    pub fn downloads(&self) -> Vec<PreparedDownload> {
        self.downloads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, download: &PreparedDownload) -> Result<DownloadReceipt, ExportError> {
        self.downloads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(download.clone());
        Ok(DownloadReceipt::for_download(download, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PreparedDownload {
        PreparedDownload {
            file_name: "alunos.csv".to_string(),
            mime_type: super::super::CSV_MIME_TYPE.to_string(),
            bytes: "\u{feff}nome\nAna".as_bytes().to_vec(),
            rows: 1,
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));

        let receipt = sink.deliver(&sample()).unwrap();

        let location = receipt.location.clone().unwrap();
        assert_eq!(location, dir.path().join("exports").join("alunos.csv"));
        assert_eq!(fs::read(&location).unwrap(), sample().bytes);
        assert_eq!(receipt.rows, 1);
        // No staged file is left behind
        assert_eq!(entries(&dir.path().join("exports")), vec!["alunos.csv"]);
    }

    #[test]
    fn test_directory_sink_replaces_existing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("alunos.csv"), "old").unwrap();

        DirectorySink::new(dir.path()).deliver(&sample()).unwrap();

        assert_eq!(fs::read(dir.path().join("alunos.csv")).unwrap(), sample().bytes);
    }

    #[test]
    fn test_failed_persist_releases_staged_file() {
        let dir = TempDir::new().unwrap();
        // A directory at the target path makes the final rename fail
        fs::create_dir(dir.path().join("alunos.csv")).unwrap();
        fs::write(dir.path().join("alunos.csv").join("keep"), "x").unwrap();

        let err = DirectorySink::new(dir.path()).deliver(&sample()).unwrap_err();

        assert!(matches!(err, ExportError::Persist { .. }));
        assert_eq!(entries(dir.path()), vec!["alunos.csv"]);
    }

    #[test]
    fn test_memory_sink_through_reference() {
        let sink = MemorySink::new();
        let by_ref = &sink;

        let receipt = by_ref.deliver(&sample()).unwrap();

        assert!(receipt.location.is_none());
        assert_eq!(receipt.bytes, sample().bytes.len());
        assert_eq!(sink.downloads(), vec![sample()]);
    }
}
