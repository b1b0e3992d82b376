//! mta_trainerdesk_core - Core library for the trainer desk
//!
//! This crate provides the local logic behind the personal trainer
//! management app: CSV exports of trainer and student listings, breadcrumb
//! trails for the navigation bar, and the account actions that dialogs run
//! against the remote backend.
//!
//! # Features
//!
//! - **CSV Export**: Ordered records rendered with RFC 4180 style quoting,
//!   a UTF-8 byte-order marker, and delivered through a download sink.
//! - **Breadcrumbs**: Static labels, route patterns and a prettifying
//!   fallback, so any path resolves to a trail.
//! - **Account Actions**: Status, deletion and plan changes with injected
//!   notifications and query invalidation.
//! - **Multiple Output Formats**: JSON, YAML, and ANSI-colored terminal output.
//!
//! # Example
//!
//! ```rust,no_run
//! use mta_trainerdesk_core::{resolve, DirectorySink, Record, Role, TabularExporter};
//!
//! let trail = resolve("/personal/alunos/42/historico", Some(Role::Personal));
//! println!("{}", trail.display());
//!
//! let exporter = TabularExporter::new(DirectorySink::new("exports"));
//! let records = vec![Record::new().with("Nome", "Ana").with("Status", "Ativo")];
//! exporter.export(&records, "alunos").unwrap();
//! ```

pub mod actions;
pub mod breadcrumbs;
pub mod config;
pub mod export;
pub mod models;
pub mod output;

// Re-exports for convenience
pub use actions::{
    AccountActions, AccountKind, AccountRef, ActionError, AdminBackend, AuthenticatedUser,
    BackendError, Notifier, PlanAssignment, PlanCancellation, QueryInvalidator, QueryKey, Session,
};
pub use breadcrumbs::{normalize_path, resolve, BreadcrumbResolver, LabelRule, HOME_LABEL};
pub use config::{AppConfig, BreadcrumbConfig, ConfigError, ExportConfig, PatternLabel};
pub use export::{
    escape_cell, student_records, trainer_records, CsvDocument, DirectorySink, DownloadReceipt,
    DownloadSink, ExportError, MemorySink, PreparedDownload, ProfileExporter, TabularExporter,
    CSV_MIME_TYPE,
};
pub use models::{
    AdminStats, BreadcrumbItem, BreadcrumbTrail, CellValue, Record, Role, StudentProfile,
    TrainerProfile,
};
pub use output::{format_receipt, format_rules, format_trail, FormatError, OutputFormat};
