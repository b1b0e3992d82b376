//! Profile exports
//!
//! Flattens trainer and student profiles into records with fixed,
//! human-readable column headers before handing them to the generic
//! exporter.

use super::{DownloadReceipt, DownloadSink, ExportError, TabularExporter};
use crate::config::ExportConfig;
use crate::models::{Record, StudentProfile, TrainerProfile};
use chrono::NaiveDate;
use std::fmt::Write;
use tracing::warn;

pub const TRAINER_COLUMNS: [&str; 9] = [
    "Nome",
    "Email",
    "Telefone",
    "CREF",
    "Especialidade",
    "Plano",
    "Alunos",
    "Status",
    "Data de Cadastro",
];

pub const STUDENT_COLUMNS: [&str; 8] = [
    "Nome",
    "Email",
    "Telefone",
    "Personal",
    "Data de Nascimento",
    "Objetivo",
    "Status",
    "Data de Cadastro",
];

const FALLBACK_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a date, falling back to `dd/mm/YYYY` when the format is invalid
fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_ok() {
        return out;
    }
    warn!(format, "invalid date format, using {}", FALLBACK_DATE_FORMAT);
    date.format(FALLBACK_DATE_FORMAT).to_string()
}

/// Flatten trainer profiles into export records
pub fn trainer_records(profiles: &[TrainerProfile], config: &ExportConfig) -> Vec<Record> {
    profiles
        .iter()
        .map(|p| {
            let values: [String; 9] = [
                p.full_name.clone(),
                p.email.clone(),
                p.phone.clone().unwrap_or_default(),
                p.cref.clone().unwrap_or_default(),
                p.specialty.clone().unwrap_or_default(),
                p.plan_name.clone().unwrap_or_default(),
                p.student_count.to_string(),
                config.status_label(p.is_active).to_string(),
                format_date(p.created_at.date_naive(), &config.date_format),
            ];
            TRAINER_COLUMNS.iter().copied().zip(values).collect()
        })
        .collect()
}

/// Flatten student profiles into export records
pub fn student_records(profiles: &[StudentProfile], config: &ExportConfig) -> Vec<Record> {
    profiles
        .iter()
        .map(|p| {
            let values: [String; 8] = [
                p.full_name.clone(),
                p.email.clone(),
                p.phone.clone().unwrap_or_default(),
                p.trainer_name.clone().unwrap_or_default(),
                p.birth_date
                    .map(|d| format_date(d, &config.date_format))
                    .unwrap_or_default(),
                p.goal.clone().unwrap_or_default(),
                config.status_label(p.is_active).to_string(),
                format_date(p.created_at.date_naive(), &config.date_format),
            ];
            STUDENT_COLUMNS.iter().copied().zip(values).collect()
        })
        .collect()
}

/// Exports trainer and student listings
pub struct ProfileExporter<S: DownloadSink> {
    exporter: TabularExporter<S>,
    config: ExportConfig,
}

impl<S: DownloadSink> ProfileExporter<S> {
    pub fn new(sink: S, config: ExportConfig) -> Self {
        Self {
            exporter: TabularExporter::new(sink),
            config,
        }
    }

    /// Get the underlying record exporter
    pub fn exporter(&self) -> &TabularExporter<S> {
        &self.exporter
    }

    /// Export trainers as `personais_<date>.csv`
    pub fn export_trainers(
        &self,
        profiles: &[TrainerProfile],
        today: NaiveDate,
    ) -> Result<Option<DownloadReceipt>, ExportError> {
        let records = trainer_records(profiles, &self.config);
        self.exporter
            .export(&records, &format!("personais_{}", today.format("%Y-%m-%d")))
    }

    /// Export students as `alunos_<date>.csv`
    pub fn export_students(
        &self,
        profiles: &[StudentProfile],
        today: NaiveDate,
    ) -> Result<Option<DownloadReceipt>, ExportError> {
        let records = student_records(profiles, &self.config);
        self.exporter
            .export(&records, &format!("alunos_{}", today.format("%Y-%m-%d")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use chrono::{TimeZone, Utc};

    fn trainer(name: &str, active: bool) -> TrainerProfile {
        TrainerProfile {
            id: "t-1".to_string(),
            full_name: name.to_string(),
            email: "carlos@academia.com".to_string(),
            phone: Some("(11) 99999-0000".to_string()),
            cref: None,
            specialty: Some("Musculação, Funcional".to_string()),
            plan_name: Some("Pro".to_string()),
            student_count: 12,
            is_active: active,
            created_at: Utc.with_ymd_and_hms(2024, 2, 5, 13, 0, 0).unwrap(),
        }
    }

    fn student() -> StudentProfile {
        StudentProfile {
            id: "s-1".to_string(),
            full_name: "Maria \"Mari\" Souza".to_string(),
            email: "maria@email.com".to_string(),
            phone: None,
            trainer_name: Some("Carlos".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1995, 11, 30),
            goal: None,
            is_active: false,
            created_at: Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 0).unwrap(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_trainer_records() {
        let records = trainer_records(&[trainer("Carlos", true)], &ExportConfig::default());
        let record = &records[0];

        assert_eq!(record.field_names().collect::<Vec<_>>(), TRAINER_COLUMNS);
        assert_eq!(record.get("CREF").unwrap().canonical(), "");
        assert_eq!(record.get("Alunos").unwrap().canonical(), "12");
        assert_eq!(record.get("Status").unwrap().canonical(), "Ativo");
        assert_eq!(record.get("Data de Cadastro").unwrap().canonical(), "05/02/2024");
    }

    #[test]
    fn test_export_trainers_document() {
        let exporter = ProfileExporter::new(MemorySink::new(), ExportConfig::default());
        let receipt = exporter
            .export_trainers(&[trainer("Carlos", true), trainer("Ana", false)], today())
            .unwrap()
            .unwrap();

        assert_eq!(receipt.file_name, "personais_2024-06-01.csv");
        assert_eq!(receipt.rows, 2);

        let downloads = exporter.exporter().sink().downloads();
        let text = String::from_utf8(downloads[0].bytes.clone()).unwrap();
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(
            lines[0],
            "Nome,Email,Telefone,CREF,Especialidade,Plano,Alunos,Status,Data de Cadastro"
        );
        assert_eq!(
            lines[2],
            "Ana,carlos@academia.com,(11) 99999-0000,,\"Musculação, Funcional\",Pro,12,Inativo,05/02/2024"
        );
    }

    #[test]
    fn test_export_students_document() {
        let exporter = ProfileExporter::new(MemorySink::new(), ExportConfig::default());
        exporter.export_students(&[student()], today()).unwrap();

        let downloads = exporter.exporter().sink().downloads();
        assert_eq!(downloads[0].file_name, "alunos_2024-06-01.csv");
        let text = String::from_utf8(downloads[0].bytes.clone()).unwrap();
        assert!(text.ends_with(
            "\"Maria \"\"Mari\"\" Souza\",maria@email.com,,Carlos,30/11/1995,,Inativo,31/12/2023"
        ));
    }

    #[test]
    fn test_empty_listing_skips_download() {
        let exporter = ProfileExporter::new(MemorySink::new(), ExportConfig::default());

        assert!(exporter.export_students(&[], today()).unwrap().is_none());
        assert!(exporter.exporter().sink().downloads().is_empty());
    }

    #[test]
    fn test_custom_labels_and_date_format() {
        let config = ExportConfig::default()
            .with_date_format("%Y-%m-%d")
            .with_status_labels("Sim", "Não");
        let records = student_records(&[student()], &config);

        assert_eq!(records[0].get("Status").unwrap().canonical(), "Não");
        assert_eq!(records[0].get("Data de Nascimento").unwrap().canonical(), "1995-11-30");
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(format_date(date, "%Q"), "02/01/2024");
    }
}
