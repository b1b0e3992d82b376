//! Data models for the trainer desk
//!
//! This module defines the core data structures shared by the exporter,
//! the breadcrumb resolver and the account actions: roles, exportable
//! records, breadcrumb trails and the trainer/student profiles.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Authenticated roles of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Personal,
    Aluno,
}

impl Role {
    /// Dashboard path the role lands on after sign-in
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Personal => "/personal/dashboard",
            Role::Aluno => "/aluno/dashboard",
        }
    }

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Personal => "personal",
            Role::Aluno => "aluno",
        }
    }

    /// Get display name for the role
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Personal => "Personal",
            Role::Aluno => "Aluno",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "personal" => Ok(Role::Personal),
            "aluno" => Ok(Role::Aluno),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A single scalar value inside an exportable record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Null,
}

impl CellValue {
    /// Check if the value is absent
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Canonical string form used in exported documents.
    ///
    /// `Null` renders as the empty string.
    pub fn canonical(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Float(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(dt) => dt.to_rfc3339(),
            CellValue::Null => String::new(),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s),
            // Nested values are not scalar; keep their JSON text
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// One exportable row: an ordered list of named scalar fields.
///
/// Field order is insertion order and is what the exporter uses for the
/// header, so records are kept as an association list rather than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field (builder pattern)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, keeping its original position when it already exists
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<CellValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(name, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar fields")
            }

            // Entries arrive in source order, which becomes the field order
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    record.insert(key, CellValue::from(value));
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// A single entry in a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    /// Human-readable label
    pub label: String,

    /// Absolute, slash-separated path the entry navigates to
    pub path: String,

    /// Whether this entry is the page being viewed
    pub is_current: bool,
}

impl BreadcrumbItem {
    pub fn new(label: impl Into<String>, path: impl Into<String>, is_current: bool) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            is_current,
        }
    }
}

/// Ordered breadcrumb entries from home to the current location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbTrail {
    /// Path as requested, before normalization
    pub requested_path: String,

    /// Role the trail was resolved for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Trail entries (home first, current last)
    pub items: Vec<BreadcrumbItem>,
}

impl BreadcrumbTrail {
    /// Get the formatted label path
    pub fn display(&self) -> String {
        self.items
            .iter()
            .map(|i| i.label.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Get the entry for the current page
    pub fn current(&self) -> Option<&BreadcrumbItem> {
        self.items.last().filter(|i| i.is_current)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Personal trainer profile as returned by the backend listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Professional registration number
    #[serde(default)]
    pub cref: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub student_count: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Student profile as returned by the backend listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub trainer_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub goal: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregated numbers shown on the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_trainers: u64,
    pub active_trainers: u64,
    pub inactive_trainers: u64,
    pub total_students: u64,
    pub active_students: u64,
    pub active_subscriptions: u64,
    /// Monthly recurring revenue in cents
    pub monthly_revenue_cents: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_home() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" aluno ".parse::<Role>().unwrap(), Role::Aluno);
        assert!("coach".parse::<Role>().is_err());
        assert_eq!(Role::Personal.home_path(), "/personal/dashboard");
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = Record::new().with("b", 1).with("a", "x").with("c", true);
        record.insert("a", "y");

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(record.get("a"), Some(&CellValue::Text("y".to_string())));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_record_deserialize_preserves_source_order() {
        let record: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": "a", "mid": null, "f": 1.5}"#).unwrap();

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid", "f"]);
        assert_eq!(record.get("zeta"), Some(&CellValue::Integer(1)));
        assert_eq!(record.get("mid"), Some(&CellValue::Null));
        assert_eq!(record.get("f"), Some(&CellValue::Float(1.5)));
    }

    #[test]
    fn test_canonical_strings() {
        assert_eq!(CellValue::Null.canonical(), "");
        assert_eq!(CellValue::Bool(false).canonical(), "false");
        assert_eq!(CellValue::Float(2.0).canonical(), "2");
        assert_eq!(
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()).canonical(),
            "2024-03-09"
        );
        assert_eq!(CellValue::from(None::<String>), CellValue::Null);
    }

    #[test]
    fn test_trail_display_and_current() {
        let trail = BreadcrumbTrail {
            requested_path: "/admin/alunos".to_string(),
            role: Some(Role::Admin),
            items: vec![
                BreadcrumbItem::new("Início", "/admin/dashboard", false),
                BreadcrumbItem::new("Alunos", "/admin/alunos", true),
            ],
        };

        assert_eq!(trail.display(), "Início > Alunos");
        assert_eq!(trail.current().unwrap().path, "/admin/alunos");

        let json = serde_json::to_string(&trail.items[1]).unwrap();
        assert!(json.contains("\"isCurrent\":true"));
    }
}
