//! Common types for import parsing

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Import file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    #[default]
    Csv,
    Json,
}

impl ImportFormat {
    /// Pick a format from a file name: `.json` is JSON, everything else CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ImportFormat::Json,
            _ => ImportFormat::Csv,
        }
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "json" => Ok(ImportFormat::Json),
            _ => Err(format!("Invalid import format: {}", s)),
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFormat::Csv => write!(f, "csv"),
            ImportFormat::Json => write!(f, "json"),
        }
    }
}

/// One transaction-like row read from an import file
///
/// Every field is optional; defaults are applied when the row is turned into
/// a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// 1-based row number within the data rows
    pub row: usize,
    /// Format the row was read from
    pub format: ImportFormat,
    pub id: Option<String>,
    pub date: Option<String>,
    /// Declared type, as written in the file
    pub kind: Option<String>,
    pub category: Option<String>,
    /// Signed amount, `None` when missing or not numeric
    pub amount: Option<f64>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub recurring: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImportFormat::from_path(Path::new("backup.json")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("BACKUP.JSON")), ImportFormat::Json);
        assert_eq!(ImportFormat::from_path(Path::new("transactions.csv")), ImportFormat::Csv);
        assert_eq!(ImportFormat::from_path(Path::new("export")), ImportFormat::Csv);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<ImportFormat>().unwrap(), ImportFormat::Json);
        assert_eq!(" csv ".parse::<ImportFormat>().unwrap(), ImportFormat::Csv);
        assert!("xlsx".parse::<ImportFormat>().is_err());
    }
}
