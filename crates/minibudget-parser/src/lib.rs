//! Import parsing for minibudget
//!
//! Turns CSV exports and JSON backups into [`ImportRecord`]s. Applying
//! defaults and creating transactions is left to the core crate.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

pub mod error;
pub mod parser;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use parser::SimpleImportParser;
pub use types::{ImportFormat, ImportRecord};

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn ImportParserTrait>;

/// Trait for import parsers
#[async_trait]
pub trait ImportParserTrait: Send + Sync {
    /// Parse import content in a known format
    async fn parse(&self, content: &str, format: ImportFormat) -> ParseResult<Vec<ImportRecord>>;

    /// Parse a file; the format is taken from its extension unless given
    async fn parse_file(&self, path: PathBuf, format: Option<ImportFormat>) -> ParseResult<Vec<ImportRecord>>;
}

/// Default parser implementation
#[derive(Debug, Default)]
pub struct DefaultImportParser;

#[async_trait]
impl ImportParserTrait for DefaultImportParser {
    async fn parse(&self, content: &str, format: ImportFormat) -> ParseResult<Vec<ImportRecord>> {
        SimpleImportParser::parse(content, format)
    }

    async fn parse_file(&self, path: PathBuf, format: Option<ImportFormat>) -> ParseResult<Vec<ImportRecord>> {
        let content = tokio::fs::read_to_string(&path).await?;
        let format = format.unwrap_or_else(|| ImportFormat::from_path(&path));

        SimpleImportParser::parse(&content, format).map_err(|e| match e {
            ParseError::SyntaxError { location, message } => ParseError::SyntaxError {
                location: format!("{}: {}", path.display(), location),
                message,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_file_detects_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        std::fs::write(&path, r#"[{"date": "2024-01-01", "amount": 10}]"#).unwrap();

        let records = DefaultImportParser.parse_file(path, None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].format, ImportFormat::Json);
    }

    #[tokio::test]
    async fn test_parse_file_explicit_format_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.txt");
        std::fs::write(&path, "Date,Amount\n2024-01-01,5\n").unwrap();

        let records = DefaultImportParser
            .parse_file(path, Some(ImportFormat::Csv))
            .await
            .unwrap();
        assert_eq!(records[0].amount, Some(5.0));
    }

    #[tokio::test]
    async fn test_parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = DefaultImportParser.parse_file(dir.path().join("none.csv"), None).await;
        assert!(matches!(result, Err(ParseError::IoError(_))));
    }
}
