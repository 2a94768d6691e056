//! CSV and JSON import parsers

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{ParseError, ParseResult};
use crate::types::{ImportFormat, ImportRecord};

/// Stateless parser for import documents
pub struct SimpleImportParser;

impl SimpleImportParser {
    /// Parse `content` in the given format
    pub fn parse(content: &str, format: ImportFormat) -> ParseResult<Vec<ImportRecord>> {
        match format {
            ImportFormat::Csv => Self::parse_csv(content),
            ImportFormat::Json => Self::parse_json(content),
        }
    }

    /// Parse a top-level JSON array of transaction-like objects
    pub fn parse_json(content: &str) -> ParseResult<Vec<ImportRecord>> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let parsed: Value = serde_json::from_str(trimmed).map_err(|e| ParseError::SyntaxError {
            location: format!("line {}, column {}", e.line(), e.column()),
            message: e.to_string(),
        })?;

        let Some(items) = parsed.as_array() else {
            return Err(ParseError::InvalidFormat {
                message: "JSON import must be a top-level array of transaction objects".to_string(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                return Err(ParseError::InvalidFormat {
                    message: format!("entry {} is not an object", index + 1),
                });
            };
            records.push(Self::record_from_object(index + 1, object));
        }

        Ok(records)
    }

    fn record_from_object(row: usize, object: &Map<String, Value>) -> ImportRecord {
        ImportRecord {
            row,
            format: ImportFormat::Json,
            id: json_text(object.get("id")),
            date: json_text(object.get("date")),
            kind: json_text(object.get("type")),
            category: json_text(object.get("category")),
            amount: object.get("amount").and_then(json_number),
            notes: json_text(object.get("notes")),
            description: json_text(object.get("description")),
            recurring: object.get("recurring").and_then(Value::as_bool),
        }
    }

    /// Parse CSV with a header row
    ///
    /// Columns are looked up by header name (`ID`, `Date`, `Amount`,
    /// `Category`, `Description`, case-insensitive), so column order does not
    /// matter and unknown columns are ignored.
    pub fn parse_csv(content: &str) -> ParseResult<Vec<ImportRecord>> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(trimmed.as_bytes());

        let headers = reader.headers().map_err(|e| ParseError::SyntaxError {
            location: "header".to_string(),
            message: e.to_string(),
        })?;
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_lowercase(), index))
            .collect();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            let record = result.map_err(|e| ParseError::SyntaxError {
                location: format!("row {}", row),
                message: e.to_string(),
            })?;

            let field = |name: &str| -> Option<String> {
                columns
                    .get(name)
                    .and_then(|&i| record.get(i))
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            records.push(ImportRecord {
                row,
                format: ImportFormat::Csv,
                id: field("id"),
                date: field("date"),
                kind: field("type"),
                category: field("category"),
                amount: field("amount").and_then(|v| v.parse::<f64>().ok()),
                notes: field("notes"),
                description: field("description"),
                recurring: field("recurring").and_then(|v| v.parse::<bool>().ok()),
            });
        }

        Ok(records)
    }
}

fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ==================== Tests ====================
