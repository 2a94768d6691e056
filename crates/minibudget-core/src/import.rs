//! Import rows into transactions

use minibudget_parser::{ImportFormat, ImportRecord};
use serde::{Deserialize, Serialize};

use crate::models::{FlexAmount, FlexId, TransactionInput};
use crate::types::TxnType;

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows written before the run stopped
    pub created: usize,
    /// 1-based row that failed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failed_row.is_none()
    }
}

/// Today's date as stored on imported rows without one
pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Build a create payload from an import row, filling the import defaults
pub fn record_to_input(record: ImportRecord, today: &str) -> TransactionInput {
    let amount = record.amount.unwrap_or(0.0);

    let (kind, notes) = match record.format {
        // JSON backups carry a declared type; unknown types import as expenses
        ImportFormat::Json => (
            record
                .kind
                .as_deref()
                .and_then(|k| k.parse::<TxnType>().ok())
                .unwrap_or(TxnType::Expense),
            record.notes.clone().or_else(|| record.description.clone()),
        ),
        // CSV exports only carry a signed amount
        ImportFormat::Csv => (TxnType::from_sign(amount), record.description.clone()),
    };

    TransactionInput {
        id: record.id.map(FlexId::Text),
        date: Some(record.date.unwrap_or_else(|| today.to_string())),
        kind: Some(kind.to_string()),
        category: Some(record.category.unwrap_or_else(|| "Other".to_string())),
        amount: Some(FlexAmount::Number(amount.abs())),
        notes: Some(notes.unwrap_or_default()),
        description: None,
        recurring: record.recurring.map(serde_json::Value::Bool),
    }
}
