//! Core data models for transactions

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{CoreError, CoreResult};
use super::types::TxnType;

/// An id as it may appear in JSON: legacy records used numeric timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexId {
    Number(serde_json::Number),
    Text(String),
}

impl FlexId {
    pub fn as_text(&self) -> String {
        match self {
            FlexId::Number(n) => n.to_string(),
            FlexId::Text(s) => s.clone(),
        }
    }
}

/// An amount as it may appear in JSON: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexAmount {
    Number(f64),
    Text(String),
}

impl FlexAmount {
    /// Numeric value, `None` for text that does not parse
    pub fn value(&self) -> Option<f64> {
        match self {
            FlexAmount::Number(n) => Some(*n),
            FlexAmount::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }
}

/// Lenient transaction shape.
///
/// Used for create payloads, update patches, import rows and records read
/// back from disk. Every field is optional; converting into a
/// [`Transaction`] applies the defaults and the sign/type rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionInput {
    pub id: Option<FlexId>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub amount: Option<FlexAmount>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub recurring: Option<Value>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl TransactionInput {
    pub fn id_text(&self) -> Option<String> {
        self.id.as_ref().map(FlexId::as_text).filter(|s| !s.is_empty())
    }

    pub fn amount_value(&self) -> Option<f64> {
        self.amount.as_ref().and_then(FlexAmount::value)
    }

    /// Declared type, ignoring values that are not `income` or `expense`
    pub fn declared_type(&self) -> Option<TxnType> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }

    pub fn recurring_flag(&self) -> Option<bool> {
        self.recurring.as_ref().map(truthy)
    }

    /// Names of the fields a create request must carry but doesn't
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if non_empty(&self.date).is_none() {
            missing.push("date");
        }
        if non_empty(&self.category).is_none() {
            missing.push("category");
        }
        if self.amount_value().is_none() {
            missing.push("amount");
        }
        missing
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransactionInput")]
pub struct Transaction {
    /// Opaque unique identifier; empty until the ledger or store assigns one
    pub id: String,
    /// Calendar date, normally YYYY-MM-DD (not validated)
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: String,
    /// Signed amount; negative for expenses
    pub amount: f64,
    pub notes: String,
    pub recurring: bool,
    /// Text used for the CSV export description column
    pub description: String,
}

impl From<TransactionInput> for Transaction {
    fn from(input: TransactionInput) -> Self {
        let id = input.id_text().unwrap_or_default();
        let category = non_empty(&input.category).unwrap_or("Other").to_string();
        let notes = input.notes.clone().unwrap_or_default();
        let description = non_empty(&input.description)
            .or_else(|| non_empty(&input.notes))
            .unwrap_or(&category)
            .to_string();
        let (kind, amount) = TxnType::settle(
            input.declared_type(),
            input.amount_value().unwrap_or(0.0),
        );

        Transaction {
            id,
            date: input.date.clone().unwrap_or_default(),
            kind,
            category,
            amount,
            notes,
            recurring: input.recurring_flag().unwrap_or(false),
            description,
        }
    }
}

impl Transaction {
    /// Merge a partial update over this record.
    ///
    /// Empty strings and unknown types keep the stored value; a present
    /// amount (including `0`) and a present `recurring` flag replace it.
    pub fn merged(&self, patch: &TransactionInput) -> Transaction {
        let description = non_empty(&patch.notes)
            .or_else(|| non_empty(&patch.category))
            .unwrap_or(&self.description)
            .to_string();

        let merged = TransactionInput {
            id: Some(FlexId::Text(self.id.clone())),
            date: Some(non_empty(&patch.date).unwrap_or(&self.date).to_string()),
            kind: Some(patch.declared_type().unwrap_or(self.kind).to_string()),
            category: Some(non_empty(&patch.category).unwrap_or(&self.category).to_string()),
            amount: Some(FlexAmount::Number(patch.amount_value().unwrap_or(self.amount))),
            notes: Some(non_empty(&patch.notes).unwrap_or(&self.notes).to_string()),
            description: Some(description),
            recurring: Some(Value::Bool(patch.recurring_flag().unwrap_or(self.recurring))),
        };

        Transaction::from(merged)
    }

    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// Month key (YYYY-MM) for the transaction date
    pub fn month_key(&self) -> Option<String> {
        self.date_naive().map(|d| d.format("%Y-%m").to_string())
    }
}

/// Parse a calendar date, accepting a trailing time component
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Income, expense and balance over a collection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Sum of positive amounts
    pub income: f64,
    /// Sum of negative amounts (zero or below)
    pub expense: f64,
    /// income + expense
    pub balance: f64,
}

impl Summary {
    /// Partition by sign only; the stored type is not consulted.
    ///
    /// Fails with `InternalError` when a total leaves the finite range, since
    /// JSON has no representation for infinities.
    pub fn of(transactions: &[Transaction]) -> CoreResult<Self> {
        let income: f64 = transactions.iter().map(|t| t.amount).filter(|a| *a > 0.0).sum();
        let expense: f64 = transactions.iter().map(|t| t.amount).filter(|a| *a < 0.0).sum();
        let summary = Summary {
            income,
            expense,
            balance: income + expense,
        };

        if [summary.income, summary.expense, summary.balance].iter().all(|v| v.is_finite()) {
            Ok(summary)
        } else {
            Err(CoreError::InternalError {
                message: "transaction totals exceed the representable range".to_string(),
            })
        }
    }
}
