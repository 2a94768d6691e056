//! Server-side transaction list query

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;
use crate::types::{SortField, SortOrder};

/// Filters and ordering accepted by the list endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Case-insensitive exact category match
    pub category: Option<String>,
    /// Inclusive lower amount bound
    pub min: Option<f64>,
    /// Inclusive upper amount bound
    pub max: Option<f64>,
    /// Sort field; `None` keeps file order
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn parse_bound(params: &HashMap<String, String>, key: &str) -> CoreResult<Option<f64>> {
    match param(params, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(Some)
            .ok_or_else(|| CoreError::InvalidQuery {
                param: key.to_string(),
                message: format!("'{}' is not a number", raw),
            }),
    }
}

impl TransactionQuery {
    /// Build a query from `category`, `min`, `max`, `sortBy` and `order` parameters
    pub fn from_params(params: &HashMap<String, String>) -> CoreResult<Self> {
        let sort_by = match param(params, "sortBy") {
            Some(raw) => match raw.parse::<SortField>() {
                Ok(field) => Some(field),
                Err(e) => {
                    log::debug!("Ignoring sortBy: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            category: param(params, "category").map(str::to_string),
            min: parse_bound(params, "min")?,
            max: parse_bound(params, "max")?,
            sort_by,
            order: param(params, "order").map(SortOrder::from_param).unwrap_or_default(),
        })
    }

    /// Check a single transaction against the filters
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(ref category) = self.category {
            if tx.category.to_lowercase() != category.to_lowercase() {
                return false;
            }
        }
        if self.min.map_or(false, |min| tx.amount < min) {
            return false;
        }
        if self.max.map_or(false, |max| tx.amount > max) {
            return false;
        }
        true
    }

    /// Filter and sort a loaded collection
    pub fn apply(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions.retain(|t| self.matches(t));

        if let Some(field) = self.sort_by {
            transactions.sort_by(|a, b| self.order.apply(compare_stored(field, a, b)));
        }

        transactions
    }
}

/// Plain string form of a field, used wherever fields compare lexically
pub(crate) fn field_text(field: SortField, tx: &Transaction) -> String {
    match field {
        SortField::Id => tx.id.clone(),
        SortField::Date => tx.date.clone(),
        SortField::Type => tx.kind.to_string(),
        SortField::Category => tx.category.clone(),
        SortField::Amount => tx.amount.to_string(),
        SortField::Notes => tx.notes.clone(),
        SortField::Description => tx.description.clone(),
        SortField::Recurring => tx.recurring.to_string(),
    }
}

/// Stored-record ordering: numeric for amounts, lexical for everything else
fn compare_stored(field: SortField, a: &Transaction, b: &Transaction) -> Ordering {
    match field {
        SortField::Amount => a.amount.total_cmp(&b.amount),
        SortField::Recurring => a.recurring.cmp(&b.recurring),
        _ => field_text(field, a).cmp(&field_text(field, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionInput;

    fn tx(id: &str, date: &str, category: &str, amount: f64) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": id, "date": date, "category": category, "amount": amount
        }))
        .unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "2024-01-10", "Food", -200.0),
            tx("2", "2024-01-02", "Salary", 50000.0),
            tx("3", "2024-01-05", "food", -35.5),
            tx("4", "2023-12-31", "Rent", -10000.0),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn ids(txs: &[Transaction]) -> Vec<&str> {
        txs.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_no_params_keeps_everything_in_order() {
        let query = TransactionQuery::from_params(&HashMap::new()).unwrap();
        assert_eq!(ids(&query.apply(sample())), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_category_is_case_insensitive_exact() {
        let query = TransactionQuery::from_params(&params(&[("category", "FOOD")])).unwrap();
        assert_eq!(ids(&query.apply(sample())), vec!["1", "3"]);

        let query = TransactionQuery::from_params(&params(&[("category", "Foo")])).unwrap();
        assert!(query.apply(sample()).is_empty());
    }

    #[test]
    fn test_amount_bounds_are_inclusive() {
        let query = TransactionQuery::from_params(&params(&[("min", "-200"), ("max", "-35.5")])).unwrap();
        assert_eq!(ids(&query.apply(sample())), vec!["1", "3"]);
    }

    #[test]
    fn test_bad_bound_is_rejected() {
        let err = TransactionQuery::from_params(&params(&[("min", "lots")])).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuery { ref param, .. } if param == "min"));
    }

    #[test]
    fn test_empty_params_are_ignored() {
        let query = TransactionQuery::from_params(&params(&[("min", ""), ("category", " ")])).unwrap();
        assert_eq!(query, TransactionQuery::default());
    }

    #[test]
    fn test_sort_amount_numeric() {
        let query = TransactionQuery::from_params(&params(&[("sortBy", "amount"), ("order", "desc")])).unwrap();
        assert_eq!(ids(&query.apply(sample())), vec!["2", "3", "1", "4"]);
    }

    #[test]
    fn test_sort_date_lexical() {
        let query = TransactionQuery::from_params(&params(&[("sortBy", "date")])).unwrap();
        assert_eq!(ids(&query.apply(sample())), vec!["4", "2", "3", "1"]);
    }

    #[test]
    fn test_sort_category_is_plain_string_order() {
        let query = TransactionQuery::from_params(&params(&[("sortBy", "category")])).unwrap();
        // Uppercase sorts before lowercase
        assert_eq!(ids(&query.apply(sample())), vec!["1", "4", "2", "3"]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_order() {
        let query = TransactionQuery::from_params(&params(&[("sortBy", "payee")])).unwrap();
        assert_eq!(query.sort_by, None);
        assert_eq!(ids(&query.apply(sample())), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let query = TransactionQuery::from_params(&params(&[("category", "food"), ("sortBy", "amount")])).unwrap();
        let once = query.apply(sample());
        let twice = query.apply(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_matches_uses_stored_sign() {
        let refund = Transaction::from(TransactionInput {
            kind: Some("income".to_string()),
            amount: Some(crate::models::FlexAmount::Number(-20.0)),
            ..Default::default()
        });
        let query = TransactionQuery { min: Some(0.0), ..Default::default() };
        assert!(query.matches(&refund));
    }
}
