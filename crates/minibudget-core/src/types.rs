//! Basic types for the core transaction module

use serde::{Deserialize, Serialize};

/// Transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    /// Money coming in (stored with a positive amount)
    Income,
    /// Money going out (stored with a negative amount)
    Expense,
}

impl TxnType {
    /// Type implied by the sign of an amount; zero counts as income
    pub fn from_sign(amount: f64) -> Self {
        if amount < 0.0 {
            TxnType::Expense
        } else {
            TxnType::Income
        }
    }

    /// Reconcile a declared type with a signed amount.
    ///
    /// The declared type wins and the amount is re-signed to match it. Without
    /// a declared type the type is taken from the sign.
    pub fn settle(declared: Option<TxnType>, amount: f64) -> (TxnType, f64) {
        let kind = declared.unwrap_or_else(|| TxnType::from_sign(amount));
        let magnitude = amount.abs();
        let signed = match kind {
            _ if magnitude == 0.0 => 0.0,
            TxnType::Income => magnitude,
            TxnType::Expense => -magnitude,
        };
        (kind, signed)
    }
}

impl std::str::FromStr for TxnType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxnType::Income),
            "expense" => Ok(TxnType::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TxnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnType::Income => write!(f, "income"),
            TxnType::Expense => write!(f, "expense"),
        }
    }
}

/// Sortable transaction field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    #[default]
    Date,
    Type,
    Category,
    Amount,
    Notes,
    Description,
    Recurring,
}

impl std::str::FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "date" => Ok(SortField::Date),
            "type" | "kind" => Ok(SortField::Type),
            "category" => Ok(SortField::Category),
            "amount" => Ok(SortField::Amount),
            "notes" => Ok(SortField::Notes),
            "description" => Ok(SortField::Description),
            "recurring" => Ok(SortField::Recurring),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::Id => write!(f, "id"),
            SortField::Date => write!(f, "date"),
            SortField::Type => write!(f, "type"),
            SortField::Category => write!(f, "category"),
            SortField::Amount => write!(f, "amount"),
            SortField::Notes => write!(f, "notes"),
            SortField::Description => write!(f, "description"),
            SortField::Recurring => write!(f, "recurring"),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Query-string semantics: exactly `desc` sorts descending, anything else ascending
    pub fn from_param(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_declared_type_wins() {
        assert_eq!(TxnType::settle(Some(TxnType::Expense), 200.0), (TxnType::Expense, -200.0));
        assert_eq!(TxnType::settle(Some(TxnType::Expense), -200.0), (TxnType::Expense, -200.0));
        assert_eq!(TxnType::settle(Some(TxnType::Income), -75.5), (TxnType::Income, 75.5));
    }

    #[test]
    fn test_settle_derives_type_from_sign() {
        assert_eq!(TxnType::settle(None, -3.0), (TxnType::Expense, -3.0));
        assert_eq!(TxnType::settle(None, 3.0), (TxnType::Income, 3.0));
        assert_eq!(TxnType::settle(None, 0.0), (TxnType::Income, 0.0));
    }

    #[test]
    fn test_settle_zero_expense_has_no_negative_zero() {
        let (kind, amount) = TxnType::settle(Some(TxnType::Expense), 0.0);
        assert_eq!(kind, TxnType::Expense);
        assert!(amount.is_sign_positive());
    }

    #[test]
    fn test_settle_is_idempotent() {
        for (declared, amount) in [(Some(TxnType::Expense), 10.0), (None, -4.0), (Some(TxnType::Income), -1.0)] {
            let (kind, signed) = TxnType::settle(declared, amount);
            assert_eq!(TxnType::settle(Some(kind), signed), (kind, signed));
        }
    }

    #[test]
    fn test_txn_type_from_str() {
        assert_eq!("Expense".parse::<TxnType>().unwrap(), TxnType::Expense);
        assert_eq!("income".parse::<TxnType>().unwrap(), TxnType::Income);
        assert!("transfer".parse::<TxnType>().is_err());
    }

    #[test]
    fn test_sort_order_from_param() {
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::from_param("sideways"), SortOrder::Asc);
    }

    #[test]
    fn test_sort_field_round_trip_names() {
        assert_eq!("kind".parse::<SortField>().unwrap(), SortField::Type);
        assert_eq!(SortField::Amount.to_string(), "amount");
        assert!("payee".parse::<SortField>().is_err());
    }
}
