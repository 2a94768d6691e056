//! Report structures for API responses

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::models::Transaction;
use super::types::TxnType;

/// Total spent in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Sum of expense magnitudes
    pub total: f64,
}

/// Net amount for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNet {
    /// YYYY-MM
    pub month: String,
    pub net: f64,
}

/// Spending measured against the monthly goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub month: String,
    pub goal: f64,
    pub spent: f64,
    /// Percentage of the goal spent, capped at 100; zero when no goal is set
    pub progress: f64,
}

/// Expense totals per category, ordered by category name
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.kind == TxnType::Expense) {
        *totals.entry(tx.category.as_str()).or_insert(0.0) += tx.amount.abs();
    }

    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}

/// Signed net per month, oldest first. Undated records are skipped.
pub fn monthly_net(transactions: &[Transaction]) -> Vec<MonthlyNet> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions {
        if let Some(month) = tx.month_key() {
            *months.entry(month).or_insert(0.0) += tx.amount;
        }
    }

    months.into_iter().map(|(month, net)| MonthlyNet { month, net }).collect()
}

/// Expense magnitude recorded in `month` (YYYY-MM)
pub fn month_expense(transactions: &[Transaction], month: &str) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == TxnType::Expense)
        .filter(|t| t.month_key().as_deref() == Some(month))
        .map(|t| t.amount.abs())
        .sum()
}

pub fn goal_progress(month: &str, goal: f64, spent: f64) -> GoalProgress {
    let progress = if goal > 0.0 { (spent / goal * 100.0).min(100.0) } else { 0.0 };
    GoalProgress {
        month: month.to_string(),
        goal,
        spent,
        progress,
    }
}
