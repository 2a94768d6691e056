//! Transaction view model
//!
//! Display-side filtering, sorting and paging over the full collection. All
//! state lives in [`ViewState`]; [`ViewState::render`] is a pure function of
//! that state and the transactions it is given.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{parse_date, Transaction};
use crate::types::{SortField, SortOrder, TxnType};

/// A transaction prepared for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransaction {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: TxnType,
    pub category: String,
    /// Magnitude only; the sign is carried by `kind`
    pub amount: f64,
    pub notes: String,
    pub recurring: bool,
}

impl DisplayTransaction {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let notes = if tx.notes.is_empty() { &tx.description } else { &tx.notes };
        Self {
            id: tx.id.clone(),
            date: tx.date.clone(),
            kind: tx.kind,
            category: if tx.category.is_empty() { "Other".to_string() } else { tx.category.clone() },
            amount: tx.amount.abs(),
            notes: notes.clone(),
            recurring: tx.recurring,
        }
    }

    fn date_naive(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Normalize stored transactions for display
pub fn normalize(transactions: &[Transaction]) -> Vec<DisplayTransaction> {
    transactions.iter().map(DisplayTransaction::from_transaction).collect()
}

/// Display filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewFilters {
    /// Free-text search over notes and category
    pub q: String,
    pub kind: Option<TxnType>,
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
}

impl ViewFilters {
    pub fn matches(&self, tx: &DisplayTransaction) -> bool {
        let q = self.q.trim().to_lowercase();
        if !q.is_empty()
            && !tx.notes.to_lowercase().contains(&q)
            && !tx.category.to_lowercase().contains(&q)
        {
            return false;
        }
        if self.kind.map_or(false, |k| k != tx.kind) {
            return false;
        }
        if self.category.as_ref().map_or(false, |c| *c != tx.category) {
            return false;
        }
        if self.from.is_some() || self.to.is_some() {
            let Some(date) = tx.date_naive() else {
                return false;
            };
            if self.from.map_or(false, |from| date < from) || self.to.map_or(false, |to| date > to) {
                return false;
            }
        }
        true
    }
}

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub rows: Vec<DisplayTransaction>,
    /// Rows matching the filters across all pages
    pub total: usize,
    /// Page count, at least 1
    pub pages: usize,
    /// Current page after clamping
    pub page: usize,
    pub page_size: usize,
}

/// Filter, sort and paging state of the transaction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub filters: ViewFilters,
    pub sort_key: SortField,
    pub sort_dir: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(25)
    }
}

fn display_text(field: SortField, tx: &DisplayTransaction) -> String {
    match field {
        SortField::Id => tx.id.clone(),
        SortField::Date => tx.date.clone(),
        SortField::Type => tx.kind.to_string(),
        SortField::Category => tx.category.clone(),
        SortField::Amount => tx.amount.to_string(),
        SortField::Notes | SortField::Description => tx.notes.clone(),
        SortField::Recurring => tx.recurring.to_string(),
    }
}

fn compare_display(field: SortField, a: &DisplayTransaction, b: &DisplayTransaction) -> Ordering {
    match field {
        SortField::Amount => a.amount.total_cmp(&b.amount),
        SortField::Date => a.date_naive().cmp(&b.date_naive()),
        _ => display_text(field, a).cmp(&display_text(field, b)),
    }
}

impl ViewState {
    /// Default view: newest first, first page
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: ViewFilters::default(),
            sort_key: SortField::Date,
            sort_dir: SortOrder::Desc,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Build a state from query parameters:
    /// `q`, `type`, `category`, `from`, `to`, `sortKey`, `sortDir`, `page`, `pageSize`
    pub fn from_params(params: &HashMap<String, String>, default_page_size: usize) -> CoreResult<Self> {
        fn get<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
            params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
        }
        fn invalid(param: &str, raw: &str) -> CoreError {
            CoreError::InvalidQuery {
                param: param.to_string(),
                message: format!("'{}' is not valid here", raw),
            }
        }
        fn date(params: &HashMap<String, String>, key: &str) -> CoreResult<Option<NaiveDate>> {
            get(params, key)
                .map(|raw| parse_date(raw).ok_or_else(|| invalid(key, raw)))
                .transpose()
        }
        fn number(params: &HashMap<String, String>, key: &str) -> CoreResult<Option<usize>> {
            get(params, key)
                .map(|raw| raw.parse::<usize>().map_err(|_| invalid(key, raw)))
                .transpose()
        }

        let mut state = ViewState::new(number(params, "pageSize")?.unwrap_or(default_page_size));
        state.filters = ViewFilters {
            q: get(params, "q").unwrap_or_default().to_string(),
            kind: get(params, "type")
                .map(|raw| raw.parse::<TxnType>().map_err(|_| invalid("type", raw)))
                .transpose()?,
            category: get(params, "category").map(str::to_string),
            from: date(params, "from")?,
            to: date(params, "to")?,
        };
        if let Some(raw) = get(params, "sortKey") {
            state.sort_key = raw.parse().map_err(|_| invalid("sortKey", raw))?;
        }
        if let Some(raw) = get(params, "sortDir") {
            state.sort_dir = SortOrder::from_param(raw);
        }
        state.page = number(params, "page")?.unwrap_or(1);
        Ok(state)
    }

    pub fn set_query(&mut self, q: impl Into<String>) {
        self.filters.q = q.into().trim().to_string();
        self.page = 1;
    }

    pub fn set_kind(&mut self, kind: Option<TxnType>) {
        self.filters.kind = kind;
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.filters.category = category.filter(|c| !c.is_empty());
        self.page = 1;
    }

    pub fn set_from(&mut self, from: Option<NaiveDate>) {
        self.filters.from = from;
        self.page = 1;
    }

    pub fn set_to(&mut self, to: Option<NaiveDate>) {
        self.filters.to = to;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = ViewFilters::default();
        self.page = 1;
    }

    /// Same key flips direction; a new key sorts ascending
    pub fn toggle_sort(&mut self, key: SortField) {
        self.sort_dir = if self.sort_key == key { self.sort_dir.flip() } else { SortOrder::Asc };
        self.sort_key = key;
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total: usize) {
        self.page = (self.page + 1).min(page_count(total, self.page_size));
    }

    /// Filtered and sorted rows, before paging
    pub fn filtered(&self, transactions: &[Transaction]) -> Vec<DisplayTransaction> {
        let mut rows: Vec<DisplayTransaction> = normalize(transactions)
            .into_iter()
            .filter(|t| self.filters.matches(t))
            .collect();
        rows.sort_by(|a, b| self.sort_dir.apply(compare_display(self.sort_key, a, b)));
        rows
    }

    /// Render one page; the page number is clamped into `[1, pages]`
    pub fn render(&self, transactions: &[Transaction]) -> PageView {
        let rows = self.filtered(transactions);
        let total = rows.len();
        let size = self.page_size.max(1);
        let pages = page_count(total, size);
        let page = self.page.clamp(1, pages);
        let start = (page - 1) * size;

        PageView {
            rows: rows.into_iter().skip(start).take(size).collect(),
            total,
            pages,
            page,
            page_size: size,
        }
    }

    /// Keep the clamped page from a render
    pub fn settle(&mut self, view: &PageView) {
        self.page = view.page;
    }
}

fn page_count(total: usize, size: usize) -> usize {
    total.div_ceil(size.max(1)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, date: &str, kind: &str, category: &str, amount: f64, notes: &str) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": id, "date": date, "type": kind, "category": category,
            "amount": amount, "notes": notes
        }))
        .unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("1", "2024-01-10", "expense", "Food", 200.0, "Lunch with team"),
            tx("2", "2024-01-02", "income", "Salary", 50000.0, ""),
            tx("3", "2024-02-05", "expense", "Food", 35.5, "groceries"),
            tx("4", "2023-12-31", "expense", "Rent", 10000.0, "December rent"),
            tx("5", "not a date", "income", "Gift", 500.0, "from grandma"),
        ]
    }

    fn ids(rows: &[DisplayTransaction]) -> Vec<&str> {
        rows.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_normalize_uses_magnitude_and_note_fallback() {
        let rows = normalize(&sample());
        assert_eq!(rows[0].amount, 200.0);
        assert_eq!(rows[0].kind, TxnType::Expense);
        // Empty notes fall back to the stored description (the category here)
        assert_eq!(rows[1].notes, "Salary");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(&sample());
        let again: Vec<DisplayTransaction> = once
            .iter()
            .map(|d| {
                let stored: Transaction = serde_json::from_value(serde_json::to_value(d).unwrap()).unwrap();
                DisplayTransaction::from_transaction(&stored)
            })
            .collect();
        assert_eq!(once, again);
    }

    #[test]
    fn test_default_sort_is_date_desc() {
        let state = ViewState::default();
        let rows = state.filtered(&sample());
        assert_eq!(ids(&rows), vec!["3", "1", "2", "4", "5"]);
    }

    #[test]
    fn test_search_matches_notes_or_category() {
        let mut state = ViewState::default();
        state.set_query("FOOD");
        assert_eq!(ids(&state.filtered(&sample())), vec!["3", "1"]);

        state.set_query("grand");
        assert_eq!(ids(&state.filtered(&sample())), vec!["5"]);
    }

    #[test]
    fn test_type_and_category_filters() {
        let mut state = ViewState::default();
        state.set_kind(Some(TxnType::Income));
        assert_eq!(ids(&state.filtered(&sample())), vec!["2", "5"]);

        state.clear_filters();
        state.set_category(Some("food".to_string()));
        assert!(state.filtered(&sample()).is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive_and_drops_bad_dates() {
        let mut state = ViewState::default();
        state.set_from(NaiveDate::from_ymd_opt(2024, 1, 2));
        state.set_to(NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(ids(&state.filtered(&sample())), vec!["1", "2"]);
    }

    #[test]
    fn test_amount_sort_is_numeric() {
        let mut state = ViewState::default();
        state.toggle_sort(SortField::Amount);
        assert_eq!(state.sort_dir, SortOrder::Asc);
        assert_eq!(ids(&state.filtered(&sample())), vec!["3", "1", "5", "4", "2"]);
    }

    #[test]
    fn test_toggle_sort_flips_same_key() {
        let mut state = ViewState::default();
        state.toggle_sort(SortField::Date);
        assert_eq!(state.sort_dir, SortOrder::Asc);
        state.toggle_sort(SortField::Date);
        assert_eq!(state.sort_dir, SortOrder::Desc);
        state.toggle_sort(SortField::Category);
        assert_eq!((state.sort_key, state.sort_dir), (SortField::Category, SortOrder::Asc));
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut state = ViewState::new(2);
        state.page = 3;
        state.set_query("x");
        assert_eq!(state.page, 1);

        state.page = 3;
        state.set_page_size(10);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_render_clamps_page() {
        let mut state = ViewState::new(2);
        state.page = 99;
        let view = state.render(&sample());
        assert_eq!((view.total, view.pages, view.page), (5, 3, 3));
        assert_eq!(view.rows.len(), 1);

        state.settle(&view);
        assert_eq!(state.page, 3);

        state.page = 0;
        assert_eq!(state.render(&sample()).page, 1);
    }

    #[test]
    fn test_render_empty_has_one_page() {
        let view = ViewState::default().render(&[]);
        assert_eq!((view.total, view.pages, view.page), (0, 1, 1));
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_paging_covers_filtered_total() {
        let txs = sample();
        for size in 1..=6 {
            let mut state = ViewState::new(size);
            let first = state.render(&txs);
            let mut seen = 0;
            for page in 1..=first.pages {
                state.page = page;
                let view = state.render(&txs);
                assert!(view.rows.len() <= size);
                seen += view.rows.len();
            }
            assert_eq!(seen, first.total);
        }
    }

    #[test]
    fn test_next_and_prev_page_stay_in_bounds() {
        let mut state = ViewState::new(2);
        state.prev_page();
        assert_eq!(state.page, 1);
        state.next_page(5);
        state.next_page(5);
        state.next_page(5);
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_from_params() {
        let params: HashMap<String, String> = [
            ("q", "food"),
            ("type", "expense"),
            ("from", "2024-01-01"),
            ("sortKey", "amount"),
            ("sortDir", "asc"),
            ("page", "2"),
            ("pageSize", "10"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let state = ViewState::from_params(&params, 25).unwrap();
        assert_eq!(state.filters.q, "food");
        assert_eq!(state.filters.kind, Some(TxnType::Expense));
        assert_eq!(state.filters.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(state.sort_key, SortField::Amount);
        assert_eq!(state.sort_dir, SortOrder::Asc);
        assert_eq!((state.page, state.page_size), (2, 10));
    }

    #[test]
    fn test_from_params_rejects_bad_values() {
        let params: HashMap<String, String> =
            [("from".to_string(), "soon".to_string())].into_iter().collect();
        assert!(ViewState::from_params(&params, 25).is_err());

        let params: HashMap<String, String> =
            [("type".to_string(), "transfer".to_string())].into_iter().collect();
        assert!(ViewState::from_params(&params, 25).is_err());
    }
}
