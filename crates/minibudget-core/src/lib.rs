//! Core transaction processing and business logic

pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod query;
pub mod reports;
pub mod store;
pub mod types;
pub mod view;

use minibudget_config::Config;
use minibudget_parser::ImportRecord;
use std::path::PathBuf;
use std::sync::Arc;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, ErrorSeverity};
pub use import::ImportReport;
pub use minibudget_parser::{DefaultImportParser, ImportFormat, ParserRef};
pub use models::{Summary, Transaction, TransactionInput};
pub use query::TransactionQuery;
pub use reports::{CategoryTotal, GoalProgress, MonthlyNet};
pub use store::{JsonFileStore, MemoryStore, StoreRef, TransactionStore};
pub use types::{SortField, SortOrder, TxnType};
pub use view::{DisplayTransaction, PageView, ViewFilters, ViewState};

/// Main ledger structure
///
/// Every operation reads the whole collection from the store, and every
/// mutation writes it back. Mutations take `&mut self` so a shared ledger
/// has to be behind a write lock to change it.
pub struct Ledger {
    config: Config,
    store: StoreRef,
    parser: ParserRef,
}

impl Ledger {
    /// Create a new ledger over a store and an import parser
    pub fn new(config: Config, store: StoreRef, parser: ParserRef) -> Self {
        Self { config, store, parser }
    }

    /// Ledger backed by the JSON data file named in the config
    pub fn from_config(config: Config) -> Self {
        let store = Arc::new(JsonFileStore::new(config.data_file()));
        Self::new(config, store, Arc::new(DefaultImportParser))
    }

    /// Where the collection is persisted
    pub fn location(&self) -> String {
        self.store.location()
    }

    // ==================== Queries ====================

    /// Every transaction in file order
    pub async fn all(&self) -> CoreResult<Vec<Transaction>> {
        self.store.load().await
    }

    /// Filtered and sorted transactions
    pub async fn list(&self, query: &TransactionQuery) -> CoreResult<Vec<Transaction>> {
        let transactions = self.store.load().await?;
        let total = transactions.len();
        let result = query.apply(transactions);
        log::debug!("Listed {} of {} transactions", result.len(), total);
        Ok(result)
    }

    pub async fn summary(&self) -> CoreResult<Summary> {
        Summary::of(&self.store.load().await?)
    }

    pub async fn export_csv(&self) -> CoreResult<String> {
        export::export_csv(&self.store.load().await?)
    }

    /// Render one page of the transaction table
    pub async fn view(&self, state: &ViewState) -> CoreResult<PageView> {
        let transactions = self.store.load().await?;
        let page = state.render(&transactions);
        log::debug!("View page {}/{} ({} matching)", page.page, page.pages, page.total);
        Ok(page)
    }

    // ==================== Mutations ====================

    /// Validate, normalize and append a transaction
    pub async fn create(&mut self, input: TransactionInput) -> CoreResult<Transaction> {
        let missing = input.missing_required();
        if !missing.is_empty() {
            log::warn!("Rejected transaction, missing {}", missing.join(", "));
            return Err(CoreError::ValidationError {
                fields: missing.into_iter().map(str::to_string).collect(),
            });
        }

        let mut transaction = Transaction::from(input);
        if transaction.id.is_empty() {
            transaction.id = minibudget_utils::generate_id();
        }
        let mut transactions = self.store.load().await?;
        transactions.push(transaction.clone());
        self.store.save(&transactions).await?;

        log::info!("Created transaction {} ({} {})", transaction.id, transaction.kind, transaction.amount);
        Ok(transaction)
    }

    /// Merge a partial update into the transaction with `id`
    pub async fn update(&mut self, id: &str, patch: TransactionInput) -> CoreResult<Transaction> {
        let mut transactions = self.store.load().await?;
        let Some(slot) = transactions.iter_mut().find(|t| t.id == id) else {
            return Err(CoreError::TransactionNotFound { id: id.to_string() });
        };

        let updated = slot.merged(&patch);
        *slot = updated.clone();
        self.store.save(&transactions).await?;

        log::info!("Updated transaction {}", id);
        Ok(updated)
    }

    /// Remove every transaction with `id`; returns whether anything was removed
    pub async fn delete(&mut self, id: &str) -> CoreResult<bool> {
        let mut transactions = self.store.load().await?;
        let before = transactions.len();
        transactions.retain(|t| t.id != id);

        let removed = before - transactions.len();
        if removed == 0 {
            log::debug!("Delete of unknown transaction {}", id);
            return Ok(false);
        }

        self.store.save(&transactions).await?;
        log::info!("Deleted {} transaction(s) with id {}", removed, id);
        Ok(true)
    }

    /// Remove every transaction
    pub async fn clear(&mut self) -> CoreResult<()> {
        self.store.save(&[]).await?;
        log::info!("Cleared all transactions in {}", self.store.location());
        Ok(())
    }

    // ==================== Import ====================

    /// Create each row in turn, stopping at the first failure
    pub async fn import_records(&mut self, records: Vec<ImportRecord>) -> ImportReport {
        let today = import::today();
        let mut report = ImportReport::default();

        for record in records {
            let row = record.row;
            match self.create(import::record_to_input(record, &today)).await {
                Ok(_) => report.created += 1,
                Err(e) => {
                    log::warn!("Import stopped at row {}: {}", row, e);
                    report.failed_row = Some(row);
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }

        log::info!("Imported {} transaction(s)", report.created);
        report
    }

    /// Import a document held in memory
    pub async fn import_content(&mut self, content: &str, format: ImportFormat) -> CoreResult<ImportReport> {
        let records = self.parser.parse(content, format).await.map_err(|e| {
            log::warn!("Import of {} content failed to parse: {}", format, e);
            CoreError::from(e)
        })?;
        Ok(self.import_records(records).await)
    }

    /// Import a file; the format follows the extension unless given
    pub async fn import_file(&mut self, path: PathBuf, format: Option<ImportFormat>) -> CoreResult<ImportReport> {
        let records = self.parser.parse_file(path.clone(), format).await.map_err(|e| {
            log::warn!("Import of {} failed: {}", path.display(), e);
            CoreError::from(e)
        })?;
        Ok(self.import_records(records).await)
    }

    // ==================== Reports ====================

    pub async fn category_breakdown(&self) -> CoreResult<Vec<CategoryTotal>> {
        Ok(reports::category_breakdown(&self.store.load().await?))
    }

    pub async fn monthly_net(&self) -> CoreResult<Vec<MonthlyNet>> {
        Ok(reports::monthly_net(&self.store.load().await?))
    }

    /// Spending for `month` (default: current month) against `goal`
    /// (default: the configured monthly goal)
    pub async fn goal_progress(&self, goal: Option<f64>, month: Option<&str>) -> CoreResult<GoalProgress> {
        let goal = goal.unwrap_or(self.config.budget.monthly_goal);
        if goal.is_nan() || goal < 0.0 {
            return Err(CoreError::InvalidQuery {
                param: "goal".to_string(),
                message: "must be zero or more".to_string(),
            });
        }

        let month = match month {
            Some(m) => models::parse_date(&format!("{}-01", m))
                .map(|d| d.format("%Y-%m").to_string())
                .ok_or_else(|| CoreError::InvalidQuery {
                    param: "month".to_string(),
                    message: format!("'{}' is not a YYYY-MM month", m),
                })?,
            None => chrono::Utc::now().date_naive().format("%Y-%m").to_string(),
        };

        let transactions = self.store.load().await?;
        let spent = reports::month_expense(&transactions, &month);
        Ok(reports::goal_progress(&month, goal, spent))
    }
}
