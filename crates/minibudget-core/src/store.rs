//! Whole-document transaction storage
//!
//! The collection is always read and written as one JSON array. There is no
//! locking here; callers that share a store must serialize their
//! read-modify-write cycles (the API does this with the ledger's write lock).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;

/// Store reference type
pub type StoreRef = Arc<dyn TransactionStore>;

/// Storage backend for the full transaction collection
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Load every transaction; an absent store yields an empty collection
    async fn load(&self) -> CoreResult<Vec<Transaction>>;

    /// Replace the whole persisted collection
    async fn save(&self, transactions: &[Transaction]) -> CoreResult<()>;

    /// Human-readable location for log messages
    fn location(&self) -> String;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TransactionStore for JsonFileStore {
    async fn load(&self) -> CoreResult<Vec<Transaction>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                log::error!("Failed to read {}: {}", self.path.display(), e);
                return Err(CoreError::IoError);
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut transactions: Vec<Transaction> =
            serde_json::from_str(&content).map_err(|e| CoreError::InvalidFormat {
                message: format!("{}: {}", self.path.display(), e),
            })?;

        // Records written without an id get one once, persisted so later loads agree
        let mut assigned = 0;
        for transaction in transactions.iter_mut().filter(|t| t.id.is_empty()) {
            transaction.id = minibudget_utils::generate_id();
            assigned += 1;
        }
        if assigned > 0 {
            log::info!("Assigned ids to {} record(s) in {}", assigned, self.path.display());
            self.save(&transactions).await?;
        }

        Ok(transactions)
    }

    async fn save(&self, transactions: &[Transaction]) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_string_pretty(transactions).map_err(|e| CoreError::InternalError {
            message: e.to_string(),
        })?;

        // Write beside the target and rename so readers never see a partial file
        let temp = self.temp_path();
        tokio::fs::write(&temp, body).await.map_err(|e| {
            log::error!("Failed to write {}: {}", temp.display(), e);
            CoreError::IoError
        })?;
        tokio::fs::rename(&temp, &self.path).await.map_err(|e| {
            log::error!("Failed to replace {}: {}", self.path.display(), e);
            CoreError::IoError
        })?;

        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn load(&self) -> CoreResult<Vec<Transaction>> {
        self.transactions
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| CoreError::InternalError { message: "memory store poisoned".to_string() })
    }

    async fn save(&self, transactions: &[Transaction]) -> CoreResult<()> {
        let mut guard = self
            .transactions
            .lock()
            .map_err(|_| CoreError::InternalError { message: "memory store poisoned".to_string() })?;
        *guard = transactions.to_vec();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionInput;
    use crate::types::TxnType;

    fn sample(id: &str, amount: f64) -> Transaction {
        Transaction::from(TransactionInput {
            id: Some(crate::models::FlexId::Text(id.to_string())),
            date: Some("2024-01-01".to_string()),
            category: Some("Food".to_string()),
            amount: Some(crate::models::FlexAmount::Number(amount)),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(JsonFileStore::new(path).load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("data.json"));
        let txs = vec![sample("a", -10.0), sample("b", 25.0)];

        store.save(&txs).await.unwrap();
        assert_eq!(store.load().await.unwrap(), txs);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));

        store.save(&[sample("a", 1.0), sample("b", 2.0)]).await.unwrap();
        store.save(&[sample("c", 3.0)]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[tokio::test]
    async fn test_saved_file_is_pretty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        store.save(&[sample("a", -1.0)]).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("[\n  {"));
        assert!(raw.contains("\"type\": \"expense\""));
    }

    #[tokio::test]
    async fn test_legacy_file_is_normalized_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"id": 1712000000000, "date": "2024-04-01", "type": "expense", "category": "Rent", "amount": 10000, "notes": "", "recurring": false, "description": "Rent"}]"#,
        )
        .unwrap();

        let loaded = JsonFileStore::new(path).load().await.unwrap();
        assert_eq!(loaded[0].id, "1712000000000");
        assert_eq!(loaded[0].kind, TxnType::Expense);
        assert_eq!(loaded[0].amount, -10000.0);
    }

    #[tokio::test]
    async fn test_records_without_ids_keep_the_same_ids_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"date": "2024-04-01", "category": "Rent", "amount": -100}, {"id": "", "date": "2024-04-02", "category": "Pay", "amount": 50}]"#,
        )
        .unwrap();
        let store = JsonFileStore::new(path);

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();

        assert!(first.iter().all(|t| !t.id.is_empty()));
        assert_ne!(first[0].id, first[1].id);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_file_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::default();
        store.save(&[sample("a", 1.0)]).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
        assert_eq!(store.location(), "memory");
    }
}
