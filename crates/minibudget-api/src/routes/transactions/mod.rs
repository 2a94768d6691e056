//! Transaction routes - CRUD, summary, export, clear and import
//!
//! Structure:
//! - api.rs: JSON API endpoints

pub mod api;

pub use api::{
    api_clear,
    api_export,
    api_import,
    api_summary,
    api_transaction_create,
    api_transaction_delete,
    api_transaction_update,
    api_transactions,
};
