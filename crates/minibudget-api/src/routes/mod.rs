//! Route modules for the API server
//!
//! - transactions: CRUD, summary, export, clear, import
//! - view: paged transaction table
//! - reports: dashboard aggregates
//! - settings: active configuration
//!
//! Each module has a mod.rs with its exports and an api.rs with the handlers.

pub mod reports;
pub mod settings;
pub mod transactions;
pub mod view;
