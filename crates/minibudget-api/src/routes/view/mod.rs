//! Transaction table view - filtered, sorted and paged rows

pub mod api;

pub use api::api_view;
