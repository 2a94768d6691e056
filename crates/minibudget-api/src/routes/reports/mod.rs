//! Report routes - category breakdown, monthly net and goal progress

pub mod api;

pub use api::{api_report_categories, api_report_goal, api_report_monthly};
