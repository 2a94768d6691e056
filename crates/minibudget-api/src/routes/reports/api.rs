//! Reports API endpoints - JSON API

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::Query;
use axum::Json;
use minibudget_core::{CategoryTotal, CoreError, GoalProgress, MonthlyNet};
use std::collections::HashMap;

pub async fn api_report_categories(state: axum::extract::State<AppState>) -> ApiResult<Json<Vec<CategoryTotal>>> {
    let ledger = state.ledger.read().await;
    let totals = ledger
        .category_breakdown()
        .await
        .map_err(|e| ApiError::from(e).logged("report_categories"))?;
    Ok(Json(totals))
}

pub async fn api_report_monthly(state: axum::extract::State<AppState>) -> ApiResult<Json<Vec<MonthlyNet>>> {
    let ledger = state.ledger.read().await;
    let months = ledger
        .monthly_net()
        .await
        .map_err(|e| ApiError::from(e).logged("report_monthly"))?;
    Ok(Json(months))
}

/// Query: goal (defaults to the configured monthly goal), month (YYYY-MM, defaults to now)
pub async fn api_report_goal(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<GoalProgress>> {
    let goal = match params.get("goal").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<f64>().map_err(|_| {
            ApiError::from(CoreError::InvalidQuery {
                param: "goal".to_string(),
                message: format!("'{}' is not a number", raw),
            })
        })?),
        None => None,
    };
    let month = params.get("month").map(|s| s.trim()).filter(|s| !s.is_empty());

    let ledger = state.ledger.read().await;
    let progress = ledger
        .goal_progress(goal, month)
        .await
        .map_err(|e| ApiError::from(e).logged("report_goal"))?;
    Ok(Json(progress))
}
