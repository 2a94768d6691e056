//! View API endpoint - JSON API

use crate::error::ApiResult;
use crate::AppState;
use axum::extract::Query;
use axum::Json;
use minibudget_core::{PageView, ViewState};
use std::collections::HashMap;

/// One page of the transaction table
///
/// Query: q, type, category, from, to, sortKey, sortDir, page, pageSize
pub async fn api_view(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<PageView>> {
    let view_state = ViewState::from_params(&params, state.config.pagination.records_per_page)
        .map_err(|e| crate::ApiError::from(e).logged("view"))?;

    let ledger = state.ledger.read().await;
    let page = ledger.view(&view_state).await.map_err(|e| crate::ApiError::from(e).logged("view"))?;
    Ok(Json(page))
}
