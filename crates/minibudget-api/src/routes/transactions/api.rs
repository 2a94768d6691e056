//! Transactions API endpoints - JSON API
//!
//! Endpoints:
//! - api_transactions: filtered and sorted list
//! - api_transaction_create: add one transaction
//! - api_transaction_update: merge fields into one transaction
//! - api_transaction_delete: remove by id
//! - api_summary: income, expense and balance
//! - api_export: CSV download
//! - api_clear: remove everything
//! - api_import: create transactions from a CSV or JSON body

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use minibudget_core::{ErrorContext, ImportFormat, ImportReport, Summary, Transaction, TransactionInput, TransactionQuery};
use std::collections::HashMap;

fn with_id(operation: &str, id: &str) -> ErrorContext {
    ErrorContext::new(operation).with_data("id", serde_json::json!(id))
}

fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true }))
}

fn payload(body: Result<Json<TransactionInput>, JsonRejection>, operation: &str) -> ApiResult<TransactionInput> {
    body.map(|Json(input)| input).map_err(|e| {
        ApiError::BadRequest {
            message: e.body_text(),
        }
        .logged(operation)
    })
}

/// List transactions (JSON API)
///
/// Query: category, min, max, sortBy, order
pub async fn api_transactions(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let query = TransactionQuery::from_params(&params).map_err(|e| ApiError::from(e).logged("list"))?;

    let ledger = state.ledger.read().await;
    let transactions = ledger.list(&query).await.map_err(|e| ApiError::from(e).logged("list"))?;
    Ok(Json(transactions))
}

/// Create a transaction (JSON API)
pub async fn api_transaction_create(
    state: axum::extract::State<AppState>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<Json<Transaction>> {
    let input = payload(body, "create")?;

    let mut ledger = state.ledger.write().await;
    let created = ledger.create(input).await.map_err(|e| ApiError::from(e).logged("create"))?;
    Ok(Json(created))
}

/// Update a transaction (JSON API)
pub async fn api_transaction_update(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<Json<Transaction>> {
    let patch = payload(body, "update")?;

    let mut ledger = state.ledger.write().await;
    let updated = ledger
        .update(&id, patch)
        .await
        .map_err(|e| ApiError::from(e).logged_with(&with_id("update", &id)))?;
    Ok(Json(updated))
}

/// Delete a transaction (JSON API); unknown ids succeed too
pub async fn api_transaction_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let mut ledger = state.ledger.write().await;
    ledger
        .delete(&id)
        .await
        .map_err(|e| ApiError::from(e).logged_with(&with_id("delete", &id)))?;
    Ok(success())
}

/// Income, expense and balance (JSON API)
pub async fn api_summary(state: axum::extract::State<AppState>) -> ApiResult<Json<Summary>> {
    let ledger = state.ledger.read().await;
    let summary = ledger.summary().await.map_err(|e| ApiError::from(e).logged("summary"))?;
    Ok(Json(summary))
}

/// CSV download of every transaction
pub async fn api_export(state: axum::extract::State<AppState>) -> ApiResult<impl IntoResponse> {
    let ledger = state.ledger.read().await;
    let csv = ledger.export_csv().await.map_err(|e| ApiError::from(e).logged("export"))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", state.config.export.file_name),
        ),
    ];
    Ok((headers, csv))
}

/// Remove every transaction (JSON API)
pub async fn api_clear(state: axum::extract::State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let mut ledger = state.ledger.write().await;
    ledger.clear().await.map_err(|e| ApiError::from(e).logged("clear"))?;
    Ok(success())
}

/// Import a raw CSV or JSON body
///
/// Query: format (`csv` or `json`, default `csv`)
pub async fn api_import(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
    body: String,
) -> ApiResult<Json<ImportReport>> {
    let format = match params.get("format").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<ImportFormat>()
            .map_err(|message| ApiError::BadRequest { message }.logged("import"))?,
        None => ImportFormat::default(),
    };

    let mut ledger = state.ledger.write().await;
    let report = ledger
        .import_content(&body, format)
        .await
        .map_err(|e| {
            let context = ErrorContext::new("import").with_data("format", serde_json::json!(format.to_string()));
            ApiError::from(e).logged_with(&context)
        })?;
    Ok(Json(report))
}
