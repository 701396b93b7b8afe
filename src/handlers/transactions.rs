//! Ledger HTTP handlers.
//!
//! This module implements the transaction API endpoints:
//! - POST /api/v1/addTransaction - Add a transaction to a user's ledger
//! - POST /api/v1/getTransaction - Fetch a user's transactions, filtered
//! - POST /api/v1/deleteTransaction/{id} - Delete a transaction
//! - PUT /api/v1/updateTransaction/{id} - Update a transaction in place

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::transaction::{
        AddTransactionRequest, DeleteTransactionRequest, GetTransactionsRequest,
        UpdateTransactionRequest,
    },
    services::transaction_service,
    state::AppState,
};

/// Add a transaction.
///
/// # Request Body
///
/// ```json
/// {
///   "userId": "550e8400-...",
///   "title": "Coffee",
///   "amount": 5,
///   "description": "Morning espresso",
///   "date": "2024-01-01",
///   "category": "Food",
///   "transactionType": "expense"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "success": true,
///   "message": "Transaction added successfully",
///   "transaction": { "transactionId": "txn-...", ... }
/// }
/// ```
///
/// A failed mirror write does not fail the request; the ledger write is
/// authoritative and the divergence is logged server-side.
pub async fn add_transaction(
    State(state): State<AppState>,
    Json(request): Json<AddTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (transaction, _outcome) = transaction_service::add_transaction(&state, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Transaction added successfully",
            "transaction": transaction
        })),
    ))
}

/// Fetch a user's transactions with type and date-range filtering.
///
/// A POST carrying the filter parameters in the body, which is what the
/// browser client sends.
pub async fn get_transactions(
    State(state): State<AppState>,
    Json(request): Json<GetTransactionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = transaction_service::get_transactions(&state, request).await?;

    Ok(Json(json!({
        "success": true,
        "transactions": transactions
    })))
}

/// Delete the transaction addressed by the path id.
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(request): Json<DeleteTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    transaction_service::delete_transaction(&state, &transaction_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Transaction successfully deleted"
    })))
}

/// Update the transaction addressed by the path id.
///
/// Overwrites only the supplied fields and returns the full post-update
/// transaction.
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (transaction, _outcome) =
        transaction_service::update_transaction(&state, &transaction_id, request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Transaction updated successfully",
        "transaction": transaction
    })))
}
