//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `Transaction`: the authoritative ledger entity
//! - `TransactionSummary`: the denormalized entry embedded in a user record
//! - Request types for the add/get/delete/update operations
//! - `WriteOutcome`: the recorded result of the ledger's dual writes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction as stored in the `Transactions` table.
///
/// # Addressing
///
/// Every transaction belongs to exactly one user. The `(userId,
/// transactionId)` pair is the composite key for all point operations;
/// `transactionId` is unique within the user's partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Owning user's identifier (partition key)
    pub user_id: Uuid,

    /// Time-derived token with a random suffix (sort key)
    pub transaction_id: String,

    pub title: String,

    /// Numeric magnitude. Sign and range are not validated; the
    /// `transactionType` tag carries the income/expense meaning.
    pub amount: f64,

    pub description: String,

    pub category: String,

    /// Calendar date of the transaction (ISO 8601 `YYYY-MM-DD` on the wire)
    pub date: NaiveDate,

    /// Enumerated tag, e.g. "income" or "expense". Stored as given; the
    /// set of tags is not exhaustively validated.
    pub transaction_type: String,

    /// Client-supplied deduplication token, if any. A repeated add with
    /// the same key returns the original transaction instead of writing a
    /// duplicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

/// The denormalized copy of a transaction embedded in the owning user's
/// `transactions` list.
///
/// This is a cache for fast access, not a source of truth: after a partial
/// failure of the ledger's dual writes it may lag the `Transactions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub transaction_id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub transaction_type: String,
}

impl From<&Transaction> for TransactionSummary {
    fn from(transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.transaction_id.clone(),
            title: transaction.title.clone(),
            amount: transaction.amount,
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            date: transaction.date,
            transaction_type: transaction.transaction_type.clone(),
        }
    }
}

/// Recorded result of the ledger's two independent writes.
///
/// The authoritative write and the mirror update are separate store calls
/// with no transaction spanning them. When the first succeeds and the
/// second fails the service does not roll back; it records the gap here so
/// callers (and tests) can observe the partial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The `Transactions` table write was applied.
    pub primary_written: bool,
    /// The embedded mirror in the user record was updated.
    pub mirror_written: bool,
}

/// Request body for `POST /api/v1/addTransaction`.
///
/// # JSON Example
///
/// ```json
/// {
///   "userId": "550e8400-e29b-41d4-a716-446655440000",
///   "title": "Coffee",
///   "amount": 5,
///   "description": "Morning espresso",
///   "date": "2024-01-01",
///   "category": "Food",
///   "transactionType": "expense"
/// }
/// ```
///
/// All fields are declared optional so that a missing field reaches the
/// service layer and produces the taxonomy's validation error instead of a
/// framework-level rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    /// Optional deduplication token; repeated adds with the same key are
    /// answered from the existing transaction.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Request body for `POST /api/v1/getTransaction`.
///
/// # Filtering
///
/// - `type`: exact `transactionType` match, or "all" (the default) for no
///   type filter
/// - `frequency`: a number of days counted back from today, or "custom"
/// - `startDate` / `endDate`: required when `frequency` is "custom";
///   inclusive on both ends
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionsRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default, rename = "type")]
    pub type_filter: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Request body for `POST /api/v1/deleteTransaction/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransactionRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Request body for `PUT /api/v1/updateTransaction/{id}`.
///
/// Only the supplied fields are overwritten; absent fields keep their
/// stored values. Unrecognized fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
}
