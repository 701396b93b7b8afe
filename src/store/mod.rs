//! Store client capability over the external item store.
//!
//! Both services talk to the managed key-value store exclusively through the
//! [StoreClient] trait defined here. Every call is a single round trip; the
//! store offers no retries and no transactions spanning calls, which is why
//! the ledger's dual writes are explicitly best-effort (see
//! `services::transaction_service`).
//!
//! # Data model
//!
//! Items are schemaless JSON documents addressed by a partition key and an
//! optional sort key, declared per table at [connect] time. Updates are
//! single-item atomic expressions ([Update]); read-modify-write from the
//! service layer is not allowed because concurrent requests would race on
//! the user's embedded transaction list.

pub mod memory;
pub mod timeout;

use std::{cmp::Ordering, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::Config;

/// A stored document: attribute name to JSON value.
pub type Item = serde_json::Map<String, Value>;

/// Addresses a single item within a table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Key {
    /// Partition key value (e.g. `userId`).
    pub partition: String,
    /// Sort key value, for tables with a composite key (e.g. `transactionId`).
    pub sort: Option<String>,
}

impl Key {
    /// Key for a table addressed by partition key alone.
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }

    /// Key for a table addressed by partition key and sort key.
    pub fn with_sort(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }
}

/// Key schema for one table, registered when the store is connected.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Attribute holding the partition key value.
    pub partition_attr: String,
    /// Attribute holding the sort key value, if the table has one.
    pub sort_attr: Option<String>,
}

/// A single-item atomic update expression.
///
/// Each variant is applied in one store round trip against one item.
/// List variants operate on a list-valued attribute and are the only
/// sanctioned way to mutate the user's embedded transaction mirror.
#[derive(Debug, Clone)]
pub enum Update {
    /// Set (or overwrite) the given attributes, leaving others untouched.
    Set(Item),
    /// Append values to a list attribute (the store's native list_append).
    ListAppend { attr: String, values: Vec<Value> },
    /// Remove every list element whose `field` equals `equals`.
    ListRemove {
        attr: String,
        field: String,
        equals: Value,
    },
    /// Replace the list element whose `field` equals `equals` with `value`.
    /// Leaves the list unchanged when no element matches.
    ListReplace {
        attr: String,
        field: String,
        equals: Value,
        value: Value,
    },
}

/// Server-side filter condition for query and scan.
///
/// Comparisons are defined for strings (lexicographic) and numbers. ISO-8601
/// date strings in a fixed format compare lexicographically in chronological
/// order, which is what the date-range filters rely on. A condition on an
/// attribute the item does not carry never matches.
#[derive(Debug, Clone)]
pub enum Condition {
    Eq(String, Value),
    Ne(String, Value),
    Gte(String, Value),
    Between(String, Value, Value),
}

impl Condition {
    /// Whether `item` satisfies this condition.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Condition::Eq(attr, value) => item.get(attr) == Some(value),
            Condition::Ne(attr, value) => {
                item.get(attr).is_some_and(|actual| actual != value)
            }
            Condition::Gte(attr, value) => item.get(attr).is_some_and(|actual| {
                compare_values(actual, value)
                    .is_some_and(|ordering| ordering != Ordering::Less)
            }),
            Condition::Between(attr, low, high) => item.get(attr).is_some_and(|actual| {
                compare_values(actual, low)
                    .is_some_and(|ordering| ordering != Ordering::Less)
                    && compare_values(actual, high)
                        .is_some_and(|ordering| ordering != Ordering::Greater)
            }),
        }
    }
}

/// Ordering between two JSON values of the same comparable kind.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

/// One page of scan results.
///
/// `next_cursor` is an opaque token; pass it back to [StoreClient::scan] to
/// continue. `None` means the scan is exhausted.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Item>,
    pub next_cursor: Option<String>,
}

/// Errors surfaced by the store client.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The named table was never registered with the store.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// An update addressed a key with no item behind it. Updates never
    /// create records; callers decide whether absence is an error.
    #[error("item not found")]
    ItemNotFound,

    /// The per-call deadline elapsed before the store answered.
    #[error("store call timed out")]
    Timeout,

    /// The item or update was malformed (e.g. missing key attributes,
    /// list operation against a non-list attribute).
    #[error("malformed request: {0}")]
    Malformed(String),

    /// The store rejected or lost the call for an unspecified reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Thin capability interface over the external key-value store.
///
/// Each method maps to exactly one round trip. No retries happen here:
/// every failure is surfaced immediately to the calling service, which
/// translates it into the application error taxonomy.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Point read. `None` when no item exists at `key`.
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError>;

    /// Unconditional write. Overwrites any existing item at the same key.
    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError>;

    /// Apply a single-item atomic update and return the post-update item.
    ///
    /// Fails with [StoreError::ItemNotFound] when the key addresses no
    /// item; an update never creates a partial record.
    async fn update(&self, table: &str, key: &Key, update: Update) -> Result<Item, StoreError>;

    /// Point delete. Deleting an absent key is a no-op, as in the store's
    /// native semantics; callers needing existence perform a get first.
    async fn delete(&self, table: &str, key: &Key) -> Result<(), StoreError>;

    /// All items in one partition satisfying every condition, in sort-key
    /// order.
    async fn query(
        &self,
        table: &str,
        partition: &str,
        conditions: &[Condition],
    ) -> Result<Vec<Item>, StoreError>;

    /// Paginated full-table scan with server-side filtering and optional
    /// projection to a subset of attributes.
    async fn scan(
        &self,
        table: &str,
        conditions: &[Condition],
        projection: Option<&[&str]>,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError>;

    /// Release the client. Called once during graceful shutdown.
    async fn shutdown(&self) -> Result<(), StoreError>;
}

/// Build the process-wide store client.
///
/// Called exactly once at startup; the handle is then shared through
/// application state. There is no implicit global and no lazy
/// initialization from arbitrary call sites. The engine is wrapped in a
/// per-call timeout decorator so a hung store surfaces
/// [StoreError::Timeout] instead of stalling the request.
pub fn connect(config: &Config) -> Arc<dyn StoreClient> {
    let engine = memory::MemoryStore::new(vec![
        TableSchema {
            name: config.users_table.clone(),
            partition_attr: "userId".to_string(),
            sort_attr: None,
        },
        TableSchema {
            name: config.transactions_table.clone(),
            partition_attr: "userId".to_string(),
            sort_attr: Some("transactionId".to_string()),
        },
    ]);

    let deadline = Duration::from_millis(config.store_timeout_ms);
    Arc::new(timeout::WithTimeout::new(engine, deadline))
}

/// Serialize a model into a store item.
///
/// Fails when the model does not serialize to a JSON object, which would
/// indicate a programming error in the model definitions.
pub fn to_item<T: Serialize>(value: &T) -> Result<Item, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("model did not serialize to an object")),
    }
}

/// Deserialize a store item into a model.
pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(item))
}
