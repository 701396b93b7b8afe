//! In-process item store engine.
//!
//! Faithful stand-in for the managed store the deployment talks to: items
//! are JSON documents keyed by partition (and optional sort) key, updates
//! are atomic per item, and nothing is transactional across two calls. The
//! engine holds everything behind one async `RwLock`, so a single `update`
//! (including list appends onto the user mirror) can never interleave with
//! another writer. Any real backend implements the same [StoreClient]
//! trait.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Condition, Item, Key, Page, StoreClient, StoreError, TableSchema, Update};

/// Composite lookup key: partition value plus optional sort value.
type CompositeKey = (String, Option<String>);

struct Table {
    schema: TableSchema,
    items: BTreeMap<CompositeKey, Item>,
}

/// Item store held entirely in process memory.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Create the store with its table schemas declared up front.
    pub fn new(schemas: Vec<TableSchema>) -> Self {
        let tables = schemas
            .into_iter()
            .map(|schema| {
                (
                    schema.name.clone(),
                    Table {
                        schema,
                        items: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            tables: RwLock::new(tables),
        }
    }
}

/// Read a key attribute off an item as a string.
fn key_attr(item: &Item, attr: &str) -> Result<String, StoreError> {
    item.get(attr)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::Malformed(format!("missing key attribute {attr}")))
}

/// Derive an item's composite key from the table schema.
fn item_key(schema: &TableSchema, item: &Item) -> Result<CompositeKey, StoreError> {
    let partition = key_attr(item, &schema.partition_attr)?;
    let sort = match &schema.sort_attr {
        Some(attr) => Some(key_attr(item, attr)?),
        None => None,
    };
    Ok((partition, sort))
}

/// Check a caller-supplied key against the table's key schema.
fn check_key(schema: &TableSchema, key: &Key) -> Result<CompositeKey, StoreError> {
    match (&schema.sort_attr, &key.sort) {
        (Some(_), Some(sort)) => Ok((key.partition.clone(), Some(sort.clone()))),
        (None, None) => Ok((key.partition.clone(), None)),
        (Some(attr), None) => Err(StoreError::Malformed(format!(
            "table requires sort key {attr}"
        ))),
        (None, Some(_)) => Err(StoreError::Malformed(
            "table has no sort key".to_string(),
        )),
    }
}

/// Apply an atomic update expression to one item.
fn apply_update(item: &mut Item, update: Update) -> Result<(), StoreError> {
    match update {
        Update::Set(fields) => {
            for (attr, value) in fields {
                item.insert(attr, value);
            }
        }
        Update::ListAppend { attr, values } => {
            let list = list_attr(item, &attr)?;
            list.extend(values);
        }
        Update::ListRemove { attr, field, equals } => {
            let list = list_attr(item, &attr)?;
            list.retain(|element| element.get(&field) != Some(&equals));
        }
        Update::ListReplace {
            attr,
            field,
            equals,
            value,
        } => {
            let list = list_attr(item, &attr)?;
            if let Some(element) = list
                .iter_mut()
                .find(|element| element.get(&field) == Some(&equals))
            {
                *element = value;
            }
        }
    }
    Ok(())
}

/// Borrow a list-valued attribute mutably, failing when there is no list
/// at `attr` (the native list operations do the same).
fn list_attr<'a>(item: &'a mut Item, attr: &str) -> Result<&'a mut Vec<Value>, StoreError> {
    item.get_mut(attr)
        .and_then(Value::as_array_mut)
        .ok_or_else(|| StoreError::Malformed(format!("attribute {attr} is not a list")))
}

/// Project an item down to a subset of attributes. Absent attributes are
/// simply omitted, as in the store's native projection expressions.
fn project(item: &Item, projection: Option<&[&str]>) -> Item {
    match projection {
        None => item.clone(),
        Some(attrs) => attrs
            .iter()
            .filter_map(|attr| item.get(*attr).map(|value| ((*attr).to_string(), value.clone())))
            .collect(),
    }
}

/// Encode the last evaluated key as an opaque scan cursor.
fn encode_cursor(key: &CompositeKey) -> String {
    // Infallible: a (String, Option<String>) tuple always serializes.
    serde_json::to_string(key).unwrap_or_default()
}

fn decode_cursor(cursor: &str) -> Result<CompositeKey, StoreError> {
    serde_json::from_str(cursor)
        .map_err(|_| StoreError::Malformed("invalid scan cursor".to_string()))
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let composite = check_key(&table.schema, key)?;
        Ok(table.items.get(&composite).cloned())
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let composite = item_key(&table.schema, &item)?;
        table.items.insert(composite, item);
        Ok(())
    }

    async fn update(&self, table: &str, key: &Key, update: Update) -> Result<Item, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let composite = check_key(&table.schema, key)?;
        let item = table
            .items
            .get_mut(&composite)
            .ok_or(StoreError::ItemNotFound)?;

        apply_update(item, update)?;
        Ok(item.clone())
    }

    async fn delete(&self, table: &str, key: &Key) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let composite = check_key(&table.schema, key)?;
        table.items.remove(&composite);
        Ok(())
    }

    async fn query(
        &self,
        table: &str,
        partition: &str,
        conditions: &[Condition],
    ) -> Result<Vec<Item>, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        // BTreeMap keeps items in (partition, sort) order, so results come
        // back sorted by sort key within the partition.
        let items = table
            .items
            .iter()
            .filter(|((p, _), _)| p == partition)
            .filter(|(_, item)| conditions.iter().all(|condition| condition.matches(item)))
            .map(|(_, item)| item.clone())
            .collect();

        Ok(items)
    }

    async fn scan(
        &self,
        table: &str,
        conditions: &[Condition],
        projection: Option<&[&str]>,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let range: Box<dyn Iterator<Item = (&CompositeKey, &Item)> + '_> = match cursor {
            Some(cursor) => {
                let start = decode_cursor(cursor)?;
                Box::new(
                    table
                        .items
                        .range((Bound::Excluded(start), Bound::Unbounded)),
                )
            }
            None => Box::new(table.items.iter()),
        };

        let mut items = Vec::new();
        let mut last_key: Option<&CompositeKey> = None;
        let mut next_cursor = None;

        for (key, item) in range {
            if !conditions.iter().all(|condition| condition.matches(item)) {
                continue;
            }
            if items.len() == limit {
                // Another matching item exists past this page, so hand the
                // caller a cursor pointing at the last returned key.
                next_cursor = last_key.map(encode_cursor);
                break;
            }
            items.push(project(item, projection));
            last_key = Some(key);
        }

        Ok(Page { items, next_cursor })
    }

    async fn shutdown(&self) -> Result<(), StoreError> {
        tracing::debug!("memory store shut down");
        Ok(())
    }
}
