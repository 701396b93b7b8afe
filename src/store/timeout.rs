//! Per-call timeout decorator for store clients.
//!
//! The underlying store has no deadline of its own, so every call is raced
//! against a configured duration here, at the store client boundary. A call
//! that does not finish in time surfaces [StoreError::Timeout], which the
//! error layer maps to HTTP 408 rather than a misleading 404.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use super::{Condition, Item, Key, Page, StoreClient, StoreError, Update};

/// Wraps any [StoreClient] and imposes a deadline on each call.
pub struct WithTimeout<S> {
    inner: S,
    deadline: Duration,
}

impl<S> WithTimeout<S> {
    pub fn new(inner: S, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout),
        }
    }
}

#[async_trait]
impl<S: StoreClient> StoreClient for WithTimeout<S> {
    async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
        self.timed(self.inner.get(table, key)).await
    }

    async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
        self.timed(self.inner.put(table, item)).await
    }

    async fn update(&self, table: &str, key: &Key, update: Update) -> Result<Item, StoreError> {
        self.timed(self.inner.update(table, key, update)).await
    }

    async fn delete(&self, table: &str, key: &Key) -> Result<(), StoreError> {
        self.timed(self.inner.delete(table, key)).await
    }

    async fn query(
        &self,
        table: &str,
        partition: &str,
        conditions: &[Condition],
    ) -> Result<Vec<Item>, StoreError> {
        self.timed(self.inner.query(table, partition, conditions))
            .await
    }

    async fn scan(
        &self,
        table: &str,
        conditions: &[Condition],
        projection: Option<&[&str]>,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page, StoreError> {
        self.timed(self.inner.scan(table, conditions, projection, cursor, limit))
            .await
    }

    async fn shutdown(&self) -> Result<(), StoreError> {
        // Shutdown is allowed to take as long as it needs.
        self.inner.shutdown().await
    }
}
