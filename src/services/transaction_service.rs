//! Transaction ledger service - Core business logic for the financial ledger.
//!
//! This service owns the `Transactions` table and the denormalized mirror
//! embedded in each user record (`Users.transactions`).
//!
//! # Consistency contract
//!
//! Every mutation is two independent store calls: the authoritative write
//! against `Transactions`, then a single-item atomic list update against
//! the owning user. The store offers no transaction spanning the two, and
//! this service deliberately does not roll back the first write when the
//! second fails. The gap is best-effort by contract: the mirror is a
//! cache, the ledger is the source of truth, and every mutation returns a
//! [WriteOutcome] recording which of the two writes applied. Mirror
//! failures are logged at warn with the ids involved.
//!
//! Mirror updates always go through the store's atomic list expressions
//! (append / remove / replace). Reading the user, editing the list in
//! process, and writing it back would lose updates when two requests for
//! the same user race.

use chrono::{Days, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{
        AddTransactionRequest, DeleteTransactionRequest, GetTransactionsRequest, Transaction,
        TransactionSummary, UpdateTransactionRequest, WriteOutcome,
    },
    state::AppState,
    store::{Condition, Item, Key, StoreError, Update, from_item, to_item},
};

use super::{required, required_text};

const MISSING_FIELDS: &str = "Please fill all fields";
const USER_NOT_FOUND: &str = "User not found";
const TRANSACTION_NOT_FOUND: &str = "Transaction not found";

/// Fail with `NotFound` unless `user_id` addresses an existing user.
async fn require_user(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    state
        .store
        .get(&state.tables.users, &Key::new(user_id.to_string()))
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))
}

/// Generate a transaction id unique per call.
///
/// Wall-clock milliseconds alone would collide under rapid succession, so
/// a random suffix is appended.
fn new_transaction_id() -> String {
    format!(
        "txn-{}-{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

/// Add a transaction to a user's ledger.
///
/// # Process
///
/// 1. Validate required fields
/// 2. Check the owning user exists
/// 3. Answer from the existing transaction if the idempotency key was
///    already used (no writes in that case)
/// 4. Write the transaction item
/// 5. Append a summary to the user's embedded mirror (best-effort)
///
/// # Errors
///
/// - `Validation`: a required field is missing
/// - `NotFound`: the user does not exist
///
/// A failed mirror append is not an error; it is reported through the
/// returned [WriteOutcome].
pub async fn add_transaction(
    state: &AppState,
    request: AddTransactionRequest,
) -> Result<(Transaction, WriteOutcome), AppError> {
    let user_id = required(request.user_id, MISSING_FIELDS)?;
    let title = required_text(request.title, MISSING_FIELDS)?;
    let amount = required(request.amount, MISSING_FIELDS)?;
    let description = required_text(request.description, MISSING_FIELDS)?;
    let date = required(request.date, MISSING_FIELDS)?;
    let category = required_text(request.category, MISSING_FIELDS)?;
    let transaction_type = required_text(request.transaction_type, MISSING_FIELDS)?;

    require_user(state, user_id).await?;

    // A retried request with the same idempotency key returns the
    // transaction it created the first time instead of a duplicate.
    if let Some(ref idempotency_key) = request.idempotency_key {
        let existing = state
            .store
            .query(
                &state.tables.transactions,
                &user_id.to_string(),
                &[Condition::Eq(
                    "idempotencyKey".to_string(),
                    json!(idempotency_key),
                )],
            )
            .await?;

        if let Some(item) = existing.into_iter().next() {
            return Ok((
                from_item(item)?,
                WriteOutcome {
                    primary_written: false,
                    mirror_written: false,
                },
            ));
        }
    }

    let transaction = Transaction {
        user_id,
        transaction_id: new_transaction_id(),
        title,
        amount,
        description,
        category,
        date,
        transaction_type,
        idempotency_key: request.idempotency_key,
    };

    // Authoritative write. A failure here fails the whole operation.
    state
        .store
        .put(&state.tables.transactions, to_item(&transaction)?)
        .await?;

    // Mirror write. Independent of the first and not rolled back on
    // failure; the ledger stays ahead of the user record until repaired.
    let summary = TransactionSummary::from(&transaction);
    let mirror_written = match state
        .store
        .update(
            &state.tables.users,
            &Key::new(user_id.to_string()),
            Update::ListAppend {
                attr: "transactions".to_string(),
                values: vec![serde_json::to_value(&summary)?],
            },
        )
        .await
    {
        Ok(_) => true,
        Err(error) => {
            tracing::warn!(
                %user_id,
                transaction_id = %transaction.transaction_id,
                %error,
                "mirror append failed; user record now lags the ledger"
            );
            false
        }
    };

    Ok((
        transaction,
        WriteOutcome {
            primary_written: true,
            mirror_written,
        },
    ))
}

/// Fetch a user's transactions with type and date filtering.
///
/// # Filtering
///
/// - `type == "all"` (the default): no type filter; anything else must
///   match `transactionType` exactly
/// - `frequency` a number N: only transactions dated on or after today
///   minus N calendar days (the boundary day itself is included)
/// - `frequency == "custom"`: `startDate` and `endDate` are required and
///   the range is inclusive on both ends
///
/// Filters are pushed down to the store as query conditions; the query is
/// scoped to the owning user's partition.
pub async fn get_transactions(
    state: &AppState,
    request: GetTransactionsRequest,
) -> Result<Vec<Transaction>, AppError> {
    let user_id = required(request.user_id, MISSING_FIELDS)?;
    let frequency = required_text(request.frequency, MISSING_FIELDS)?;

    require_user(state, user_id).await?;

    let mut conditions = Vec::new();

    let type_filter = request.type_filter.unwrap_or_else(|| "all".to_string());
    if type_filter != "all" {
        conditions.push(Condition::Eq(
            "transactionType".to_string(),
            json!(type_filter),
        ));
    }

    if frequency == "custom" {
        let start = required(request.start_date, MISSING_FIELDS)?;
        let end = required(request.end_date, MISSING_FIELDS)?;
        conditions.push(Condition::Between(
            "date".to_string(),
            serde_json::to_value(start)?,
            serde_json::to_value(end)?,
        ));
    } else {
        let days: u64 = frequency.parse().map_err(|_| {
            AppError::Validation(
                "frequency must be a number of days or \"custom\"".to_string(),
            )
        })?;
        // Calendar-day subtraction, not fixed 24h multiples.
        let cutoff = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(days))
            .ok_or_else(|| AppError::Validation("frequency is out of range".to_string()))?;
        conditions.push(Condition::Gte(
            "date".to_string(),
            serde_json::to_value(cutoff)?,
        ));
    }

    let items = state
        .store
        .query(&state.tables.transactions, &user_id.to_string(), &conditions)
        .await?;

    let transactions = items
        .into_iter()
        .map(from_item::<Transaction>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// Delete a transaction from a user's ledger.
///
/// The transaction's existence is checked with an explicit get first, so
/// deleting an unknown id fails with `NotFound` and leaves the store
/// unchanged. The mirror removal that follows the delete is best-effort,
/// like the append in [add_transaction].
pub async fn delete_transaction(
    state: &AppState,
    transaction_id: &str,
    request: DeleteTransactionRequest,
) -> Result<WriteOutcome, AppError> {
    let user_id = required(request.user_id, MISSING_FIELDS)?;

    require_user(state, user_id).await?;

    let key = Key::with_sort(user_id.to_string(), transaction_id);
    if state
        .store
        .get(&state.tables.transactions, &key)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
    }

    state.store.delete(&state.tables.transactions, &key).await?;

    let mirror_written = match state
        .store
        .update(
            &state.tables.users,
            &Key::new(user_id.to_string()),
            Update::ListRemove {
                attr: "transactions".to_string(),
                field: "transactionId".to_string(),
                equals: json!(transaction_id),
            },
        )
        .await
    {
        Ok(_) => true,
        Err(error) => {
            tracing::warn!(
                %user_id,
                transaction_id,
                %error,
                "mirror removal failed; user record still lists a deleted transaction"
            );
            false
        }
    };

    Ok(WriteOutcome {
        primary_written: true,
        mirror_written,
    })
}

/// Update a transaction in place.
///
/// Only the fields supplied in the request are overwritten. The full
/// post-update transaction is returned, and the user's embedded mirror
/// entry is refreshed (best-effort) so add, delete, and update all keep
/// the cache in step the same way.
///
/// # Errors
///
/// - `Validation`: the user id is missing
/// - `NotFound`: the transaction does not exist (an update never creates
///   one)
pub async fn update_transaction(
    state: &AppState,
    transaction_id: &str,
    request: UpdateTransactionRequest,
) -> Result<(Transaction, WriteOutcome), AppError> {
    let user_id = required(
        request.user_id,
        "Transaction ID and user ID are required",
    )?;

    let key = Key::with_sort(user_id.to_string(), transaction_id);
    let existing = state
        .store
        .get(&state.tables.transactions, &key)
        .await?
        .ok_or_else(|| AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()))?;

    let mut fields = Item::new();
    if let Some(title) = request.title {
        fields.insert("title".to_string(), json!(title));
    }
    if let Some(amount) = request.amount {
        fields.insert("amount".to_string(), json!(amount));
    }
    if let Some(description) = request.description {
        fields.insert("description".to_string(), json!(description));
    }
    if let Some(date) = request.date {
        fields.insert("date".to_string(), serde_json::to_value(date)?);
    }
    if let Some(category) = request.category {
        fields.insert("category".to_string(), json!(category));
    }
    if let Some(transaction_type) = request.transaction_type {
        fields.insert("transactionType".to_string(), json!(transaction_type));
    }

    if fields.is_empty() {
        // Nothing to change; hand back the stored transaction untouched.
        return Ok((
            from_item(existing)?,
            WriteOutcome {
                primary_written: false,
                mirror_written: false,
            },
        ));
    }

    let updated = match state
        .store
        .update(&state.tables.transactions, &key, Update::Set(fields))
        .await
    {
        Ok(item) => item,
        // The transaction vanished between the get and the update.
        Err(StoreError::ItemNotFound) => {
            return Err(AppError::NotFound(TRANSACTION_NOT_FOUND.to_string()));
        }
        Err(error) => return Err(error.into()),
    };
    let transaction: Transaction = from_item(updated)?;

    let summary = TransactionSummary::from(&transaction);
    let mirror_written = match state
        .store
        .update(
            &state.tables.users,
            &Key::new(user_id.to_string()),
            Update::ListReplace {
                attr: "transactions".to_string(),
                field: "transactionId".to_string(),
                equals: json!(transaction_id),
                value: serde_json::to_value(&summary)?,
            },
        )
        .await
    {
        Ok(_) => true,
        Err(error) => {
            tracing::warn!(
                %user_id,
                transaction_id,
                %error,
                "mirror refresh failed; user record holds a stale summary"
            );
            false
        }
    };

    Ok((
        transaction,
        WriteOutcome {
            primary_written: true,
            mirror_written,
        },
    ))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        config::Config,
        models::user::{RegisterRequest, User},
        services::user_service,
        state::{AppState, Tables},
        store::{self, Page, StoreClient, TableSchema, memory::MemoryStore},
    };
    use std::sync::Arc;

    fn test_state() -> AppState {
        let config = test_config();
        AppState {
            store: store::connect(&config),
            tables: Tables::from_config(&config),
        }
    }

    fn test_config() -> Config {
        Config {
            server_port: 0,
            users_table: "Users".to_string(),
            transactions_table: "Transactions".to_string(),
            store_timeout_ms: 5_000,
        }
    }

    async fn register_alice(state: &AppState) -> Uuid {
        user_service::register(
            state,
            RegisterRequest {
                name: Some("Alice".to_string()),
                email: Some("alice@example.com".to_string()),
                password: Some("hunter2".to_string()),
            },
        )
        .await
        .unwrap()
        .user_id
    }

    fn coffee_request(user_id: Uuid) -> AddTransactionRequest {
        AddTransactionRequest {
            user_id: Some(user_id),
            title: Some("Coffee".to_string()),
            amount: Some(5.0),
            description: Some("Morning espresso".to_string()),
            date: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            category: Some("Food".to_string()),
            transaction_type: Some("expense".to_string()),
            idempotency_key: None,
        }
    }

    fn get_request(user_id: Uuid, type_filter: &str, frequency: &str) -> GetTransactionsRequest {
        GetTransactionsRequest {
            user_id: Some(user_id),
            type_filter: Some(type_filter.to_string()),
            frequency: Some(frequency.to_string()),
            start_date: None,
            end_date: None,
        }
    }

    fn custom_range(
        user_id: Uuid,
        type_filter: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> GetTransactionsRequest {
        GetTransactionsRequest {
            user_id: Some(user_id),
            type_filter: Some(type_filter.to_string()),
            frequency: Some("custom".to_string()),
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    async fn stored_user(state: &AppState, user_id: Uuid) -> User {
        let item = state
            .store
            .get(&state.tables.users, &Key::new(user_id.to_string()))
            .await
            .unwrap()
            .unwrap();
        from_item(item).unwrap()
    }

    #[tokio::test]
    async fn add_then_get_includes_the_transaction_exactly_once() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let (added, outcome) = add_transaction(&state, coffee_request(alice)).await.unwrap();
        assert!(outcome.primary_written);
        assert!(outcome.mirror_written);

        let wide_open = custom_range(
            alice,
            "all",
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap(),
        );
        let transactions = get_transactions(&state, wide_open).await.unwrap();
        assert_eq!(transactions, vec![added.clone()]);

        // The mirror carries the matching summary.
        let user = stored_user(&state, alice).await;
        assert_eq!(user.transactions, vec![TransactionSummary::from(&added)]);
    }

    #[tokio::test]
    async fn add_rejects_missing_fields() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let mut request = coffee_request(alice);
        request.category = None;
        let error = add_transaction(&state, request).await.unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn add_for_unknown_user_is_not_found() {
        let state = test_state();

        let error = add_transaction(&state, coffee_request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn idempotency_key_deduplicates_retries() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let mut request = coffee_request(alice);
        request.idempotency_key = Some("add-coffee-001".to_string());
        let (first, _) = add_transaction(&state, request).await.unwrap();

        let mut retry = coffee_request(alice);
        retry.idempotency_key = Some("add-coffee-001".to_string());
        let (second, outcome) = add_transaction(&state, retry).await.unwrap();

        assert_eq!(second, first);
        assert!(!outcome.primary_written, "a retry must not write again");

        let all = custom_range(
            alice,
            "all",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(get_transactions(&state, all).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn coffee_scenario_filters_to_exactly_one() {
        let state = test_state();
        let alice = register_alice(&state).await;
        add_transaction(&state, coffee_request(alice)).await.unwrap();

        // A same-day income transaction that the type filter must drop.
        let mut salary = coffee_request(alice);
        salary.title = Some("Salary".to_string());
        salary.transaction_type = Some("income".to_string());
        add_transaction(&state, salary).await.unwrap();

        let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let transactions =
            get_transactions(&state, custom_range(alice, "expense", jan_first, jan_first))
                .await
                .unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].title, "Coffee");
    }

    #[tokio::test]
    async fn frequency_window_uses_calendar_days_inclusive() {
        let state = test_state();
        let alice = register_alice(&state).await;
        let today = Utc::now().date_naive();

        for (title, days_ago) in [("recent", 6), ("boundary", 7), ("stale", 8)] {
            let mut request = coffee_request(alice);
            request.title = Some(title.to_string());
            request.date = Some(today.checked_sub_days(Days::new(days_ago)).unwrap());
            add_transaction(&state, request).await.unwrap();
        }

        let mut titles: Vec<String> = get_transactions(&state, get_request(alice, "all", "7"))
            .await
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.title)
            .collect();
        titles.sort();

        // 6 days ago is in, 8 days ago is out, the 7-day boundary is
        // included.
        assert_eq!(titles, vec!["boundary".to_string(), "recent".to_string()]);
    }

    #[tokio::test]
    async fn custom_frequency_requires_both_dates() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let mut request = get_request(alice, "all", "custom");
        request.start_date = Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let error = get_transactions(&state, request).await.unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn non_numeric_frequency_is_rejected() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let error = get_transactions(&state, get_request(alice, "all", "weekly"))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_removes_ledger_entry_and_mirror_entry() {
        let state = test_state();
        let alice = register_alice(&state).await;
        let (added, _) = add_transaction(&state, coffee_request(alice)).await.unwrap();

        let outcome = delete_transaction(
            &state,
            &added.transaction_id,
            DeleteTransactionRequest {
                user_id: Some(alice),
            },
        )
        .await
        .unwrap();
        assert!(outcome.primary_written);
        assert!(outcome.mirror_written);

        let remaining = state
            .store
            .query(&state.tables.transactions, &alice.to_string(), &[])
            .await
            .unwrap();
        assert!(remaining.is_empty());

        let user = stored_user(&state, alice).await;
        assert!(user.transactions.is_empty());
    }

    #[tokio::test]
    async fn delete_of_unknown_transaction_leaves_store_unchanged() {
        let state = test_state();
        let alice = register_alice(&state).await;
        add_transaction(&state, coffee_request(alice)).await.unwrap();

        let error = delete_transaction(
            &state,
            "txn-0-deadbeef",
            DeleteTransactionRequest {
                user_id: Some(alice),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));

        let remaining = state
            .store
            .query(&state.tables.transactions, &alice.to_string(), &[])
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);

        let user = stored_user(&state, alice).await;
        assert_eq!(user.transactions.len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_supplied_fields_and_refreshes_the_mirror() {
        let state = test_state();
        let alice = register_alice(&state).await;
        let (added, _) = add_transaction(&state, coffee_request(alice)).await.unwrap();

        let (updated, outcome) = update_transaction(
            &state,
            &added.transaction_id,
            UpdateTransactionRequest {
                user_id: Some(alice),
                title: Some("Espresso".to_string()),
                amount: Some(6.5),
                description: None,
                date: None,
                category: None,
                transaction_type: None,
            },
        )
        .await
        .unwrap();

        assert!(outcome.primary_written);
        assert!(outcome.mirror_written);
        assert_eq!(updated.title, "Espresso");
        assert_eq!(updated.amount, 6.5);
        // Fields that were not supplied keep their stored values.
        assert_eq!(updated.description, "Morning espresso");
        assert_eq!(updated.category, "Food");

        let user = stored_user(&state, alice).await;
        assert_eq!(user.transactions, vec![TransactionSummary::from(&updated)]);
    }

    #[tokio::test]
    async fn update_of_unknown_transaction_never_creates_one() {
        let state = test_state();
        let alice = register_alice(&state).await;

        let error = update_transaction(
            &state,
            "txn-0-deadbeef",
            UpdateTransactionRequest {
                user_id: Some(alice),
                title: Some("Ghost".to_string()),
                amount: None,
                description: None,
                date: None,
                category: None,
                transaction_type: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));

        let remaining = state
            .store
            .query(&state.tables.transactions, &alice.to_string(), &[])
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn update_without_user_id_is_a_validation_error() {
        let state = test_state();

        let error = update_transaction(
            &state,
            "txn-0-deadbeef",
            UpdateTransactionRequest {
                user_id: None,
                title: Some("Ghost".to_string()),
                amount: None,
                description: None,
                date: None,
                category: None,
                transaction_type: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(error, AppError::Validation(_)));
    }

    /// Store wrapper that fails every update against one table, standing
    /// in for a store that drops the mirror write after the ledger write
    /// succeeded.
    struct MirrorFailing {
        inner: MemoryStore,
        failing_table: String,
    }

    #[async_trait]
    impl StoreClient for MirrorFailing {
        async fn get(&self, table: &str, key: &Key) -> Result<Option<Item>, StoreError> {
            self.inner.get(table, key).await
        }

        async fn put(&self, table: &str, item: Item) -> Result<(), StoreError> {
            self.inner.put(table, item).await
        }

        async fn update(
            &self,
            table: &str,
            key: &Key,
            update: Update,
        ) -> Result<Item, StoreError> {
            if table == self.failing_table {
                return Err(StoreError::Unavailable("injected fault".to_string()));
            }
            self.inner.update(table, key, update).await
        }

        async fn delete(&self, table: &str, key: &Key) -> Result<(), StoreError> {
            self.inner.delete(table, key).await
        }

        async fn query(
            &self,
            table: &str,
            partition: &str,
            conditions: &[Condition],
        ) -> Result<Vec<Item>, StoreError> {
            self.inner.query(table, partition, conditions).await
        }

        async fn scan(
            &self,
            table: &str,
            conditions: &[Condition],
            projection: Option<&[&str]>,
            cursor: Option<&str>,
            limit: usize,
        ) -> Result<Page, StoreError> {
            self.inner
                .scan(table, conditions, projection, cursor, limit)
                .await
        }

        async fn shutdown(&self) -> Result<(), StoreError> {
            self.inner.shutdown().await
        }
    }

    fn mirror_failing_state() -> AppState {
        let config = test_config();
        let inner = MemoryStore::new(vec![
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
        AppState {
            store: Arc::new(MirrorFailing {
                inner,
                failing_table: config.users_table.clone(),
            }),
            tables: Tables::from_config(&config),
        }
    }

    #[tokio::test]
    async fn failed_mirror_append_leaves_ledger_ahead_of_user_record() {
        let state = mirror_failing_state();
        let alice = register_alice(&state).await;

        let (added, outcome) = add_transaction(&state, coffee_request(alice)).await.unwrap();
        assert!(outcome.primary_written);
        assert!(!outcome.mirror_written);

        // The authoritative write survived.
        let ledger = state
            .store
            .query(&state.tables.transactions, &alice.to_string(), &[])
            .await
            .unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(from_item::<Transaction>(ledger[0].clone()).unwrap(), added);

        // The mirror never heard about it.
        let user = stored_user(&state, alice).await;
        assert!(user.transactions.is_empty());
    }

    #[tokio::test]
    async fn failed_mirror_removal_still_deletes_the_transaction() {
        let state = mirror_failing_state();
        let alice = register_alice(&state).await;
        let (added, _) = add_transaction(&state, coffee_request(alice)).await.unwrap();

        let outcome = delete_transaction(
            &state,
            &added.transaction_id,
            DeleteTransactionRequest {
                user_id: Some(alice),
            },
        )
        .await
        .unwrap();

        assert!(outcome.primary_written);
        assert!(!outcome.mirror_written);

        let ledger = state
            .store
            .query(&state.tables.transactions, &alice.to_string(), &[])
            .await
            .unwrap();
        assert!(ledger.is_empty());
    }
}
