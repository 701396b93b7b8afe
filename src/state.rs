//! Shared application state handed to every handler via Axum's `State`.

use std::sync::Arc;

use crate::{config::Config, store::StoreClient};

/// Table names the services address in the item store.
#[derive(Debug, Clone)]
pub struct Tables {
    pub users: String,
    pub transactions: String,
}

impl Tables {
    pub fn from_config(config: &Config) -> Self {
        Self {
            users: config.users_table.clone(),
            transactions: config.transactions_table.clone(),
        }
    }
}

/// State shared across all request handlers.
///
/// Holds the one store client created by `store::connect` at startup.
/// Cloning is cheap: the store handle is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreClient>,
    pub tables: Tables,
}
