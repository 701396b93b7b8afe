//! Data models representing the stored entities and their API types.
//!
//! Wire and storage format is camelCase JSON (`userId`, `transactionType`),
//! matching the documents held in the item store.

/// User entity and identity request/response types
pub mod user;
/// Transaction entity, mirror summary, and ledger request/response types
pub mod transaction;
