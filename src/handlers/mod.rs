//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the identity or ledger service
//! 3. Wraps the result in the `{success, message, ...}` envelope

/// Service health endpoint
pub mod health;
/// Identity endpoints under /api/auth
pub mod users;
/// Ledger endpoints under /api/v1
pub mod transactions;
