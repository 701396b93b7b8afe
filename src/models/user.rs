//! User data models and identity request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::TransactionSummary;

/// A user as stored in the `Users` table.
///
/// # Addressing
///
/// Users are keyed by `userId` everywhere. Email lookups (registration's
/// duplicate check, login) go through a filtered scan instead, which is
/// correct because `email` is unique across all users, enforced at
/// registration.
///
/// The `transactions` list is a best-effort mirror of the authoritative
/// `Transactions` table; see `services::transaction_service` for the
/// consistency contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique identifier, generated at registration, immutable
    pub user_id: Uuid,

    pub name: String,

    /// Unique natural key used for login
    pub email: String,

    /// bcrypt digest. Never serialized into any response type.
    pub password_digest: String,

    pub is_avatar_image_set: bool,

    /// Avatar URL or encoded blob; empty until set
    pub avatar_image: String,

    /// Denormalized cache of the user's transactions
    pub transactions: Vec<TransactionSummary>,

    pub created_at: DateTime<Utc>,
}

/// A user as returned to API clients: everything except the digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_avatar_image_set: bool,
    pub avatar_image: String,
    pub transactions: Vec<TransactionSummary>,
    pub created_at: DateTime<Utc>,
}

/// Strip the digest.
impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            is_avatar_image_set: user.is_avatar_image_set,
            avatar_image: user.avatar_image,
            transactions: user.transactions,
            created_at: user.created_at,
        }
    }
}

/// Public projection returned by the user listing: only the fields other
/// users are allowed to see.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_image: String,
}

/// Result of an avatar update, echoing the two fields that changed.
#[derive(Debug, Clone, Serialize)]
pub struct AvatarUpdate {
    #[serde(rename = "isSet")]
    pub is_set: bool,
    pub image: String,
}

/// Request body for `POST /api/auth/register`.
///
/// ```json
/// {
///   "name": "Alice",
///   "email": "alice@example.com",
///   "password": "hunter2"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/setAvatar/{id}`.
#[derive(Debug, Deserialize)]
pub struct SetAvatarRequest {
    #[serde(default)]
    pub image: Option<String>,
}

/// Query parameters for `GET /api/auth/allUsers/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Opaque continuation token from a previous page
    #[serde(default)]
    pub cursor: Option<String>,
    /// Page size; defaults to 50
    #[serde(default)]
    pub limit: Option<usize>,
}
