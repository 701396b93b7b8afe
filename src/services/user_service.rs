//! Identity service: registration, login, avatar mutation, user listing.
//!
//! Users are keyed by `userId` in the store. Email lookups go through a
//! paginated scan with a server-side filter; that is acceptable because
//! `email` is unique across all users, which this service enforces at
//! registration time.

use bcrypt::DEFAULT_COST;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::user::{
        AvatarUpdate, ListUsersQuery, LoginRequest, PublicUser, RegisterRequest, SetAvatarRequest,
        User, UserProfile,
    },
    state::AppState,
    store::{Condition, Item, Key, StoreError, Update, from_item, to_item},
};

use super::required_text;

const MISSING_FIELDS: &str = "Please enter all fields";
const USER_NOT_FOUND: &str = "User not found";

/// Page size used when scanning for a user by email.
const EMAIL_SCAN_PAGE: usize = 100;

/// Default page size for the public user listing.
const DEFAULT_LIST_LIMIT: usize = 50;

/// Register a new user.
///
/// # Process
///
/// 1. Validate that name, email, and password are present
/// 2. Reject the email if another user already holds it
/// 3. Hash the password with bcrypt
/// 4. Persist the user record with a fresh `userId`
///
/// The duplicate check and the write are two separate store calls; there
/// is no conditional put, so two racing registrations of the same email
/// can in principle both pass the check. The window is accepted, matching
/// the store's single-call consistency model.
///
/// # Errors
///
/// - `Validation`: a required field is missing or blank
/// - `Conflict`: the email is already registered
pub async fn register(state: &AppState, request: RegisterRequest) -> Result<UserProfile, AppError> {
    let name = required_text(request.name, MISSING_FIELDS)?;
    let email = required_text(request.email, MISSING_FIELDS)?;
    let password = required_text(request.password, MISSING_FIELDS)?;

    if find_by_email(state, &email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_digest = bcrypt::hash(&password, DEFAULT_COST)?;

    let user = User {
        user_id: Uuid::new_v4(),
        name,
        email,
        password_digest,
        is_avatar_image_set: false,
        avatar_image: String::new(),
        transactions: Vec::new(),
        created_at: Utc::now(),
    };

    state
        .store
        .put(&state.tables.users, to_item(&user)?)
        .await?;

    tracing::info!(user_id = %user.user_id, "user registered");
    Ok(user.into())
}

/// Authenticate a user by email and password.
///
/// # Errors
///
/// - `Validation`: email or password missing
/// - `NotFound`: no user with that email
/// - `Auth`: the password does not match the stored digest
pub async fn login(state: &AppState, request: LoginRequest) -> Result<UserProfile, AppError> {
    let email = required_text(request.email, MISSING_FIELDS)?;
    let password = required_text(request.password, MISSING_FIELDS)?;

    let user = find_by_email(state, &email)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    if !bcrypt::verify(&password, &user.password_digest)? {
        return Err(AppError::Auth);
    }

    Ok(user.into())
}

/// Set a user's avatar image.
///
/// One atomic update of the two avatar fields. The store's update fails
/// when the key addresses no item, so an unknown user surfaces `NotFound`
/// instead of silently creating a partial record.
pub async fn set_avatar(
    state: &AppState,
    user_id: Uuid,
    request: SetAvatarRequest,
) -> Result<AvatarUpdate, AppError> {
    let image = required_text(request.image, MISSING_FIELDS)?;

    let mut fields = Item::new();
    fields.insert("isAvatarImageSet".to_string(), json!(true));
    fields.insert("avatarImage".to_string(), json!(image));

    let updated = match state
        .store
        .update(
            &state.tables.users,
            &Key::new(user_id.to_string()),
            Update::Set(fields),
        )
        .await
    {
        Ok(item) => item,
        Err(StoreError::ItemNotFound) => {
            return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
        }
        Err(error) => return Err(error.into()),
    };

    let user: User = from_item(updated)?;
    Ok(AvatarUpdate {
        is_set: user.is_avatar_image_set,
        image: user.avatar_image,
    })
}

/// List all users except the caller, projected to public fields.
///
/// The scan is paginated: `cursor` continues a previous page and the
/// returned token is `None` once the listing is exhausted.
pub async fn list_users(
    state: &AppState,
    excluding: Uuid,
    query: ListUsersQuery,
) -> Result<(Vec<PublicUser>, Option<String>), AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(1);

    let page = state
        .store
        .scan(
            &state.tables.users,
            &[Condition::Ne(
                "userId".to_string(),
                json!(excluding.to_string()),
            )],
            Some(&["email", "name", "avatarImage"]),
            query.cursor.as_deref(),
            limit,
        )
        .await?;

    let users = page
        .items
        .into_iter()
        .map(from_item::<PublicUser>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((users, page.next_cursor))
}

/// Find a user by email, walking scan pages until a match or exhaustion.
pub async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>, AppError> {
    let conditions = [Condition::Eq("email".to_string(), json!(email))];
    let mut cursor: Option<String> = None;

    loop {
        let page = state
            .store
            .scan(
                &state.tables.users,
                &conditions,
                None,
                cursor.as_deref(),
                EMAIL_SCAN_PAGE,
            )
            .await?;

        if let Some(item) = page.items.into_iter().next() {
            return Ok(Some(from_item(item)?));
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return Ok(None),
        }
    }
}
