//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Default page size for username search.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Upper bound for a caller-supplied search limit.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// A registered user, including the stored credential.
///
/// Never serialized directly; responses go through [`UserPublic`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Redacted user projection returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Signup payload.
///
/// Fields are optional at the serde level so that a missing field surfaces
/// as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 1, max = 30, message = "username must be 1-30 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 1, message = "password must not be empty")
    )]
    pub password: Option<String>,

    #[serde(alias = "first_name")]
    #[validate(
        required(message = "firstName is required"),
        length(min = 1, max = 30, message = "firstName must be 1-30 characters")
    )]
    pub first_name: Option<String>,

    #[serde(alias = "last_name")]
    #[validate(
        required(message = "lastName is required"),
        length(min = 1, max = 30, message = "lastName must be 1-30 characters")
    )]
    pub last_name: Option<String>,
}

/// Fields of a validated signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl CreateUserRequest {
    /// Unpacks the request once `validate()` has passed.
    ///
    /// Returns `None` if a required field is missing.
    pub fn into_new_user(self) -> Option<NewUser> {
        Some(NewUser {
            username: self.username?,
            password: self.password?,
            first_name: self.first_name?,
            last_name: self.last_name?,
        })
    }
}

/// Partial update for a user. Every field is independently settable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[validate(
        length(min = 1, max = 30, message = "username must be 1-30 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,

    #[serde(alias = "first_name")]
    #[validate(length(min = 1, max = 30, message = "firstName must be 1-30 characters"))]
    pub first_name: Option<String>,

    #[serde(alias = "last_name")]
    #[validate(length(min = 1, max = 30, message = "lastName must be 1-30 characters"))]
    pub last_name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

/// Login payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "username is required"))]
    pub username: Option<String>,

    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Query parameters accepted by `GET /users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub limit: Option<i64>,
}

impl UserQuery {
    /// Effective search limit, clamped to `1..=MAX_SEARCH_LIMIT`.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Response for user listings.
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserPublic>,
}

/// Response for user mutations.
#[derive(Debug, Clone, Serialize)]
pub struct UserMutationResponse {
    pub message: String,
    pub user: UserPublic,
}
