//! User routes: signup, lookup, self-service updates and login.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{
    CreateUserRequest, LoginRequest, LoginResponse, UserMutationResponse, UserPatch, UserQuery,
    UsersResponse,
};
use tracing::info;

use super::{incomplete_payload, required};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, UserAuth, ValidJson};
use crate::middleware::metrics::{record_login_attempt, record_user_registered};
use crate::services::ServiceError;

/// GET /users
///
/// `user_id` returns that user, `username` runs a prefix search capped by
/// `limit`, neither lists every user.
pub async fn get_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = match (&query.user_id, &query.username) {
        (Some(user_id), _) => vec![state.users.get(*user_id).await?],
        (None, Some(prefix)) => {
            state
                .users
                .search(prefix, query.effective_limit())
                .await?
        }
        (None, None) => state.users.list_all().await?,
    };

    Ok(Json(UsersResponse { users }))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserMutationResponse>), ApiError> {
    let new_user = request.into_new_user().ok_or_else(incomplete_payload)?;
    let user = state.users.create(new_user).await?;
    record_user_registered();

    Ok((
        StatusCode::CREATED,
        Json(UserMutationResponse {
            message: "User created".to_string(),
            user,
        }),
    ))
}

/// PUT /users?user_id=
pub async fn update_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<UserQuery>,
    ValidJson(patch): ValidJson<UserPatch>,
) -> Result<Json<UserMutationResponse>, ApiError> {
    let user_id = required(query.user_id, "user_id")?;
    let user = state.users.update(user_auth.user_id, user_id, patch).await?;

    Ok(Json(UserMutationResponse {
        message: "User updated".to_string(),
        user,
    }))
}

/// DELETE /users?user_id=
pub async fn delete_user(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<UserMutationResponse>, ApiError> {
    let user_id = required(query.user_id, "user_id")?;
    let user = state.users.delete(user_auth.user_id, user_id).await?;

    Ok(Json(UserMutationResponse {
        message: "User deleted".to_string(),
        user,
    }))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(incomplete_payload());
    };

    match state.users.login(&username, &password).await {
        Ok(response) => {
            record_login_attempt(true);
            Ok(Json(response))
        }
        Err(ServiceError::InvalidCredentials) => {
            record_login_attempt(false);
            info!(username = %username, "Login rejected");
            Err(ServiceError::InvalidCredentials.into())
        }
        Err(e) => Err(e.into()),
    }
}
