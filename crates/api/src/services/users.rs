//! User registration, lookup, self-service updates and login.

use std::sync::Arc;

use domain::models::user::{LoginResponse, NewUser, UserPatch};
use domain::models::{User, UserPublic};
use domain::services::authorization;
use persistence::repositories::UserRepository;
use shared::jwt::JwtConfig;
use shared::password::{hash_password, verify_password};
use tracing::info;
use uuid::Uuid;

use super::error::ServiceError;

const USERNAME_TAKEN: &str = "Username is already taken";

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    jwt: Arc<JwtConfig>,
    /// Verified against when the username is unknown, so both failure
    /// paths cost one Argon2 verification.
    dummy_hash: Arc<str>,
}

impl UserService {
    pub fn new(repo: UserRepository, jwt: Arc<JwtConfig>) -> Result<Self, ServiceError> {
        let dummy_hash = hash_password("splitledger-dummy-password")?;
        Ok(Self {
            repo,
            jwt,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub async fn create(&self, new_user: NewUser) -> Result<UserPublic, ServiceError> {
        let password_hash = hash_password(&new_user.password)?;

        let user = self
            .repo
            .create_user(
                &new_user.username,
                &password_hash,
                &new_user.first_name,
                &new_user.last_name,
            )
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, USERNAME_TAKEN))?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    pub async fn get(&self, user_id: Uuid) -> Result<UserPublic, ServiceError> {
        self.find(user_id).await.map(UserPublic::from)
    }

    pub async fn search(&self, prefix: &str, limit: i64) -> Result<Vec<UserPublic>, ServiceError> {
        let users = self.repo.search_by_username_prefix(prefix, limit).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<UserPublic>, ServiceError> {
        let users = self.repo.list_all().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Applies a patch to the actor's own account.
    pub async fn update(
        &self,
        actor: Uuid,
        target_id: Uuid,
        patch: UserPatch,
    ) -> Result<UserPublic, ServiceError> {
        let target = self.find(target_id).await?;
        if !authorization::can_modify_user(actor, target.id) {
            return Err(ServiceError::Forbidden(
                "Users may only modify their own account".to_string(),
            ));
        }

        if patch.is_empty() {
            return Ok(target.into());
        }

        let password_hash = patch.password.as_deref().map(hash_password).transpose()?;

        let updated = self
            .repo
            .update_user(
                target_id,
                patch.username.as_deref(),
                password_hash.as_deref(),
                patch.first_name.as_deref(),
                patch.last_name.as_deref(),
            )
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, USERNAME_TAKEN))?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        info!(
            user_id = %updated.id,
            password_changed = password_hash.is_some(),
            "User updated"
        );
        Ok(updated.into())
    }

    /// Deletes the actor's own account and returns its last state.
    pub async fn delete(&self, actor: Uuid, target_id: Uuid) -> Result<UserPublic, ServiceError> {
        let target = self.find(target_id).await?;
        if !authorization::can_modify_user(actor, target.id) {
            return Err(ServiceError::Forbidden(
                "Users may only delete their own account".to_string(),
            ));
        }

        if self.repo.delete_user(target_id).await? == 0 {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        info!(user_id = %target_id, "User deleted");
        Ok(target.into())
    }

    /// Verifies credentials and issues an access token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ServiceError> {
        let user = self.repo.find_by_username(username).await?;

        let (user_id, hash) = match &user {
            Some(u) => (Some(u.id), u.password_hash.as_str()),
            None => (None, self.dummy_hash.as_ref()),
        };

        let verified = verify_password(password, hash)?;

        let Some(user_id) = user_id.filter(|_| verified) else {
            return Err(ServiceError::InvalidCredentials);
        };

        let issued = self.jwt.issue_access_token(user_id)?;
        info!(user_id = %user_id, jti = %issued.jti, "User logged in");

        Ok(LoginResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }

    async fn find(&self, user_id: Uuid) -> Result<User, ServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .map(User::from)
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }
}
