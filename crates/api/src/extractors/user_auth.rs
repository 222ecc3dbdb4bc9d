//! Bearer token authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use shared::jwt::JwtError;
use tracing::debug;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated caller.
///
/// Resolved from `Authorization: Bearer <token>`. The user row is not
/// reloaded; a valid token is trusted as proof of identity.
#[derive(Debug, Clone, Copy)]
pub struct UserAuth {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let user_id = state.jwt.resolve_user_id(token).map_err(|e| {
            debug!(error = %e, "Rejected access token");
            match e {
                JwtError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
                _ => ApiError::Unauthorized("Invalid or expired token".to_string()),
            }
        })?;

        Ok(Self { user_id })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/groups");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let parts = parts_with(None);
        assert!(matches!(bearer_token(&parts), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let parts = parts_with(Some("Basic dXNlcjpwdw=="));
        assert!(matches!(bearer_token(&parts), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn test_empty_token_rejected() {
        let parts = parts_with(Some("Bearer   "));
        assert!(bearer_token(&parts).is_err());
    }
}
