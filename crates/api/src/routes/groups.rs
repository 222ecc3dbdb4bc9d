//! Group routes: lifecycle and membership.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::group::{
    CreateGroupRequest, GroupMutationResponse, GroupPatch, GroupQuery, GroupsResponse,
    MemberRequest,
};

use super::{incomplete_payload, required};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, UserAuth, ValidJson};
use crate::middleware::metrics::record_group_created;

/// GET /groups
///
/// `group_id` returns that group, `user_id` the groups the user belongs
/// to, neither lists every group.
pub async fn get_groups(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<GroupQuery>,
) -> Result<Json<GroupsResponse>, ApiError> {
    let groups = match (query.group_id, query.user_id) {
        (Some(group_id), _) => vec![state.groups.get(group_id).await?],
        (None, Some(user_id)) => state.groups.list_for_user(user_id).await?,
        (None, None) => state.groups.list_all().await?,
    };

    Ok(Json(GroupsResponse { groups }))
}

/// POST /groups
pub async fn create_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    ValidJson(request): ValidJson<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupMutationResponse>), ApiError> {
    let name = request.name.ok_or_else(incomplete_payload)?;
    let group = state.groups.create(user_auth.user_id, &name).await?;
    record_group_created();

    Ok((
        StatusCode::CREATED,
        Json(GroupMutationResponse {
            message: "Group created".to_string(),
            group,
        }),
    ))
}

/// PUT /groups?group_id=
pub async fn update_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<GroupQuery>,
    ValidJson(patch): ValidJson<GroupPatch>,
) -> Result<Json<GroupMutationResponse>, ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    let group = state
        .groups
        .update(user_auth.user_id, group_id, patch)
        .await?;

    Ok(Json(GroupMutationResponse {
        message: "Group updated".to_string(),
        group,
    }))
}

/// DELETE /groups?group_id=
pub async fn delete_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<GroupQuery>,
) -> Result<Json<GroupMutationResponse>, ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    let group = state.groups.delete(user_auth.user_id, group_id).await?;

    Ok(Json(GroupMutationResponse {
        message: "Group deleted".to_string(),
        group,
    }))
}

/// POST /groups/members?group_id=
pub async fn add_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<GroupQuery>,
    ValidJson(request): ValidJson<MemberRequest>,
) -> Result<(StatusCode, Json<GroupMutationResponse>), ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    let member_id = request.user_id.ok_or_else(incomplete_payload)?;
    let group = state
        .groups
        .add_member(user_auth.user_id, group_id, member_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GroupMutationResponse {
            message: "Member added".to_string(),
            group,
        }),
    ))
}

/// DELETE /groups/members?group_id=
pub async fn remove_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<GroupQuery>,
    ValidJson(request): ValidJson<MemberRequest>,
) -> Result<Json<GroupMutationResponse>, ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    let member_id = request.user_id.ok_or_else(incomplete_payload)?;
    let group = state
        .groups
        .remove_member(user_auth.user_id, group_id, member_id)
        .await?;

    Ok(Json(GroupMutationResponse {
        message: "Member removed".to_string(),
        group,
    }))
}
