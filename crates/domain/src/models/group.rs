//! Group domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::expense::ExpenseView;
use super::user::UserPublic;

/// A group of users sharing expenses. The owner is always a member.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group projection returned by the API.
///
/// `expenses` is omitted when the group is embedded next to its own
/// expense list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub owner: Option<UserPublic>,
    pub members: Vec<UserPublic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Vec<ExpenseView>>,
}

impl GroupView {
    /// Builds the projection from a group and its related rows.
    ///
    /// The owner is picked out of `members`.
    pub fn new(group: &Group, members: Vec<UserPublic>, expenses: Option<Vec<ExpenseView>>) -> Self {
        let owner = members.iter().find(|m| m.id == group.owner_id).cloned();
        Self {
            id: group.id,
            name: group.name.clone(),
            owner_id: group.owner_id,
            owner,
            members,
            expenses,
        }
    }
}

/// Payload for creating a group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, max = 30, message = "name must be 1-30 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,
}

/// Partial update for a group. Only the name is mutable; any other key in
/// the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GroupPatch {
    #[validate(
        length(min = 1, max = 30, message = "name must be 1-30 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,
}

/// Payload for adding or removing a member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MemberRequest {
    #[validate(required(message = "user_id is required"))]
    pub user_id: Option<Uuid>,
}

/// Query parameters accepted by `/groups` and `/groups/members`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupQuery {
    pub group_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

/// Response for group listings.
#[derive(Debug, Clone, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<GroupView>,
}

/// Response for group mutations.
#[derive(Debug, Clone, Serialize)]
pub struct GroupMutationResponse {
    pub message: String,
    pub group: GroupView,
}
