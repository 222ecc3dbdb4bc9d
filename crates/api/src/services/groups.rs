//! Group lifecycle and membership management.

use domain::models::group::GroupPatch;
use domain::models::{Group, GroupView};
use domain::services::authorization;
use persistence::repositories::{ExpenseRepository, GroupRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

use super::error::ServiceError;
use super::views::ViewLoader;

#[derive(Clone)]
pub struct GroupService {
    groups: GroupRepository,
    users: UserRepository,
    views: ViewLoader,
}

impl GroupService {
    pub fn new(groups: GroupRepository, users: UserRepository, expenses: ExpenseRepository) -> Self {
        let views = ViewLoader::new(users.clone(), groups.clone(), expenses);
        Self {
            groups,
            users,
            views,
        }
    }

    /// Creates a group owned by `actor`, who also becomes its first member.
    pub async fn create(&self, actor: Uuid, name: &str) -> Result<GroupView, ServiceError> {
        self.require_user(actor).await?;

        let group: Group = self.groups.create_group(name, actor).await?.into();
        info!(group_id = %group.id, owner_id = %actor, "Group created");

        Ok(self.views.group_view(&group, true).await?)
    }

    pub async fn get(&self, group_id: Uuid) -> Result<GroupView, ServiceError> {
        let group = self.find(group_id).await?;
        Ok(self.views.group_view(&group, true).await?)
    }

    /// Groups the user belongs to, owned ones included.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<GroupView>, ServiceError> {
        self.require_user(user_id).await?;

        let groups: Vec<Group> = self
            .groups
            .find_for_user(user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(self.views.group_views(&groups, true).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<GroupView>, ServiceError> {
        let groups: Vec<Group> = self
            .groups
            .list_all()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(self.views.group_views(&groups, true).await?)
    }

    /// Renames a group. Owner only.
    pub async fn update(
        &self,
        actor: Uuid,
        group_id: Uuid,
        patch: GroupPatch,
    ) -> Result<GroupView, ServiceError> {
        let group = self.find(group_id).await?;
        if !authorization::can_modify_group(actor, &group) {
            return Err(ServiceError::Forbidden(
                "Only the group owner may modify the group".to_string(),
            ));
        }

        let group = match patch.name {
            Some(name) => self
                .groups
                .update_name(group_id, &name)
                .await?
                .map(Group::from)
                .ok_or_else(|| ServiceError::NotFound("Group not found".to_string()))?,
            None => group,
        };

        info!(group_id = %group.id, user_id = %actor, "Group updated");
        Ok(self.views.group_view(&group, true).await?)
    }

    /// Deletes a group with its expenses and memberships. Owner only.
    pub async fn delete(&self, actor: Uuid, group_id: Uuid) -> Result<GroupView, ServiceError> {
        let group = self.find(group_id).await?;
        if !authorization::can_modify_group(actor, &group) {
            return Err(ServiceError::Forbidden(
                "Only the group owner may delete the group".to_string(),
            ));
        }

        let snapshot = self.views.group_view(&group, false).await?;

        if self.groups.delete_group(group_id).await? == 0 {
            return Err(ServiceError::NotFound("Group not found".to_string()));
        }

        info!(group_id = %group_id, user_id = %actor, "Group deleted");
        Ok(snapshot)
    }

    pub async fn add_member(
        &self,
        actor: Uuid,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<GroupView, ServiceError> {
        let group = self.find(group_id).await?;
        if !authorization::can_manage_membership(actor, &group) {
            return Err(ServiceError::Forbidden(
                "Only the group owner may add members".to_string(),
            ));
        }

        self.require_user(user_id).await?;

        if !self.groups.add_member(group_id, user_id).await? {
            return Err(ServiceError::Conflict(
                "User is already a member of the group".to_string(),
            ));
        }

        info!(group_id = %group_id, member_id = %user_id, "Member added");
        Ok(self.views.group_view(&group, true).await?)
    }

    /// Removes a member. The owner can never be removed.
    pub async fn remove_member(
        &self,
        actor: Uuid,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<GroupView, ServiceError> {
        let group = self.find(group_id).await?;
        if !authorization::can_manage_membership(actor, &group) {
            return Err(ServiceError::Forbidden(
                "Only the group owner may remove members".to_string(),
            ));
        }

        if !authorization::can_remove_member(&group, user_id) {
            return Err(ServiceError::Forbidden(
                "The group owner cannot be removed from the group".to_string(),
            ));
        }

        self.require_user(user_id).await?;

        if !self.groups.remove_member(group_id, user_id).await? {
            return Err(ServiceError::NotFound(
                "User is not a member of the group".to_string(),
            ));
        }

        info!(group_id = %group_id, member_id = %user_id, "Member removed");
        Ok(self.views.group_view(&group, true).await?)
    }

    async fn find(&self, group_id: Uuid) -> Result<Group, ServiceError> {
        self.groups
            .find_by_id(group_id)
            .await?
            .map(Group::from)
            .ok_or_else(|| ServiceError::NotFound("Group not found".to_string()))
    }

    async fn require_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound("User not found".to_string())),
        }
    }
}
