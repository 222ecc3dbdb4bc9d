//! Group and membership repository.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GroupEntity, MemberWithUserEntity};
use crate::metrics::QueryTimer;

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a group and enrolls the owner as its first member.
    pub async fn create_group(&self, name: &str, owner_id: Uuid) -> Result<GroupEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_group");

        // Group row and owner membership commit together or not at all.
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_memberships (group_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(group.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(group)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_group_by_id");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list_all(&self) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_groups");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM groups
            ORDER BY created_at, name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All groups the user is a member of, owned ones included.
    pub async fn find_for_user(&self, user_id: Uuid) -> Result<Vec<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_groups_for_user");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT g.id, g.name, g.owner_id, g.created_at, g.updated_at
            FROM groups g
            JOIN group_memberships gm ON gm.group_id = g.id
            WHERE gm.user_id = $1
            ORDER BY gm.joined_at, g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Renames a group. Returns `None` if the group is gone.
    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<GroupEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_group_name");
        let result = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deletes a group; expenses, splits and memberships cascade.
    pub async fn delete_group(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_group");
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }

    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_group_member");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM group_memberships
                WHERE group_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Adds a member. Returns `false` if the user already belongs to the group.
    pub async fn add_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("add_group_member");
        let result = sqlx::query(
            r#"
            INSERT INTO group_memberships (group_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() == 1)
    }

    /// Removes a member. Returns `false` if there was no such membership.
    pub async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("remove_group_member");
        let result = sqlx::query(
            r#"
            DELETE FROM group_memberships
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() == 1)
    }

    /// Members of every group in `group_ids`, in join order.
    pub async fn members_for_groups(
        &self,
        group_ids: &[Uuid],
    ) -> Result<Vec<MemberWithUserEntity>, sqlx::Error> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("members_for_groups");
        let result = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT gm.group_id, gm.user_id, u.username, u.first_name, u.last_name, gm.joined_at
            FROM group_memberships gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = ANY($1)
            ORDER BY gm.joined_at, u.username
            "#,
        )
        .bind(group_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
