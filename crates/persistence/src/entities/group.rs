//! Group and membership entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::UserPublic;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the groups table.
#[derive(Debug, Clone, FromRow)]
pub struct GroupEntity {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupEntity> for domain::models::Group {
    fn from(entity: GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// A membership row joined with the member's public user fields.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUserEntity {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub joined_at: DateTime<Utc>,
}

impl From<MemberWithUserEntity> for UserPublic {
    fn from(entity: MemberWithUserEntity) -> Self {
        Self {
            id: entity.user_id,
            username: entity.username,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}
