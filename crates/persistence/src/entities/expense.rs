//! Expense and split entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the expenses table.
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseEntity {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub total_cost: f64,
    pub paid_by_id: Option<Uuid>,
    pub payer_portion: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExpenseEntity> for domain::models::Expense {
    fn from(entity: ExpenseEntity) -> Self {
        Self {
            id: entity.id,
            group_id: entity.group_id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            total_cost: entity.total_cost,
            paid_by_id: entity.paid_by_id,
            payer_portion: entity.payer_portion,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the expense_splits table.
#[derive(Debug, Clone, FromRow)]
pub struct ExpenseSplitEntity {
    pub expense_id: Uuid,
    pub user_id: Uuid,
    pub amount_paid: f64,
    pub amount_owed: f64,
}

impl From<ExpenseSplitEntity> for domain::models::ExpenseSplit {
    fn from(entity: ExpenseSplitEntity) -> Self {
        Self {
            expense_id: entity.expense_id,
            user_id: entity.user_id,
            amount_paid: entity.amount_paid,
            amount_owed: entity.amount_owed,
        }
    }
}
