//! Expense and split repository.

use domain::models::expense::{ExpensePatch, NewExpense, NewSplit};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{ExpenseEntity, ExpenseSplitEntity};
use crate::metrics::QueryTimer;

const EXPENSE_COLUMNS: &str = "id, group_id, title, description, date, total_cost, paid_by_id, \
                               payer_portion, created_at, updated_at";

/// Outcome of [`ExpenseRepository::create_expense`].
#[derive(Debug)]
pub enum ExpenseCreation {
    Created {
        expense: ExpenseEntity,
        splits: Vec<ExpenseSplitEntity>,
    },
    /// A split named a user outside the group. Nothing was written.
    NonMemberSplit { user_id: Uuid },
}

/// Repository for expense-related database operations.
#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an expense and its splits in one transaction.
    ///
    /// Each split user's membership is checked inside the transaction; the
    /// first non-member rolls everything back.
    pub async fn create_expense(
        &self,
        group_id: Uuid,
        paid_by_id: Uuid,
        new_expense: &NewExpense,
    ) -> Result<ExpenseCreation, sqlx::Error> {
        let timer = QueryTimer::new("create_expense");
        let mut tx = self.pool.begin().await?;

        let expense = sqlx::query_as::<_, ExpenseEntity>(&format!(
            r#"
            INSERT INTO expenses (group_id, title, description, date, total_cost, paid_by_id, payer_portion)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(group_id)
        .bind(&new_expense.title)
        .bind(&new_expense.description)
        .bind(new_expense.date)
        .bind(new_expense.total_cost)
        .bind(paid_by_id)
        .bind(new_expense.payer_portion)
        .fetch_one(&mut *tx)
        .await?;

        let mut splits = Vec::with_capacity(new_expense.splits.len());
        for split in &new_expense.splits {
            let is_member = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM group_memberships
                    WHERE group_id = $1 AND user_id = $2
                )
                "#,
            )
            .bind(group_id)
            .bind(split.user_id)
            .fetch_one(&mut *tx)
            .await?;

            if !is_member {
                tx.rollback().await?;
                timer.record();
                debug!(
                    group_id = %group_id,
                    user_id = %split.user_id,
                    "Expense creation rolled back: split user is not a group member"
                );
                return Ok(ExpenseCreation::NonMemberSplit {
                    user_id: split.user_id,
                });
            }

            let row = sqlx::query_as::<_, ExpenseSplitEntity>(
                r#"
                INSERT INTO expense_splits (expense_id, user_id, amount_paid, amount_owed)
                VALUES ($1, $2, $3, $4)
                RETURNING expense_id, user_id, amount_paid, amount_owed
                "#,
            )
            .bind(expense.id)
            .bind(split.user_id)
            .bind(split.amount_paid)
            .bind(split.amount_owed)
            .fetch_one(&mut *tx)
            .await?;
            splits.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok(ExpenseCreation::Created { expense, splits })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ExpenseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_expense_by_id");
        let result = sqlx::query_as::<_, ExpenseEntity>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Expenses of every group in `group_ids`, newest date first.
    pub async fn list_for_groups(&self, group_ids: &[Uuid]) -> Result<Vec<ExpenseEntity>, sqlx::Error> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("list_expenses_for_groups");
        let result = sqlx::query_as::<_, ExpenseEntity>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE group_id = ANY($1)
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(group_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn splits_for_expenses(
        &self,
        expense_ids: &[Uuid],
    ) -> Result<Vec<ExpenseSplitEntity>, sqlx::Error> {
        if expense_ids.is_empty() {
            return Ok(Vec::new());
        }

        let timer = QueryTimer::new("splits_for_expenses");
        let result = sqlx::query_as::<_, ExpenseSplitEntity>(
            r#"
            SELECT expense_id, user_id, amount_paid, amount_owed
            FROM expense_splits
            WHERE expense_id = ANY($1)
            ORDER BY expense_id, user_id
            "#,
        )
        .bind(expense_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Applies the patch and rewrites amounts of splits that already exist.
    ///
    /// Split entries for users without a split are skipped. Returns `None`
    /// if the expense is gone.
    pub async fn update_expense(
        &self,
        id: Uuid,
        patch: &ExpensePatch,
        splits: &[NewSplit],
    ) -> Result<Option<ExpenseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_expense");
        let mut tx = self.pool.begin().await?;

        let expense = sqlx::query_as::<_, ExpenseEntity>(&format!(
            r#"
            UPDATE expenses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                total_cost = COALESCE($5, total_cost),
                payer_portion = COALESCE($6, payer_portion),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.date)
        .bind(patch.total_cost)
        .bind(patch.payer_portion)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(expense) = expense else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        for split in splits {
            let updated = sqlx::query(
                r#"
                UPDATE expense_splits
                SET amount_paid = $3, amount_owed = $4
                WHERE expense_id = $1 AND user_id = $2
                "#,
            )
            .bind(id)
            .bind(split.user_id)
            .bind(split.amount_paid)
            .bind(split.amount_owed)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                debug!(expense_id = %id, user_id = %split.user_id, "No split to update, skipping");
            }
        }

        tx.commit().await?;
        timer.record();
        Ok(Some(expense))
    }

    /// Deletes an expense; its splits cascade.
    pub async fn delete_expense(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expense");
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        result.map(|r| r.rows_affected())
    }
}
