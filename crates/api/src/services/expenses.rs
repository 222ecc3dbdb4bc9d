//! Expense recording, listing and maintenance.

use domain::models::expense::{ExpensePatch, GroupExpensesResponse, NewExpense, NewSplit};
use domain::models::{Expense, ExpenseSplit, ExpenseView, Group};
use domain::services::authorization;
use persistence::repositories::{ExpenseCreation, ExpenseRepository, GroupRepository, UserRepository};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::ServiceError;
use super::views::ViewLoader;

#[derive(Clone)]
pub struct ExpenseService {
    expenses: ExpenseRepository,
    groups: GroupRepository,
    views: ViewLoader,
}

impl ExpenseService {
    pub fn new(expenses: ExpenseRepository, groups: GroupRepository, users: UserRepository) -> Self {
        let views = ViewLoader::new(users, groups.clone(), expenses.clone());
        Self {
            expenses,
            groups,
            views,
        }
    }

    /// Records an expense paid by `actor` together with its splits.
    ///
    /// The payer and every split user must belong to the group. A split
    /// naming an outsider rolls the whole write back.
    pub async fn create(
        &self,
        actor: Uuid,
        group_id: Uuid,
        new_expense: NewExpense,
    ) -> Result<(ExpenseView, usize), ServiceError> {
        let group = self.find_group(group_id).await?;

        if !self.groups.is_member(group_id, actor).await? {
            return Err(ServiceError::Forbidden(
                "Only group members may record expenses".to_string(),
            ));
        }

        let (expense, splits) = match self
            .expenses
            .create_expense(group_id, actor, &new_expense)
            .await?
        {
            ExpenseCreation::Created { expense, splits } => (expense, splits),
            ExpenseCreation::NonMemberSplit { user_id } => {
                warn!(
                    group_id = %group_id,
                    user_id = %user_id,
                    "Rejected expense with split for non-member"
                );
                return Err(ServiceError::Forbidden(format!(
                    "User {} is not a member of the group",
                    user_id
                )));
            }
        };

        let expense: Expense = expense.into();
        let splits: Vec<ExpenseSplit> = splits.into_iter().map(Into::into).collect();
        let split_count = splits.len();

        info!(
            expense_id = %expense.id,
            group_id = %group_id,
            payer_id = %actor,
            split_count,
            "Expense created"
        );

        let view = self.render_one(&expense, &splits, &group).await?;
        Ok((view, split_count))
    }

    /// The group (without its embedded expense list) and its expenses.
    pub async fn list_for_group(&self, group_id: Uuid) -> Result<GroupExpensesResponse, ServiceError> {
        let group = self.find_group(group_id).await?;

        let expenses: Vec<Expense> = self
            .expenses
            .list_for_groups(&[group_id])
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let expense_views = self
            .views
            .expense_views(&expenses, std::slice::from_ref(&group))
            .await?;

        Ok(GroupExpensesResponse {
            group: self.views.group_view(&group, false).await?,
            expenses: expense_views,
        })
    }

    /// Updates an expense and the amounts of its existing splits. Payer or
    /// group owner only.
    pub async fn update(
        &self,
        actor: Uuid,
        expense_id: Uuid,
        patch: ExpensePatch,
        splits: Vec<NewSplit>,
    ) -> Result<ExpenseView, ServiceError> {
        let (expense, group) = self.find_with_group(expense_id).await?;
        if !authorization::can_modify_expense(actor, &expense, &group) {
            return Err(ServiceError::Forbidden(
                "Only the payer or the group owner may modify this expense".to_string(),
            ));
        }

        let updated: Expense = self
            .expenses
            .update_expense(expense_id, &patch, &splits)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::NotFound("Expense not found".to_string()))?;

        info!(expense_id = %expense_id, user_id = %actor, "Expense updated");

        let mut views = self
            .views
            .expense_views(std::slice::from_ref(&updated), std::slice::from_ref(&group))
            .await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Expense not found".to_string()))
    }

    /// Deletes an expense and its splits. Payer or group owner only.
    pub async fn delete(&self, actor: Uuid, expense_id: Uuid) -> Result<ExpenseView, ServiceError> {
        let (expense, group) = self.find_with_group(expense_id).await?;
        if !authorization::can_modify_expense(actor, &expense, &group) {
            return Err(ServiceError::Forbidden(
                "Only the payer or the group owner may delete this expense".to_string(),
            ));
        }

        let mut snapshot = self
            .views
            .expense_views(std::slice::from_ref(&expense), std::slice::from_ref(&group))
            .await?;

        if self.expenses.delete_expense(expense_id).await? == 0 {
            return Err(ServiceError::NotFound("Expense not found".to_string()));
        }

        info!(expense_id = %expense_id, user_id = %actor, "Expense deleted");
        snapshot
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Expense not found".to_string()))
    }

    async fn render_one(
        &self,
        expense: &Expense,
        splits: &[ExpenseSplit],
        group: &Group,
    ) -> Result<ExpenseView, ServiceError> {
        self.views
            .render_expenses(std::slice::from_ref(expense), splits, std::slice::from_ref(group))
            .await?
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Expense not found".to_string()))
    }

    async fn find_group(&self, group_id: Uuid) -> Result<Group, ServiceError> {
        self.groups
            .find_by_id(group_id)
            .await?
            .map(Group::from)
            .ok_or_else(|| ServiceError::NotFound("Group not found".to_string()))
    }

    async fn find_with_group(&self, expense_id: Uuid) -> Result<(Expense, Group), ServiceError> {
        let expense: Expense = self
            .expenses
            .find_by_id(expense_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ServiceError::NotFound("Expense not found".to_string()))?;

        let group = self.find_group(expense.group_id).await?;
        Ok((expense, group))
    }
}
