//! Loads the rows needed to render group and expense projections.

use std::collections::{HashMap, HashSet};

use domain::models::{Expense, ExpenseSplit, ExpenseView, Group, GroupView, UserPublic};
use persistence::repositories::{ExpenseRepository, GroupRepository, UserRepository};
use uuid::Uuid;

#[derive(Clone)]
pub(crate) struct ViewLoader {
    users: UserRepository,
    groups: GroupRepository,
    expenses: ExpenseRepository,
}

impl ViewLoader {
    pub fn new(users: UserRepository, groups: GroupRepository, expenses: ExpenseRepository) -> Self {
        Self {
            users,
            groups,
            expenses,
        }
    }

    /// Renders groups with their members and, if asked, their expenses.
    pub async fn group_views(
        &self,
        groups: &[Group],
        with_expenses: bool,
    ) -> Result<Vec<GroupView>, sqlx::Error> {
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();

        let mut members: HashMap<Uuid, Vec<UserPublic>> = HashMap::new();
        for row in self.groups.members_for_groups(&group_ids).await? {
            members.entry(row.group_id).or_default().push(row.into());
        }

        let mut expenses: HashMap<Uuid, Vec<ExpenseView>> = HashMap::new();
        if with_expenses {
            let rows: Vec<Expense> = self
                .expenses
                .list_for_groups(&group_ids)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            for view in self.expense_views(&rows, groups).await? {
                expenses.entry(view.group_id).or_default().push(view);
            }
        }

        Ok(groups
            .iter()
            .map(|group| {
                let group_expenses =
                    with_expenses.then(|| expenses.remove(&group.id).unwrap_or_default());
                GroupView::new(
                    group,
                    members.remove(&group.id).unwrap_or_default(),
                    group_expenses,
                )
            })
            .collect())
    }

    pub async fn group_view(&self, group: &Group, with_expenses: bool) -> Result<GroupView, sqlx::Error> {
        let mut views = self.group_views(std::slice::from_ref(group), with_expenses).await?;
        Ok(views.pop().unwrap_or_else(|| GroupView::new(group, Vec::new(), None)))
    }

    /// Renders expenses with their splits. `groups` supplies group names.
    pub async fn expense_views(
        &self,
        expenses: &[Expense],
        groups: &[Group],
    ) -> Result<Vec<ExpenseView>, sqlx::Error> {
        let expense_ids: Vec<Uuid> = expenses.iter().map(|e| e.id).collect();
        let splits: Vec<ExpenseSplit> = self
            .expenses
            .splits_for_expenses(&expense_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        self.render_expenses(expenses, &splits, groups).await
    }

    /// Renders expenses whose splits are already loaded.
    pub async fn render_expenses(
        &self,
        expenses: &[Expense],
        splits: &[ExpenseSplit],
        groups: &[Group],
    ) -> Result<Vec<ExpenseView>, sqlx::Error> {
        let user_ids: Vec<Uuid> = expenses
            .iter()
            .filter_map(|e| e.paid_by_id)
            .chain(splits.iter().map(|s| s.user_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let users: Vec<UserPublic> = self
            .users
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let names: HashMap<Uuid, &str> = groups.iter().map(|g| (g.id, g.name.as_str())).collect();

        Ok(expenses
            .iter()
            .map(|expense| {
                let group_name = names.get(&expense.group_id).copied().unwrap_or_default();
                ExpenseView::new(expense, group_name, splits, &users)
            })
            .collect())
    }
}
