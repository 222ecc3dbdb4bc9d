//! Expense and split domain models.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::group::GroupView;
use super::user::UserPublic;
use shared::validation::parse_iso_date;

/// An expense recorded against a group.
///
/// `paid_by_id` becomes `None` when the payer's account is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
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

/// One user's share of an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseSplit {
    pub expense_id: Uuid,
    pub user_id: Uuid,
    pub amount_paid: f64,
    pub amount_owed: f64,
}

/// Split entry as received on the wire.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SplitInput {
    #[validate(required(message = "user_id is required"))]
    pub user_id: Option<Uuid>,

    #[validate(required(message = "amount_paid is required"))]
    pub amount_paid: Option<f64>,

    #[validate(required(message = "amount_owed is required"))]
    pub amount_owed: Option<f64>,
}

/// A split with every field present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewSplit {
    pub user_id: Uuid,
    pub amount_paid: f64,
    pub amount_owed: f64,
}

impl SplitInput {
    fn into_new_split(self) -> Option<NewSplit> {
        Some(NewSplit {
            user_id: self.user_id?,
            amount_paid: self.amount_paid?,
            amount_owed: self.amount_owed?,
        })
    }
}

fn collect_splits(inputs: Vec<SplitInput>) -> Option<Vec<NewSplit>> {
    inputs.into_iter().map(SplitInput::into_new_split).collect()
}

/// Payload for creating an expense. The acting user becomes the payer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_split_list"))]
pub struct CreateExpenseRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, max = 30, message = "title must be 1-30 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "description is required"),
        length(max = 255, message = "description must be at most 255 characters")
    )]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_iso_date"))]
    pub date: Option<String>,

    #[validate(required(message = "total_cost is required"))]
    pub total_cost: Option<f64>,

    #[validate(required(message = "payer_portion is required"))]
    pub payer_portion: Option<f64>,

    #[serde(default)]
    #[validate(nested)]
    pub splits: Vec<SplitInput>,
}

fn validate_split_list(request: &CreateExpenseRequest) -> Result<(), ValidationError> {
    if request.splits.is_empty() {
        let mut err = ValidationError::new("splits_empty");
        err.message = Some("splits must contain at least one entry".into());
        return Err(err);
    }

    let mut seen = HashSet::new();
    for user_id in request.splits.iter().filter_map(|s| s.user_id) {
        if !seen.insert(user_id) {
            let mut err = ValidationError::new("splits_duplicate_user");
            err.message = Some(format!("splits name user {} more than once", user_id).into());
            return Err(err);
        }
    }

    Ok(())
}

/// Fields of a validated expense creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub total_cost: f64,
    pub payer_portion: f64,
    pub splits: Vec<NewSplit>,
}

impl CreateExpenseRequest {
    /// Unpacks the request once `validate()` has passed. A missing date
    /// falls back to `today`.
    pub fn into_new_expense(self, today: NaiveDate) -> Option<NewExpense> {
        let date = match self.date.as_deref() {
            Some(raw) => parse_iso_date(raw).ok()?,
            None => today,
        };

        Some(NewExpense {
            title: self.title?,
            description: self.description?,
            date,
            total_cost: self.total_cost?,
            payer_portion: self.payer_portion?,
            splits: collect_splits(self.splits)?,
        })
    }
}

/// Payload for updating an expense.
///
/// Split entries only touch splits that already exist.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    #[validate(length(min = 1, max = 30, message = "title must be 1-30 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = "shared::validation::validate_iso_date"))]
    pub date: Option<String>,

    pub total_cost: Option<f64>,

    pub payer_portion: Option<f64>,

    #[serde(default)]
    #[validate(nested)]
    pub splits: Vec<SplitInput>,
}

/// Scalar fields of an expense that may be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub total_cost: Option<f64>,
    pub payer_portion: Option<f64>,
}

impl UpdateExpenseRequest {
    /// Splits the request into the scalar patch and split updates.
    pub fn into_patch(self) -> Option<(ExpensePatch, Vec<NewSplit>)> {
        let date = match self.date.as_deref() {
            Some(raw) => Some(parse_iso_date(raw).ok()?),
            None => None,
        };

        let patch = ExpensePatch {
            title: self.title,
            description: self.description,
            date,
            total_cost: self.total_cost,
            payer_portion: self.payer_portion,
        };

        Some((patch, collect_splits(self.splits)?))
    }
}

/// Query parameters accepted by `/expenses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseQuery {
    pub group_id: Option<Uuid>,
    pub expense_id: Option<Uuid>,
}

/// Split projection returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitView {
    pub user_id: Uuid,
    pub expense_id: Uuid,
    pub amount_paid: f64,
    pub amount_owed: f64,
    pub user: Option<UserPublic>,
}

/// Expense projection returned by the API.
///
/// `group` carries the group name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: String,
    pub total_cost: f64,
    pub paid_by_id: Option<Uuid>,
    pub payer_portion: f64,
    pub group_id: Uuid,
    pub paid_by: Option<UserPublic>,
    pub group: String,
    pub splits: Vec<SplitView>,
}

impl ExpenseView {
    /// Builds the projection. `users` resolves payer and split users; ids
    /// missing from it are rendered as `null`.
    pub fn new(expense: &Expense, group_name: &str, splits: &[ExpenseSplit], users: &[UserPublic]) -> Self {
        let lookup = |id: Uuid| users.iter().find(|u| u.id == id).cloned();

        Self {
            id: expense.id,
            title: expense.title.clone(),
            description: expense.description.clone(),
            date: expense.date.format(shared::validation::ISO_DATE_FORMAT).to_string(),
            total_cost: expense.total_cost,
            paid_by_id: expense.paid_by_id,
            payer_portion: expense.payer_portion,
            group_id: expense.group_id,
            paid_by: expense.paid_by_id.and_then(lookup),
            group: group_name.to_string(),
            splits: splits
                .iter()
                .filter(|s| s.expense_id == expense.id)
                .map(|s| SplitView {
                    user_id: s.user_id,
                    expense_id: s.expense_id,
                    amount_paid: s.amount_paid,
                    amount_owed: s.amount_owed,
                    user: lookup(s.user_id),
                })
                .collect(),
        }
    }
}

/// Response for `GET /expenses`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupExpensesResponse {
    pub group: GroupView,
    pub expenses: Vec<ExpenseView>,
}

/// Response for expense mutations.
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseMutationResponse {
    pub message: String,
    pub expense: ExpenseView,
}
