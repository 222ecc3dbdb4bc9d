//! Expense routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::expense::{
    CreateExpenseRequest, ExpenseMutationResponse, ExpenseQuery, GroupExpensesResponse,
    UpdateExpenseRequest,
};

use super::{incomplete_payload, required};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{QueryParams, UserAuth, ValidJson};
use crate::middleware::metrics::record_expense_created;

/// GET /expenses?group_id=
pub async fn get_expenses(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> Result<Json<GroupExpensesResponse>, ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    Ok(Json(state.expenses.list_for_group(group_id).await?))
}

/// POST /expenses?group_id=
///
/// The caller is recorded as the payer.
pub async fn create_expense(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<ExpenseQuery>,
    ValidJson(request): ValidJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseMutationResponse>), ApiError> {
    let group_id = required(query.group_id, "group_id")?;
    let new_expense = request
        .into_new_expense(Utc::now().date_naive())
        .ok_or_else(incomplete_payload)?;

    let (expense, split_count) = state
        .expenses
        .create(user_auth.user_id, group_id, new_expense)
        .await?;
    record_expense_created(split_count);

    Ok((
        StatusCode::CREATED,
        Json(ExpenseMutationResponse {
            message: "Expense created".to_string(),
            expense,
        }),
    ))
}

/// PUT /expenses?expense_id=
pub async fn update_expense(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<ExpenseQuery>,
    ValidJson(request): ValidJson<UpdateExpenseRequest>,
) -> Result<Json<ExpenseMutationResponse>, ApiError> {
    let expense_id = required(query.expense_id, "expense_id")?;
    let (patch, splits) = request.into_patch().ok_or_else(incomplete_payload)?;

    let expense = state
        .expenses
        .update(user_auth.user_id, expense_id, patch, splits)
        .await?;

    Ok(Json(ExpenseMutationResponse {
        message: "Expense updated".to_string(),
        expense,
    }))
}

/// DELETE /expenses?expense_id=
pub async fn delete_expense(
    State(state): State<AppState>,
    user_auth: UserAuth,
    QueryParams(query): QueryParams<ExpenseQuery>,
) -> Result<Json<ExpenseMutationResponse>, ApiError> {
    let expense_id = required(query.expense_id, "expense_id")?;
    let expense = state.expenses.delete(user_auth.user_id, expense_id).await?;

    Ok(Json(ExpenseMutationResponse {
        message: "Expense deleted".to_string(),
        expense,
    }))
}
